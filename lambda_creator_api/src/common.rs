// SPDX-FileCopyrightText: © 2026 The lambda_creator contributors
// SPDX-License-Identifier: MIT

/// Kind of remote resource referred to by a [`LambdaCreatorError::NotFound`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Repository,
    Role,
    Policy,
    Function,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fmt = match self {
            Self::Repository => "ECR repository",
            Self::Role => "IAM role",
            Self::Policy => "IAM policy",
            Self::Function => "Lambda function",
        };
        write!(f, "{}", fmt)
    }
}

/// Error returned by a control plane, passed through unchanged.
#[derive(Clone, Debug, PartialEq)]
pub struct ResponseError {
    /// Remote operation that failed, e.g., `CreateFunction`.
    pub operation: String,
    pub summary: String,
    pub detail: Option<String>,
}

impl std::fmt::Display for ResponseError {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        match &self.detail {
            Some(detail) => write!(fmt, "{} failed: {} [detail: {}]", self.operation, self.summary, detail),
            None => write!(fmt, "{} failed: {}", self.operation, self.summary),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum LambdaCreatorError {
    /// A repository, role, policy or function does not exist.
    NotFound { kind: ResourceKind, name: String },
    /// Any other control-plane failure: permissions, conflicts, throttling, malformed requests.
    RemoteRejection(ResponseError),
    /// A request did not pass the validator.
    ValidationFailure(crate::validation::ValidationResult),
    /// Structured text (JSON) could not be interpreted.
    MalformedInput(String),
}

pub type LambdaCreatorResult<T> = Result<T, LambdaCreatorError>;

impl LambdaCreatorError {
    pub fn not_found(kind: ResourceKind, name: &str) -> Self {
        Self::NotFound {
            kind,
            name: name.to_string(),
        }
    }

    pub fn remote(operation: &str, summary: &str, detail: Option<String>) -> Self {
        Self::RemoteRejection(ResponseError {
            operation: operation.to_string(),
            summary: summary.to_string(),
            detail,
        })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl std::fmt::Display for LambdaCreatorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { kind, name } => write!(f, "{} {} not found", kind, name),
            Self::RemoteRejection(err) => write!(f, "{}", err),
            Self::ValidationFailure(result) => write!(f, "{}", result.message),
            Self::MalformedInput(msg) => write!(f, "malformed input: {}", msg),
        }
    }
}

impl std::error::Error for LambdaCreatorError {}
