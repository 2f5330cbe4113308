// SPDX-FileCopyrightText: © 2026 The lambda_creator contributors
// SPDX-License-Identifier: MIT
use crate::common::{LambdaCreatorError, LambdaCreatorResult};

pub const POLICY_VERSION: &str = "2012-10-17";
pub const LAMBDA_SERVICE_PRINCIPAL: &str = "lambda.amazonaws.com";
pub const BASIC_EXECUTION_POLICY_ARN: &str = "arn:aws:iam::aws:policy/service-role/AWSLambdaBasicExecutionRole";
/// Namespace of the policies owned by the platform, which cannot be deleted.
pub const MANAGED_POLICY_PREFIX: &str = "arn:aws:iam::aws:policy/";

const STORAGE_ACTIONS: [&str; 6] = [
    "s3:GetObject",
    "s3:PutObject",
    "s3:DeleteObject",
    "s3:ListBucket",
    "s3:GetBucketLocation",
    "s3:ListAllMyBuckets",
];
const STORAGE_RESOURCES: [&str; 2] = ["arn:aws:s3:::*", "arn:aws:s3:::*/*"];

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RoleDescriptor {
    pub role_name: String,
    pub role_arn: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedPolicy {
    pub policy_name: String,
    pub policy_arn: String,
}

impl AttachedPolicy {
    pub fn is_managed(&self) -> bool {
        is_managed_policy(&self.policy_arn)
    }
}

pub fn is_managed_policy(policy_arn: &str) -> bool {
    policy_arn.starts_with(MANAGED_POLICY_PREFIX)
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Principal {
    #[serde(rename = "Service")]
    pub service: String,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyStatement {
    pub effect: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub principal: Option<Principal>,
    pub action: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub resource: Vec<String>,
}

/// IAM policy document, used both for trust relationships and permissions.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    pub statement: Vec<PolicyStatement>,
}

impl PolicyDocument {
    /// Only the compute service may assume the role.
    pub fn lambda_trust_policy() -> Self {
        Self {
            version: POLICY_VERSION.to_string(),
            statement: vec![PolicyStatement {
                effect: "Allow".to_string(),
                principal: Some(Principal {
                    service: LAMBDA_SERVICE_PRINCIPAL.to_string(),
                }),
                action: vec!["sts:AssumeRole".to_string()],
                resource: vec![],
            }],
        }
    }

    /// Read, write, delete and list on every bucket and object.
    pub fn storage_access_policy() -> Self {
        Self {
            version: POLICY_VERSION.to_string(),
            statement: vec![PolicyStatement {
                effect: "Allow".to_string(),
                principal: None,
                action: STORAGE_ACTIONS.iter().map(|x| x.to_string()).collect(),
                resource: STORAGE_RESOURCES.iter().map(|x| x.to_string()).collect(),
            }],
        }
    }

    pub fn to_json(&self) -> LambdaCreatorResult<String> {
        serde_json::to_string(self).map_err(|err| LambdaCreatorError::MalformedInput(format!("cannot serialize policy document: {}", err)))
    }
}

/// Identity control plane: roles and their policies.
#[async_trait::async_trait]
pub trait IdentityAPI: Sync + Send {
    /// `None` if no role with this name exists.
    async fn get_role(&mut self, role_name: &str) -> LambdaCreatorResult<Option<RoleDescriptor>>;
    async fn create_role(&mut self, role_name: &str, trust_policy: &PolicyDocument, description: &str) -> LambdaCreatorResult<RoleDescriptor>;
    async fn attach_role_policy(&mut self, role_name: &str, policy_arn: &str) -> LambdaCreatorResult<()>;
    async fn detach_role_policy(&mut self, role_name: &str, policy_arn: &str) -> LambdaCreatorResult<()>;
    /// Create a custom policy, return its ARN.
    async fn create_policy(&mut self, policy_name: &str, document: &PolicyDocument, description: &str) -> LambdaCreatorResult<String>;
    async fn delete_policy(&mut self, policy_arn: &str) -> LambdaCreatorResult<()>;
    async fn list_attached_role_policies(&mut self, role_name: &str) -> LambdaCreatorResult<Vec<AttachedPolicy>>;
    /// Names of the inline policies of a role.
    async fn list_role_policies(&mut self, role_name: &str) -> LambdaCreatorResult<Vec<String>>;
    async fn delete_role_policy(&mut self, role_name: &str, policy_name: &str) -> LambdaCreatorResult<()>;
    async fn delete_role(&mut self, role_name: &str) -> LambdaCreatorResult<()>;
}
