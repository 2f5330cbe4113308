// SPDX-FileCopyrightText: © 2026 The lambda_creator contributors
// SPDX-License-Identifier: MIT

use crate::common::{LambdaCreatorError, LambdaCreatorResult};

/// Pullable container image: a registry repository URI plus a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    pub repository_uri: String,
    pub tag: String,
}

impl ImageReference {
    pub fn new(repository_uri: &str, tag: &str) -> Self {
        Self {
            repository_uri: repository_uri.to_string(),
            tag: tag.to_string(),
        }
    }

    /// Parse `<uri>:<tag>`.
    ///
    /// The tag separator is the last colon following the last slash, so that
    /// a registry host with a port (`host:5000/repo:tag`) is handled.
    pub fn parse(raw: &str) -> LambdaCreatorResult<Self> {
        let path_start = raw.rfind('/').map(|pos| pos + 1).unwrap_or(0);
        match raw[path_start..].rfind(':') {
            Some(pos) => {
                let (uri, tag) = raw.split_at(path_start + pos);
                let tag = &tag[1..];
                if uri.is_empty() || tag.is_empty() {
                    return Err(LambdaCreatorError::MalformedInput(format!("invalid image reference: {}", raw)));
                }
                Ok(Self::new(uri, tag))
            }
            None => Err(LambdaCreatorError::MalformedInput(format!("image reference without a tag: {}", raw))),
        }
    }
}

impl std::fmt::Display for ImageReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.repository_uri, self.tag)
    }
}

impl std::str::FromStr for ImageReference {
    type Err = LambdaCreatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
