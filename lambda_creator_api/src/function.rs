// SPDX-FileCopyrightText: © 2026 The lambda_creator contributors
// SPDX-License-Identifier: MIT
use std::collections::{BTreeMap, HashMap};

use crate::common::{LambdaCreatorError, LambdaCreatorResult};
use crate::image::ImageReference;

pub const DEFAULT_IMAGE_TAG: &str = "latest";
pub const DEFAULT_MEMORY_SIZE: i32 = 128;
pub const DEFAULT_TIMEOUT: i32 = 30;

/// Network placement of a function.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize)]
pub struct VpcConfig {
    #[serde(rename = "SubnetIds", default)]
    pub subnet_ids: Vec<String>,
    #[serde(rename = "SecurityGroupIds", default)]
    pub security_group_ids: Vec<String>,
}

impl VpcConfig {
    /// Neither subnets nor security groups, as parsed from `{}`.
    pub fn is_empty(&self) -> bool {
        self.subnet_ids.is_empty() && self.security_group_ids.is_empty()
    }
}

/// Request to create a function from a registry repository.
#[derive(Debug, Clone, PartialEq)]
pub struct CreationRequest {
    pub function_name: String,
    pub repository_name: String,
    /// Existing execution role. If `None` a new one is provisioned.
    pub role_name: Option<String>,
    pub image_tag: String,
    /// Memory size, in MB.
    pub memory_size: i32,
    /// Timeout, in seconds.
    pub timeout: i32,
    pub description: String,
    pub environment: Option<HashMap<String, String>>,
    pub tags: Option<HashMap<String, String>>,
    pub vpc_config: Option<VpcConfig>,
}

impl CreationRequest {
    pub fn new(function_name: &str, repository_name: &str) -> Self {
        Self {
            function_name: function_name.to_string(),
            repository_name: repository_name.to_string(),
            role_name: None,
            image_tag: DEFAULT_IMAGE_TAG.to_string(),
            memory_size: DEFAULT_MEMORY_SIZE,
            timeout: DEFAULT_TIMEOUT,
            description: String::new(),
            environment: None,
            tags: None,
            vpc_config: None,
        }
    }
}

/// Request to update an existing function. Only the fields set are changed.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateRequest {
    pub function_name: String,
    /// If set, the function code is switched to `<repository>:<image_tag>`.
    pub repository_name: Option<String>,
    pub image_tag: String,
    pub role_name: Option<String>,
    pub memory_size: Option<i32>,
    pub timeout: Option<i32>,
    pub environment: Option<HashMap<String, String>>,
    pub description: Option<String>,
    pub vpc_config: Option<VpcConfig>,
}

impl UpdateRequest {
    pub fn new(function_name: &str) -> Self {
        Self {
            function_name: function_name.to_string(),
            repository_name: None,
            image_tag: DEFAULT_IMAGE_TAG.to_string(),
            role_name: None,
            memory_size: None,
            timeout: None,
            environment: None,
            description: None,
            vpc_config: None,
        }
    }
}

/// Create call submitted to the compute control plane. The package type is always a container image.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateFunctionInput {
    pub function_name: String,
    pub role_arn: String,
    pub image: ImageReference,
    pub description: String,
    pub timeout: i32,
    pub memory_size: i32,
    pub environment: Option<HashMap<String, String>>,
    pub tags: HashMap<String, String>,
    pub vpc_config: Option<VpcConfig>,
}

/// Configuration-update call submitted to the compute control plane.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigurationUpdate {
    pub function_name: String,
    pub role_arn: Option<String>,
    pub memory_size: Option<i32>,
    pub timeout: Option<i32>,
    pub environment: Option<HashMap<String, String>>,
    pub description: Option<String>,
    pub vpc_config: Option<VpcConfig>,
}

impl ConfigurationUpdate {
    pub fn empty(function_name: &str) -> Self {
        Self {
            function_name: function_name.to_string(),
            role_arn: None,
            memory_size: None,
            timeout: None,
            environment: None,
            description: None,
            vpc_config: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.role_arn.is_none()
            && self.memory_size.is_none()
            && self.timeout.is_none()
            && self.environment.is_none()
            && self.description.is_none()
            && self.vpc_config.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FunctionConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_size: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vpc_config: Option<VpcConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CodeLocation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_image_uri: Option<String>,
}

/// Current state of a function, as returned by a get call.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FunctionDescriptor {
    pub configuration: FunctionConfiguration,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeLocation>,
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListFunctionsPage {
    pub functions: Vec<FunctionConfiguration>,
    pub next_marker: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteFunctionResponse {
    pub function_name: String,
    pub deleted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvocationType {
    /// Synchronous, the response carries the function result.
    #[default]
    RequestResponse,
    /// Asynchronous, queued by the compute plane.
    Event,
    /// Only checks parameters and permissions.
    DryRun,
}

impl InvocationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RequestResponse => "RequestResponse",
            Self::Event => "Event",
            Self::DryRun => "DryRun",
        }
    }
}

impl std::fmt::Display for InvocationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for InvocationType {
    type Err = LambdaCreatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RequestResponse" => Ok(Self::RequestResponse),
            "Event" => Ok(Self::Event),
            "DryRun" => Ok(Self::DryRun),
            _ => Err(LambdaCreatorError::MalformedInput(format!(
                "unknown invocation type '{}', expected one of: RequestResponse, Event, DryRun",
                s
            ))),
        }
    }
}

/// Invocation response as returned by the compute control plane, body still encoded.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawInvocationResponse {
    pub status_code: i32,
    pub function_error: Option<String>,
    pub executed_version: Option<String>,
    pub payload: Option<Vec<u8>>,
}

/// Decoded invocation result body.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum ResponsePayload {
    Json(serde_json::Value),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InvocationResult {
    pub status_code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executed_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_payload: Option<ResponsePayload>,
}

/// Compute control plane managing functions packaged as container images.
#[async_trait::async_trait]
pub trait ComputeAPI: Sync + Send {
    async fn create_function(&mut self, input: CreateFunctionInput) -> LambdaCreatorResult<FunctionConfiguration>;
    async fn update_function_code(&mut self, function_name: &str, image: &ImageReference) -> LambdaCreatorResult<FunctionConfiguration>;
    async fn update_function_configuration(&mut self, update: ConfigurationUpdate) -> LambdaCreatorResult<FunctionConfiguration>;
    async fn get_function(&mut self, function_name: &str) -> LambdaCreatorResult<FunctionDescriptor>;
    /// One page of at most `max_items` functions, starting at `marker`.
    async fn list_functions(&mut self, marker: Option<String>, max_items: i32) -> LambdaCreatorResult<ListFunctionsPage>;
    async fn delete_function(&mut self, function_name: &str) -> LambdaCreatorResult<DeleteFunctionResponse>;
    async fn invoke(
        &mut self,
        function_name: &str,
        invocation_type: InvocationType,
        payload: Option<Vec<u8>>,
    ) -> LambdaCreatorResult<RawInvocationResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_type_from_str() {
        assert_eq!(InvocationType::RequestResponse, "RequestResponse".parse().unwrap());
        assert_eq!(InvocationType::Event, "Event".parse().unwrap());
        assert_eq!(InvocationType::DryRun, "DryRun".parse().unwrap());
        assert!("event".parse::<InvocationType>().is_err());
        assert_eq!(InvocationType::default().to_string(), "RequestResponse");
    }

    #[test]
    fn test_vpc_config_json() {
        let vpc: VpcConfig = serde_json::from_str(r#"{"SubnetIds": ["subnet-1"], "SecurityGroupIds": ["sg-1", "sg-2"]}"#).unwrap();
        assert_eq!(vec!["subnet-1".to_string()], vpc.subnet_ids);
        assert_eq!(2, vpc.security_group_ids.len());

        assert!(!vpc.is_empty());

        let vpc: VpcConfig = serde_json::from_str("{}").unwrap();
        assert!(vpc.subnet_ids.is_empty() && vpc.security_group_ids.is_empty());
        assert!(vpc.is_empty());
    }

    #[test]
    fn test_configuration_update_is_empty() {
        let mut update = ConfigurationUpdate::empty("f");
        assert!(update.is_empty());
        update.timeout = Some(60);
        assert!(!update.is_empty());
    }

    #[test]
    fn test_invocation_result_serialization() {
        let result = InvocationResult {
            status_code: 200,
            function_error: None,
            executed_version: Some("$LATEST".to_string()),
            response_payload: Some(ResponsePayload::Text("plain".to_string())),
        };
        assert_eq!(
            serde_json::json!({"StatusCode": 200, "ExecutedVersion": "$LATEST", "ResponsePayload": "plain"}),
            serde_json::to_value(&result).unwrap()
        );
    }
}
