// SPDX-FileCopyrightText: © 2026 The lambda_creator contributors
// SPDX-License-Identifier: MIT
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::{Environment, FunctionCode, PackageType};

use crate::common::{LambdaCreatorError, LambdaCreatorResult, ResourceKind};
use crate::function::*;
use crate::image::ImageReference;

const RESOURCE_NOT_FOUND: &str = "ResourceNotFoundException";

// The create, update and get outputs all expose the same configuration
// accessors but do not share a type.
macro_rules! function_configuration {
    ($src:expr) => {{
        let src = $src;
        FunctionConfiguration {
            function_name: src.function_name().map(|x| x.to_string()),
            function_arn: src.function_arn().map(|x| x.to_string()),
            role: src.role().map(|x| x.to_string()),
            package_type: src.package_type().map(|x| x.as_str().to_string()),
            description: src.description().map(|x| x.to_string()),
            timeout: src.timeout(),
            memory_size: src.memory_size(),
            last_modified: src.last_modified().map(|x| x.to_string()),
            state: src.state().map(|x| x.as_str().to_string()),
            state_reason: src.state_reason().map(|x| x.to_string()),
            last_update_status: src.last_update_status().map(|x| x.as_str().to_string()),
            version: src.version().map(|x| x.to_string()),
            environment: src
                .environment()
                .and_then(|env| env.variables())
                .map(|vars| vars.iter().map(|(k, v)| (k.clone(), v.clone())).collect()),
            vpc_config: src.vpc_config().map(|vpc| VpcConfig {
                subnet_ids: vpc.subnet_ids().to_vec(),
                security_group_ids: vpc.security_group_ids().to_vec(),
            }),
        }
    }};
}

fn sdk_vpc_config(vpc_config: VpcConfig) -> aws_sdk_lambda::types::VpcConfig {
    aws_sdk_lambda::types::VpcConfig::builder()
        .set_subnet_ids(Some(vpc_config.subnet_ids))
        .set_security_group_ids(Some(vpc_config.security_group_ids))
        .build()
}

fn sdk_environment(variables: std::collections::HashMap<String, String>) -> Environment {
    Environment::builder().set_variables(Some(variables)).build()
}

fn function_error<E>(operation: &str, function_name: &str, err: E) -> LambdaCreatorError
where
    E: aws_sdk_lambda::error::ProvideErrorMetadata + std::error::Error,
{
    match super::has_code(&err, RESOURCE_NOT_FOUND) {
        true => LambdaCreatorError::not_found(ResourceKind::Function, function_name),
        false => super::remote_rejection(operation, err),
    }
}

pub struct LambdaComputeClient {
    client: aws_sdk_lambda::Client,
}

impl LambdaComputeClient {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_lambda::Client::new(config),
        }
    }
}

#[async_trait::async_trait]
impl ComputeAPI for LambdaComputeClient {
    async fn create_function(&mut self, input: CreateFunctionInput) -> LambdaCreatorResult<FunctionConfiguration> {
        let function_name = input.function_name.clone();
        let mut request = self
            .client
            .create_function()
            .function_name(input.function_name)
            .role(input.role_arn)
            .package_type(PackageType::Image)
            .code(FunctionCode::builder().image_uri(input.image.to_string()).build())
            .description(input.description)
            .timeout(input.timeout)
            .memory_size(input.memory_size)
            .set_tags(Some(input.tags));
        if let Some(environment) = input.environment {
            request = request.environment(sdk_environment(environment));
        }
        if let Some(vpc_config) = input.vpc_config {
            request = request.vpc_config(sdk_vpc_config(vpc_config));
        }
        match request.send().await {
            Ok(res) => Ok(function_configuration!(&res)),
            Err(err) => Err(function_error("CreateFunction", &function_name, err)),
        }
    }

    async fn update_function_code(&mut self, function_name: &str, image: &ImageReference) -> LambdaCreatorResult<FunctionConfiguration> {
        match self
            .client
            .update_function_code()
            .function_name(function_name)
            .image_uri(image.to_string())
            .send()
            .await
        {
            Ok(res) => Ok(function_configuration!(&res)),
            Err(err) => Err(function_error("UpdateFunctionCode", function_name, err)),
        }
    }

    async fn update_function_configuration(&mut self, update: ConfigurationUpdate) -> LambdaCreatorResult<FunctionConfiguration> {
        let res = self
            .client
            .update_function_configuration()
            .function_name(&update.function_name)
            .set_role(update.role_arn)
            .set_memory_size(update.memory_size)
            .set_timeout(update.timeout)
            .set_description(update.description)
            .set_environment(update.environment.map(sdk_environment))
            .set_vpc_config(update.vpc_config.map(sdk_vpc_config))
            .send()
            .await;
        match res {
            Ok(res) => Ok(function_configuration!(&res)),
            Err(err) => Err(function_error("UpdateFunctionConfiguration", &update.function_name, err)),
        }
    }

    async fn get_function(&mut self, function_name: &str) -> LambdaCreatorResult<FunctionDescriptor> {
        match self.client.get_function().function_name(function_name).send().await {
            Ok(res) => Ok(FunctionDescriptor {
                configuration: res.configuration().map(|conf| function_configuration!(conf)).unwrap_or_default(),
                code: res.code().map(|code| CodeLocation {
                    repository_type: code.repository_type().map(|x| x.to_string()),
                    image_uri: code.image_uri().map(|x| x.to_string()),
                    resolved_image_uri: code.resolved_image_uri().map(|x| x.to_string()),
                }),
                tags: res
                    .tags()
                    .map(|tags| tags.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
                    .unwrap_or_default(),
            }),
            Err(err) => Err(function_error("GetFunction", function_name, err)),
        }
    }

    async fn list_functions(&mut self, marker: Option<String>, max_items: i32) -> LambdaCreatorResult<ListFunctionsPage> {
        match self.client.list_functions().set_marker(marker).max_items(max_items).send().await {
            Ok(res) => Ok(ListFunctionsPage {
                functions: res.functions().iter().map(|conf| function_configuration!(conf)).collect(),
                next_marker: res.next_marker().map(|x| x.to_string()),
            }),
            Err(err) => Err(super::remote_rejection("ListFunctions", err)),
        }
    }

    async fn delete_function(&mut self, function_name: &str) -> LambdaCreatorResult<DeleteFunctionResponse> {
        match self.client.delete_function().function_name(function_name).send().await {
            Ok(_) => Ok(DeleteFunctionResponse {
                function_name: function_name.to_string(),
                deleted: true,
            }),
            Err(err) => Err(function_error("DeleteFunction", function_name, err)),
        }
    }

    async fn invoke(
        &mut self,
        function_name: &str,
        invocation_type: InvocationType,
        payload: Option<Vec<u8>>,
    ) -> LambdaCreatorResult<RawInvocationResponse> {
        let res = self
            .client
            .invoke()
            .function_name(function_name)
            .invocation_type(aws_sdk_lambda::types::InvocationType::from(invocation_type.as_str()))
            .set_payload(payload.map(Blob::new))
            .send()
            .await;
        match res {
            Ok(res) => Ok(RawInvocationResponse {
                status_code: res.status_code(),
                function_error: res.function_error().map(|x| x.to_string()),
                executed_version: res.executed_version().map(|x| x.to_string()),
                payload: res.payload().map(|blob| blob.as_ref().to_vec()),
            }),
            Err(err) => Err(function_error("Invoke", function_name, err)),
        }
    }
}
