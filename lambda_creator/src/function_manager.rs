// SPDX-FileCopyrightText: © 2026 The lambda_creator contributors
// SPDX-License-Identifier: MIT
use lambda_creator_api::common::{LambdaCreatorError, LambdaCreatorResult, ResourceKind};
use lambda_creator_api::function::*;
use lambda_creator_api::identity::IdentityAPI;
use lambda_creator_api::image::ImageReference;
use lambda_creator_api::registry::RegistryAPI;
use lambda_creator_api::telemetry::{ControlPlaneEvent, EventHandle};

use crate::role_provisioner::RoleProvisioner;

#[cfg(test)]
mod test;

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionManagerSettings {
    /// Wait after provisioning a role for a new function.
    pub role_propagation_delay: std::time::Duration,
    /// Largest page requested from the compute plane when listing.
    pub list_page_size: i32,
}

impl Default for FunctionManagerSettings {
    fn default() -> Self {
        Self {
            role_propagation_delay: std::time::Duration::from_secs(10),
            list_page_size: 50,
        }
    }
}

/// Result of an update: the configuration after a configuration change, or
/// the current state if only the code (or nothing) was changed.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum UpdateResponse {
    Configured(FunctionConfiguration),
    Unchanged(FunctionDescriptor),
}

/// Decode an invocation result body: JSON if possible, text otherwise.
pub fn decode_payload(payload: Option<Vec<u8>>) -> Option<ResponsePayload> {
    let payload = payload.filter(|payload| !payload.is_empty())?;
    let text = String::from_utf8_lossy(&payload).into_owned();
    match serde_json::from_str::<serde_json::Value>(&text) {
        Ok(val) => Some(ResponsePayload::Json(val)),
        Err(_) => Some(ResponsePayload::Text(text)),
    }
}

pub struct FunctionManager {
    compute: Box<dyn ComputeAPI>,
    registry: Box<dyn RegistryAPI>,
    roles: RoleProvisioner,
    events: EventHandle,
    settings: FunctionManagerSettings,
}

impl FunctionManager {
    pub fn new(
        compute: Box<dyn ComputeAPI>,
        registry: Box<dyn RegistryAPI>,
        identity: Box<dyn IdentityAPI>,
        events: EventHandle,
        settings: FunctionManagerSettings,
    ) -> Self {
        Self {
            compute,
            registry,
            roles: RoleProvisioner::new(identity, events.clone(), settings.role_propagation_delay),
            events: events.fork(std::collections::BTreeMap::from([("component".to_string(), "functions".to_string())])),
            settings,
        }
    }

    /// Create a function from the image `<repository>:<tag>`.
    ///
    /// The repository and the role (or a new one, if no role is given) are
    /// resolved before the compute plane is contacted.
    pub async fn create(&mut self, request: CreationRequest) -> LambdaCreatorResult<FunctionConfiguration> {
        self.events.observe(ControlPlaneEvent::Request {
            operation: "CreateFunction".to_string(),
            target: request.function_name.clone(),
        });
        let repository_uri = self.resolve_repository(&request.repository_name).await?;
        self.create_from(request, &repository_uri).await
    }

    /// Like `create`, but an existing function with the same name is deleted first.
    pub async fn create_or_replace(&mut self, request: CreationRequest) -> LambdaCreatorResult<FunctionConfiguration> {
        self.events.observe(ControlPlaneEvent::Request {
            operation: "CreateFunction".to_string(),
            target: request.function_name.clone(),
        });
        let repository_uri = self.resolve_repository(&request.repository_name).await?;

        let existing = self.compute.get_function(&request.function_name).await;
        match existing {
            Ok(_) => {
                log::info!("Function {} exists, deleting it", request.function_name);
                self.delete(&request.function_name).await?;
            }
            Err(err) if err.is_not_found() => {}
            Err(err) => return self.events.report("GetFunction", &request.function_name, Err(err)),
        }

        self.create_from(request, &repository_uri).await
    }

    async fn create_from(&mut self, request: CreationRequest, repository_uri: &str) -> LambdaCreatorResult<FunctionConfiguration> {
        let role_arn = match non_empty(&request.role_name) {
            Some(role_name) => self.resolve_role(role_name).await?,
            None => self.roles.provision_execution_role(&request.function_name).await?.role_arn,
        };

        let function_name = request.function_name.clone();
        let input = CreateFunctionInput {
            function_name: request.function_name,
            role_arn,
            image: ImageReference::new(repository_uri, &request.image_tag),
            description: request.description,
            timeout: request.timeout,
            memory_size: request.memory_size,
            environment: request.environment.filter(|environment| !environment.is_empty()),
            tags: request.tags.unwrap_or_default(),
            vpc_config: request.vpc_config.filter(|vpc_config| !vpc_config.is_empty()),
        };
        log::debug!("Creating function {} from image {}", function_name, input.image);
        let res = self.compute.create_function(input).await;
        self.events.report("CreateFunction", &function_name, res)
    }

    /// Change the image and/or the configuration of an existing function.
    ///
    /// Repository and role are resolved before any change is submitted. The
    /// image is switched first, then all configuration changes are submitted
    /// together.
    pub async fn update(&mut self, request: UpdateRequest) -> LambdaCreatorResult<UpdateResponse> {
        let function_name = request.function_name.clone();
        self.events.observe(ControlPlaneEvent::Request {
            operation: "UpdateFunction".to_string(),
            target: function_name.clone(),
        });

        let image = match &request.repository_name {
            Some(repository_name) => Some(ImageReference::new(&self.resolve_repository(repository_name).await?, &request.image_tag)),
            None => None,
        };
        let role_arn = match non_empty(&request.role_name) {
            Some(role_name) => Some(self.resolve_role(role_name).await?),
            None => None,
        };

        if let Some(image) = image {
            let res = self.compute.update_function_code(&function_name, &image).await;
            self.events.report("UpdateFunctionCode", &function_name, res)?;
        }

        // Empty values leave the current configuration untouched.
        let update = ConfigurationUpdate {
            function_name: function_name.clone(),
            role_arn,
            memory_size: request.memory_size,
            timeout: request.timeout,
            environment: request.environment.filter(|environment| !environment.is_empty()),
            description: request.description.filter(|description| !description.is_empty()),
            vpc_config: request.vpc_config.filter(|vpc_config| !vpc_config.is_empty()),
        };
        if update.is_empty() {
            return Ok(UpdateResponse::Unchanged(self.get(&function_name).await?));
        }
        let res = self.compute.update_function_configuration(update).await;
        Ok(UpdateResponse::Configured(self.events.report(
            "UpdateFunctionConfiguration",
            &function_name,
            res,
        )?))
    }

    pub async fn invoke(
        &mut self,
        function_name: &str,
        payload: Option<serde_json::Value>,
        invocation_type: InvocationType,
    ) -> LambdaCreatorResult<InvocationResult> {
        let payload = match payload {
            Some(payload) => Some(
                serde_json::to_vec(&payload)
                    .map_err(|err| LambdaCreatorError::MalformedInput(format!("cannot serialize payload: {}", err)))?,
            ),
            None => None,
        };
        let res = self.compute.invoke(function_name, invocation_type, payload).await;
        let raw = self.events.report("Invoke", function_name, res)?;
        Ok(InvocationResult {
            status_code: raw.status_code,
            function_error: raw.function_error,
            executed_version: raw.executed_version,
            response_payload: decode_payload(raw.payload),
        })
    }

    pub async fn get(&mut self, function_name: &str) -> LambdaCreatorResult<FunctionDescriptor> {
        let res = self.compute.get_function(function_name).await;
        self.events.report("GetFunction", function_name, res)
    }

    /// At most `max_items` functions, following the continuation markers.
    pub async fn list(&mut self, max_items: i32) -> LambdaCreatorResult<Vec<FunctionConfiguration>> {
        let mut functions = vec![];
        let mut marker: Option<String> = None;
        while (functions.len() as i32) < max_items {
            let page_size = std::cmp::min(max_items - functions.len() as i32, self.settings.list_page_size);
            let res = self.compute.list_functions(marker.take(), page_size).await;
            let page = self.events.report("ListFunctions", "*", res)?;
            functions.extend(page.functions);
            match page.next_marker {
                Some(next) => marker = Some(next),
                None => break,
            }
        }
        functions.truncate(std::cmp::max(max_items, 0) as usize);
        Ok(functions)
    }

    pub async fn delete(&mut self, function_name: &str) -> LambdaCreatorResult<DeleteFunctionResponse> {
        let res = self.compute.delete_function(function_name).await;
        self.events.report("DeleteFunction", function_name, res)
    }

    async fn resolve_repository(&mut self, repository_name: &str) -> LambdaCreatorResult<String> {
        let res = self.registry.repository_uri(repository_name).await.and_then(|uri| match uri {
            Some(uri) => Ok(uri),
            None => Err(LambdaCreatorError::not_found(ResourceKind::Repository, repository_name)),
        });
        self.events.report("DescribeRepositories", repository_name, res)
    }

    async fn resolve_role(&mut self, role_name: &str) -> LambdaCreatorResult<String> {
        let res = self.roles.lookup_role_arn(role_name).await.and_then(|arn| match arn {
            Some(arn) => Ok(arn),
            None => Err(LambdaCreatorError::not_found(ResourceKind::Role, role_name)),
        });
        self.events.report("ResolveRole", role_name, res)
    }
}

fn non_empty(name: &Option<String>) -> Option<&str> {
    name.as_deref().filter(|name| !name.is_empty())
}
