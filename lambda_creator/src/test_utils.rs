// SPDX-FileCopyrightText: © 2026 The lambda_creator contributors
// SPDX-License-Identifier: MIT
use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender};
use futures::SinkExt;
use lambda_creator_api::common::{LambdaCreatorError, LambdaCreatorResult, ResourceKind};
use lambda_creator_api::function::*;
use lambda_creator_api::identity::*;
use lambda_creator_api::image::ImageReference;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Every call received by a mock control plane, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum MockEvent {
    DescribeRepository(String),
    GetRole(String),
    CreateRole(String, PolicyDocument),
    AttachRolePolicy(String, String),
    DetachRolePolicy(String, String),
    CreatePolicy(String, PolicyDocument),
    DeletePolicy(String),
    ListAttachedRolePolicies(String),
    ListRolePolicies(String),
    DeleteRolePolicy(String, String),
    DeleteRole(String),
    CreateFunction(CreateFunctionInput),
    UpdateFunctionCode(String, ImageReference),
    UpdateFunctionConfiguration(ConfigurationUpdate),
    GetFunction(String),
    ListFunctions(Option<String>, i32),
    DeleteFunction(String),
    Invoke(String, InvocationType, Option<Vec<u8>>),
}

pub const ACCOUNT: &str = "123456789012";

pub fn role_arn(role_name: &str) -> String {
    format!("arn:aws:iam::{}:role/{}", ACCOUNT, role_name)
}

pub fn policy_arn(policy_name: &str) -> String {
    format!("arn:aws:iam::{}:policy/{}", ACCOUNT, policy_name)
}

/// Initial state of the mocked control planes.
#[derive(Default, Clone)]
pub struct MockCloud {
    pub repositories: std::collections::HashMap<String, String>,
    pub roles: std::collections::HashSet<String>,
    pub attached_policies: Vec<AttachedPolicy>,
    pub inline_policies: Vec<String>,
    pub functions: Vec<String>,
    pub invoke_payload: Option<Vec<u8>>,
    /// Operations that are rejected with an access-denied error.
    pub rejected: std::collections::HashSet<String>,
}

impl MockCloud {
    pub fn with_repository(mut self, name: &str, uri: &str) -> Self {
        self.repositories.insert(name.to_string(), uri.to_string());
        self
    }

    pub fn with_role(mut self, name: &str) -> Self {
        self.roles.insert(name.to_string());
        self
    }

    pub fn with_functions(mut self, names: &[&str]) -> Self {
        self.functions.extend(names.iter().map(|name| name.to_string()));
        self
    }

    pub fn rejecting(mut self, operation: &str) -> Self {
        self.rejected.insert(operation.to_string());
        self
    }

    pub fn function_manager(&self) -> (crate::function_manager::FunctionManager, UnboundedReceiver<MockEvent>) {
        let (sender, receiver) = futures::channel::mpsc::unbounded::<MockEvent>();
        (self.function_manager_on(sender), receiver)
    }

    pub fn role_provisioner(&self) -> (crate::role_provisioner::RoleProvisioner, UnboundedReceiver<MockEvent>) {
        let (sender, receiver) = futures::channel::mpsc::unbounded::<MockEvent>();
        (self.role_provisioner_on(sender), receiver)
    }

    /// Both components, reporting their calls on the same channel.
    pub fn lambda_creator(&self) -> (crate::LambdaCreator, UnboundedReceiver<MockEvent>) {
        let (sender, receiver) = futures::channel::mpsc::unbounded::<MockEvent>();
        let creator = crate::LambdaCreator {
            functions: self.function_manager_on(sender.clone()),
            roles: self.role_provisioner_on(sender),
        };
        (creator, receiver)
    }

    fn function_manager_on(&self, sender: UnboundedSender<MockEvent>) -> crate::function_manager::FunctionManager {
        crate::function_manager::FunctionManager::new(
            Box::new(MockCompute {
                state: self.clone(),
                sender: sender.clone(),
            }),
            Box::new(MockRegistry {
                state: self.clone(),
                sender: sender.clone(),
            }),
            Box::new(MockIdentity {
                state: self.clone(),
                sender,
            }),
            lambda_creator_api::telemetry::EventHandle::logger(),
            crate::function_manager::FunctionManagerSettings {
                role_propagation_delay: std::time::Duration::ZERO,
                list_page_size: 50,
            },
        )
    }

    fn role_provisioner_on(&self, sender: UnboundedSender<MockEvent>) -> crate::role_provisioner::RoleProvisioner {
        crate::role_provisioner::RoleProvisioner::new(
            Box::new(MockIdentity {
                state: self.clone(),
                sender,
            }),
            lambda_creator_api::telemetry::EventHandle::logger(),
            std::time::Duration::ZERO,
        )
    }
}

/// All the events received so far.
pub fn drain(receiver: &mut UnboundedReceiver<MockEvent>) -> Vec<MockEvent> {
    let mut events = vec![];
    while let Ok(event) = receiver.try_recv() {
        events.push(event);
    }
    events
}

fn check_rejected(state: &MockCloud, operation: &str) -> LambdaCreatorResult<()> {
    match state.rejected.contains(operation) {
        true => Err(LambdaCreatorError::remote(operation, "AccessDeniedException", Some("not authorized".to_string()))),
        false => Ok(()),
    }
}

pub struct MockRegistry {
    state: MockCloud,
    sender: UnboundedSender<MockEvent>,
}

#[async_trait::async_trait]
impl lambda_creator_api::registry::RegistryAPI for MockRegistry {
    async fn repository_uri(&mut self, repository_name: &str) -> LambdaCreatorResult<Option<String>> {
        self.sender.send(MockEvent::DescribeRepository(repository_name.to_string())).await.unwrap();
        check_rejected(&self.state, "DescribeRepositories")?;
        Ok(self.state.repositories.get(repository_name).cloned())
    }
}

pub struct MockIdentity {
    state: MockCloud,
    sender: UnboundedSender<MockEvent>,
}

#[async_trait::async_trait]
impl IdentityAPI for MockIdentity {
    async fn get_role(&mut self, role_name: &str) -> LambdaCreatorResult<Option<RoleDescriptor>> {
        self.sender.send(MockEvent::GetRole(role_name.to_string())).await.unwrap();
        check_rejected(&self.state, "GetRole")?;
        Ok(self.state.roles.get(role_name).map(|name| RoleDescriptor {
            role_name: name.clone(),
            role_arn: role_arn(name),
        }))
    }

    async fn create_role(&mut self, role_name: &str, trust_policy: &PolicyDocument, _description: &str) -> LambdaCreatorResult<RoleDescriptor> {
        self.sender
            .send(MockEvent::CreateRole(role_name.to_string(), trust_policy.clone()))
            .await
            .unwrap();
        check_rejected(&self.state, "CreateRole")?;
        if !self.state.roles.insert(role_name.to_string()) {
            return Err(LambdaCreatorError::remote(
                "CreateRole",
                "EntityAlreadyExists",
                Some(format!("Role with name {} already exists.", role_name)),
            ));
        }
        Ok(RoleDescriptor {
            role_name: role_name.to_string(),
            role_arn: role_arn(role_name),
        })
    }

    async fn attach_role_policy(&mut self, role_name: &str, policy_arn: &str) -> LambdaCreatorResult<()> {
        self.sender
            .send(MockEvent::AttachRolePolicy(role_name.to_string(), policy_arn.to_string()))
            .await
            .unwrap();
        check_rejected(&self.state, "AttachRolePolicy")
    }

    async fn detach_role_policy(&mut self, role_name: &str, policy_arn: &str) -> LambdaCreatorResult<()> {
        self.sender
            .send(MockEvent::DetachRolePolicy(role_name.to_string(), policy_arn.to_string()))
            .await
            .unwrap();
        check_rejected(&self.state, "DetachRolePolicy")
    }

    async fn create_policy(&mut self, policy_name: &str, document: &PolicyDocument, _description: &str) -> LambdaCreatorResult<String> {
        self.sender
            .send(MockEvent::CreatePolicy(policy_name.to_string(), document.clone()))
            .await
            .unwrap();
        check_rejected(&self.state, "CreatePolicy")?;
        Ok(policy_arn(policy_name))
    }

    async fn delete_policy(&mut self, policy_arn: &str) -> LambdaCreatorResult<()> {
        self.sender.send(MockEvent::DeletePolicy(policy_arn.to_string())).await.unwrap();
        check_rejected(&self.state, "DeletePolicy")
    }

    async fn list_attached_role_policies(&mut self, role_name: &str) -> LambdaCreatorResult<Vec<AttachedPolicy>> {
        self.sender.send(MockEvent::ListAttachedRolePolicies(role_name.to_string())).await.unwrap();
        check_rejected(&self.state, "ListAttachedRolePolicies")?;
        match self.state.roles.contains(role_name) {
            true => Ok(self.state.attached_policies.clone()),
            false => Err(LambdaCreatorError::not_found(ResourceKind::Role, role_name)),
        }
    }

    async fn list_role_policies(&mut self, role_name: &str) -> LambdaCreatorResult<Vec<String>> {
        self.sender.send(MockEvent::ListRolePolicies(role_name.to_string())).await.unwrap();
        check_rejected(&self.state, "ListRolePolicies")?;
        Ok(self.state.inline_policies.clone())
    }

    async fn delete_role_policy(&mut self, role_name: &str, policy_name: &str) -> LambdaCreatorResult<()> {
        self.sender
            .send(MockEvent::DeleteRolePolicy(role_name.to_string(), policy_name.to_string()))
            .await
            .unwrap();
        check_rejected(&self.state, "DeleteRolePolicy")
    }

    async fn delete_role(&mut self, role_name: &str) -> LambdaCreatorResult<()> {
        self.sender.send(MockEvent::DeleteRole(role_name.to_string())).await.unwrap();
        check_rejected(&self.state, "DeleteRole")?;
        match self.state.roles.remove(role_name) {
            true => Ok(()),
            false => Err(LambdaCreatorError::not_found(ResourceKind::Role, role_name)),
        }
    }
}

pub struct MockCompute {
    state: MockCloud,
    sender: UnboundedSender<MockEvent>,
}

impl MockCompute {
    fn configuration(function_name: &str) -> FunctionConfiguration {
        FunctionConfiguration {
            function_name: Some(function_name.to_string()),
            function_arn: Some(format!("arn:aws:lambda:eu-west-1:{}:function:{}", ACCOUNT, function_name)),
            package_type: Some("Image".to_string()),
            state: Some("Active".to_string()),
            ..Default::default()
        }
    }

    fn existing(&self, function_name: &str) -> LambdaCreatorResult<()> {
        match self.state.functions.iter().any(|name| name == function_name) {
            true => Ok(()),
            false => Err(LambdaCreatorError::not_found(ResourceKind::Function, function_name)),
        }
    }
}

#[async_trait::async_trait]
impl ComputeAPI for MockCompute {
    async fn create_function(&mut self, input: CreateFunctionInput) -> LambdaCreatorResult<FunctionConfiguration> {
        self.sender.send(MockEvent::CreateFunction(input.clone())).await.unwrap();
        check_rejected(&self.state, "CreateFunction")?;
        if self.existing(&input.function_name).is_ok() {
            return Err(LambdaCreatorError::remote(
                "CreateFunction",
                "ResourceConflictException",
                Some(format!("Function already exist: {}", input.function_name)),
            ));
        }
        self.state.functions.push(input.function_name.clone());
        Ok(FunctionConfiguration {
            role: Some(input.role_arn),
            description: Some(input.description),
            timeout: Some(input.timeout),
            memory_size: Some(input.memory_size),
            state: Some("Pending".to_string()),
            ..Self::configuration(&input.function_name)
        })
    }

    async fn update_function_code(&mut self, function_name: &str, image: &ImageReference) -> LambdaCreatorResult<FunctionConfiguration> {
        self.sender
            .send(MockEvent::UpdateFunctionCode(function_name.to_string(), image.clone()))
            .await
            .unwrap();
        check_rejected(&self.state, "UpdateFunctionCode")?;
        self.existing(function_name)?;
        Ok(Self::configuration(function_name))
    }

    async fn update_function_configuration(&mut self, update: ConfigurationUpdate) -> LambdaCreatorResult<FunctionConfiguration> {
        self.sender.send(MockEvent::UpdateFunctionConfiguration(update.clone())).await.unwrap();
        check_rejected(&self.state, "UpdateFunctionConfiguration")?;
        self.existing(&update.function_name)?;
        Ok(FunctionConfiguration {
            role: update.role_arn,
            memory_size: update.memory_size,
            timeout: update.timeout,
            description: update.description,
            environment: update.environment.map(|env| env.into_iter().collect()),
            vpc_config: update.vpc_config,
            ..Self::configuration(&update.function_name)
        })
    }

    async fn get_function(&mut self, function_name: &str) -> LambdaCreatorResult<FunctionDescriptor> {
        self.sender.send(MockEvent::GetFunction(function_name.to_string())).await.unwrap();
        check_rejected(&self.state, "GetFunction")?;
        self.existing(function_name)?;
        Ok(FunctionDescriptor {
            configuration: Self::configuration(function_name),
            code: Some(CodeLocation {
                repository_type: Some("ECR".to_string()),
                image_uri: Some(format!("{}.dkr.ecr.eu-west-1.amazonaws.com/{}:latest", ACCOUNT, function_name)),
                resolved_image_uri: None,
            }),
            tags: std::collections::BTreeMap::new(),
        })
    }

    /// Markers are the index of the first function of the next page.
    async fn list_functions(&mut self, marker: Option<String>, max_items: i32) -> LambdaCreatorResult<ListFunctionsPage> {
        self.sender.send(MockEvent::ListFunctions(marker.clone(), max_items)).await.unwrap();
        check_rejected(&self.state, "ListFunctions")?;
        let start = marker.map(|marker| marker.parse::<usize>().unwrap()).unwrap_or(0);
        let end = std::cmp::min(start + max_items as usize, self.state.functions.len());
        Ok(ListFunctionsPage {
            functions: self.state.functions[start..end].iter().map(|name| Self::configuration(name)).collect(),
            next_marker: match end < self.state.functions.len() {
                true => Some(end.to_string()),
                false => None,
            },
        })
    }

    async fn delete_function(&mut self, function_name: &str) -> LambdaCreatorResult<DeleteFunctionResponse> {
        self.sender.send(MockEvent::DeleteFunction(function_name.to_string())).await.unwrap();
        check_rejected(&self.state, "DeleteFunction")?;
        self.existing(function_name)?;
        self.state.functions.retain(|name| name != function_name);
        Ok(DeleteFunctionResponse {
            function_name: function_name.to_string(),
            deleted: true,
        })
    }

    async fn invoke(
        &mut self,
        function_name: &str,
        invocation_type: InvocationType,
        payload: Option<Vec<u8>>,
    ) -> LambdaCreatorResult<RawInvocationResponse> {
        self.sender
            .send(MockEvent::Invoke(function_name.to_string(), invocation_type, payload))
            .await
            .unwrap();
        check_rejected(&self.state, "Invoke")?;
        self.existing(function_name)?;
        Ok(RawInvocationResponse {
            status_code: match invocation_type {
                InvocationType::RequestResponse => 200,
                InvocationType::Event => 202,
                InvocationType::DryRun => 204,
            },
            function_error: None,
            executed_version: Some("$LATEST".to_string()),
            payload: match invocation_type {
                InvocationType::RequestResponse => self.state.invoke_payload.clone(),
                _ => None,
            },
        })
    }
}
