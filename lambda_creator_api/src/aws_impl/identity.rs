// SPDX-FileCopyrightText: © 2026 The lambda_creator contributors
// SPDX-License-Identifier: MIT
use crate::common::{LambdaCreatorError, LambdaCreatorResult, ResourceKind};
use crate::identity::*;

const NO_SUCH_ENTITY: &str = "NoSuchEntity";

fn entity_error<E>(operation: &str, kind: ResourceKind, name: &str, err: E) -> LambdaCreatorError
where
    E: aws_sdk_iam::error::ProvideErrorMetadata + std::error::Error,
{
    match super::has_code(&err, NO_SUCH_ENTITY) {
        true => LambdaCreatorError::not_found(kind, name),
        false => super::remote_rejection(operation, err),
    }
}

pub struct IamIdentityClient {
    client: aws_sdk_iam::Client,
}

impl IamIdentityClient {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_iam::Client::new(config),
        }
    }
}

#[async_trait::async_trait]
impl IdentityAPI for IamIdentityClient {
    async fn get_role(&mut self, role_name: &str) -> LambdaCreatorResult<Option<RoleDescriptor>> {
        match self.client.get_role().role_name(role_name).send().await {
            Ok(res) => Ok(res.role().map(|role| RoleDescriptor {
                role_name: role.role_name().to_string(),
                role_arn: role.arn().to_string(),
            })),
            Err(err) if super::has_code(&err, NO_SUCH_ENTITY) => Ok(None),
            Err(err) => Err(super::remote_rejection("GetRole", err)),
        }
    }

    async fn create_role(&mut self, role_name: &str, trust_policy: &PolicyDocument, description: &str) -> LambdaCreatorResult<RoleDescriptor> {
        let res = self
            .client
            .create_role()
            .role_name(role_name)
            .assume_role_policy_document(trust_policy.to_json()?)
            .description(description)
            .send()
            .await
            .map_err(|err| super::remote_rejection("CreateRole", err))?;
        match res.role() {
            Some(role) => Ok(RoleDescriptor {
                role_name: role.role_name().to_string(),
                role_arn: role.arn().to_string(),
            }),
            None => Err(LambdaCreatorError::remote("CreateRole", "empty response", None)),
        }
    }

    async fn attach_role_policy(&mut self, role_name: &str, policy_arn: &str) -> LambdaCreatorResult<()> {
        match self.client.attach_role_policy().role_name(role_name).policy_arn(policy_arn).send().await {
            Ok(_) => Ok(()),
            Err(err) => Err(entity_error("AttachRolePolicy", ResourceKind::Role, role_name, err)),
        }
    }

    async fn detach_role_policy(&mut self, role_name: &str, policy_arn: &str) -> LambdaCreatorResult<()> {
        match self.client.detach_role_policy().role_name(role_name).policy_arn(policy_arn).send().await {
            Ok(_) => Ok(()),
            Err(err) => Err(entity_error("DetachRolePolicy", ResourceKind::Role, role_name, err)),
        }
    }

    async fn create_policy(&mut self, policy_name: &str, document: &PolicyDocument, description: &str) -> LambdaCreatorResult<String> {
        let res = self
            .client
            .create_policy()
            .policy_name(policy_name)
            .policy_document(document.to_json()?)
            .description(description)
            .send()
            .await
            .map_err(|err| super::remote_rejection("CreatePolicy", err))?;
        match res.policy().and_then(|policy| policy.arn()) {
            Some(arn) => Ok(arn.to_string()),
            None => Err(LambdaCreatorError::remote("CreatePolicy", "response without policy ARN", None)),
        }
    }

    async fn delete_policy(&mut self, policy_arn: &str) -> LambdaCreatorResult<()> {
        match self.client.delete_policy().policy_arn(policy_arn).send().await {
            Ok(_) => Ok(()),
            Err(err) => Err(entity_error("DeletePolicy", ResourceKind::Policy, policy_arn, err)),
        }
    }

    async fn list_attached_role_policies(&mut self, role_name: &str) -> LambdaCreatorResult<Vec<AttachedPolicy>> {
        let mut policies = vec![];
        let mut marker: Option<String> = None;
        loop {
            let res = self
                .client
                .list_attached_role_policies()
                .role_name(role_name)
                .set_marker(marker.take())
                .send()
                .await
                .map_err(|err| entity_error("ListAttachedRolePolicies", ResourceKind::Role, role_name, err))?;
            policies.extend(res.attached_policies().iter().filter_map(|policy| {
                policy.policy_arn().map(|arn| AttachedPolicy {
                    policy_name: policy.policy_name().unwrap_or_default().to_string(),
                    policy_arn: arn.to_string(),
                })
            }));
            match (res.is_truncated(), res.marker()) {
                (true, Some(next)) => marker = Some(next.to_string()),
                _ => break,
            }
        }
        Ok(policies)
    }

    async fn list_role_policies(&mut self, role_name: &str) -> LambdaCreatorResult<Vec<String>> {
        let mut names = vec![];
        let mut marker: Option<String> = None;
        loop {
            let res = self
                .client
                .list_role_policies()
                .role_name(role_name)
                .set_marker(marker.take())
                .send()
                .await
                .map_err(|err| entity_error("ListRolePolicies", ResourceKind::Role, role_name, err))?;
            names.extend(res.policy_names().iter().cloned());
            match (res.is_truncated(), res.marker()) {
                (true, Some(next)) => marker = Some(next.to_string()),
                _ => break,
            }
        }
        Ok(names)
    }

    async fn delete_role_policy(&mut self, role_name: &str, policy_name: &str) -> LambdaCreatorResult<()> {
        match self.client.delete_role_policy().role_name(role_name).policy_name(policy_name).send().await {
            Ok(_) => Ok(()),
            Err(err) => Err(entity_error("DeleteRolePolicy", ResourceKind::Role, role_name, err)),
        }
    }

    async fn delete_role(&mut self, role_name: &str) -> LambdaCreatorResult<()> {
        match self.client.delete_role().role_name(role_name).send().await {
            Ok(_) => Ok(()),
            Err(err) => Err(entity_error("DeleteRole", ResourceKind::Role, role_name, err)),
        }
    }
}
