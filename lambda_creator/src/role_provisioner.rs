// SPDX-FileCopyrightText: © 2026 The lambda_creator contributors
// SPDX-License-Identifier: MIT
use lambda_creator_api::common::LambdaCreatorResult;
use lambda_creator_api::identity::{IdentityAPI, PolicyDocument, RoleDescriptor, BASIC_EXECUTION_POLICY_ARN};
use lambda_creator_api::telemetry::{ControlPlaneEvent, EventHandle};


const ROLE_DESCRIPTION: &str = "IAM role for Lambda function execution created by LambdaCreator";
const STORAGE_POLICY_DESCRIPTION: &str = "Policy for Lambda function to access all S3 buckets";

/// Name of the storage-access policy created for a role.
pub fn storage_policy_name(role_name: &str) -> String {
    format!("{}-s3-access-policy", role_name)
}

/// Creates and removes the execution roles of the functions.
pub struct RoleProvisioner {
    identity: Box<dyn IdentityAPI>,
    events: EventHandle,
    propagation_delay: std::time::Duration,
}

impl RoleProvisioner {
    pub fn new(identity: Box<dyn IdentityAPI>, events: EventHandle, propagation_delay: std::time::Duration) -> Self {
        Self {
            identity,
            events: events.fork(std::collections::BTreeMap::from([("component".to_string(), "roles".to_string())])),
            propagation_delay,
        }
    }

    /// Create a role that the compute service can assume, with the baseline
    /// execution policy attached. Returns the ARN of the role.
    pub async fn create_role(&mut self, role_name: &str) -> LambdaCreatorResult<String> {
        self.events.observe(ControlPlaneEvent::Request {
            operation: "CreateRole".to_string(),
            target: role_name.to_string(),
        });
        let res = self
            .identity
            .create_role(role_name, &PolicyDocument::lambda_trust_policy(), ROLE_DESCRIPTION)
            .await;
        let role = self.events.report("CreateRole", role_name, res)?;

        let res = self.identity.attach_role_policy(role_name, BASIC_EXECUTION_POLICY_ARN).await;
        self.events.report("AttachRolePolicy", role_name, res)?;

        Ok(role.role_arn)
    }

    /// Create the storage-access policy of a role and attach it. Returns the ARN of the policy.
    pub async fn attach_storage_policy(&mut self, role_name: &str) -> LambdaCreatorResult<String> {
        let policy_name = storage_policy_name(role_name);
        let res = self
            .identity
            .create_policy(&policy_name, &PolicyDocument::storage_access_policy(), STORAGE_POLICY_DESCRIPTION)
            .await;
        let policy_arn = self.events.report("CreatePolicy", &policy_name, res)?;

        let res = self.identity.attach_role_policy(role_name, &policy_arn).await;
        self.events.report("AttachRolePolicy", role_name, res)?;

        Ok(policy_arn)
    }

    /// Create a standalone role named `lambda-s3-access-role-<unix seconds>`.
    pub async fn create_role_with_storage_access(&mut self) -> LambdaCreatorResult<RoleDescriptor> {
        let role_name = format!("lambda-s3-access-role-{}", crate::unix_seconds());
        self.provision(&role_name).await
    }

    /// Create the execution role of a function, named `<function>-role-<unix seconds>`.
    pub async fn provision_execution_role(&mut self, function_name: &str) -> LambdaCreatorResult<RoleDescriptor> {
        let role_name = format!("{}-role-{}", function_name, crate::unix_seconds());
        self.provision(&role_name).await
    }

    async fn provision(&mut self, role_name: &str) -> LambdaCreatorResult<RoleDescriptor> {
        let role_arn = self.create_role(role_name).await?;
        self.attach_storage_policy(role_name).await?;
        self.wait_for_propagation(role_name).await;
        Ok(RoleDescriptor {
            role_name: role_name.to_string(),
            role_arn,
        })
    }

    /// ARN of an existing role, `None` if there is no role with this name.
    pub async fn lookup_role_arn(&mut self, role_name: &str) -> LambdaCreatorResult<Option<String>> {
        let res = self.identity.get_role(role_name).await;
        let role = self.events.report("GetRole", role_name, res)?;
        Ok(role.map(|role| role.role_arn))
    }

    /// Remove a role together with its policies.
    ///
    /// Attached policies are detached first, the customer-managed ones among
    /// them are also deleted. Then the inline policies are deleted and finally
    /// the role itself. The first failure aborts the teardown.
    pub async fn teardown(&mut self, role_name: &str) -> LambdaCreatorResult<()> {
        self.events.observe(ControlPlaneEvent::Request {
            operation: "DeleteRole".to_string(),
            target: role_name.to_string(),
        });

        let res = self.identity.list_attached_role_policies(role_name).await;
        let attached = self.events.report("ListAttachedRolePolicies", role_name, res)?;
        for policy in attached {
            let res = self.identity.detach_role_policy(role_name, &policy.policy_arn).await;
            self.events.report("DetachRolePolicy", &policy.policy_arn, res)?;
            if !policy.is_managed() {
                let res = self.identity.delete_policy(&policy.policy_arn).await;
                self.events.report("DeletePolicy", &policy.policy_arn, res)?;
            }
        }

        let res = self.identity.list_role_policies(role_name).await;
        let inline = self.events.report("ListRolePolicies", role_name, res)?;
        for policy_name in inline {
            let res = self.identity.delete_role_policy(role_name, &policy_name).await;
            self.events.report("DeleteRolePolicy", &policy_name, res)?;
        }

        let res = self.identity.delete_role(role_name).await;
        self.events.report("DeleteRole", role_name, res)
    }

    /// Best-effort wait for a new role to become usable by the compute plane.
    pub async fn wait_for_propagation(&self, role_name: &str) {
        if self.propagation_delay.is_zero() {
            return;
        }
        self.events.observe(ControlPlaneEvent::Waiting {
            reason: format!("role {} to propagate", role_name),
            duration: self.propagation_delay,
        });
        tokio::time::sleep(self.propagation_delay).await;
    }
}
