// SPDX-FileCopyrightText: © 2026 The lambda_creator contributors
// SPDX-License-Identifier: MIT
pub mod function_manager;
pub mod role_provisioner;
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

fn default_role_propagation_delay_secs() -> u64 {
    10
}

fn default_list_max_items() -> i32 {
    50
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct LambdaCreatorSettings {
    /// AWS region, if not set it is resolved from the environment.
    #[serde(default)]
    pub region: Option<String>,
    /// Named profile of the shared AWS configuration files.
    #[serde(default)]
    pub profile: Option<String>,
    /// Wait after creating a role, before the role is used by a function.
    #[serde(default = "default_role_propagation_delay_secs")]
    pub role_propagation_delay_secs: u64,
    #[serde(default = "default_list_max_items")]
    pub list_max_items: i32,
}

impl Default for LambdaCreatorSettings {
    fn default() -> Self {
        Self {
            region: None,
            profile: None,
            role_propagation_delay_secs: default_role_propagation_delay_secs(),
            list_max_items: default_list_max_items(),
        }
    }
}

impl LambdaCreatorSettings {
    pub fn role_propagation_delay(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.role_propagation_delay_secs)
    }
}

/// Components bound to the AWS control planes.
pub struct LambdaCreator {
    pub functions: function_manager::FunctionManager,
    pub roles: role_provisioner::RoleProvisioner,
}

pub async fn lambda_creator_connect(settings: &LambdaCreatorSettings, events: lambda_creator_api::telemetry::EventHandle) -> LambdaCreator {
    log::debug!("Settings: {:?}", settings);
    let sdk_config = lambda_creator_api::aws_impl::load_sdk_config(settings.region.as_deref(), settings.profile.as_deref()).await;
    log::info!(
        "Using AWS region {}",
        sdk_config.region().map(|region| region.to_string()).unwrap_or_else(|| "<unset>".to_string())
    );

    let functions = function_manager::FunctionManager::new(
        Box::new(lambda_creator_api::aws_impl::compute::LambdaComputeClient::new(&sdk_config)),
        Box::new(lambda_creator_api::aws_impl::registry::EcrRegistryClient::new(&sdk_config)),
        Box::new(lambda_creator_api::aws_impl::identity::IamIdentityClient::new(&sdk_config)),
        events.clone(),
        function_manager::FunctionManagerSettings {
            role_propagation_delay: settings.role_propagation_delay(),
            ..Default::default()
        },
    );
    let roles = role_provisioner::RoleProvisioner::new(
        Box::new(lambda_creator_api::aws_impl::identity::IamIdentityClient::new(&sdk_config)),
        events,
        settings.role_propagation_delay(),
    );
    LambdaCreator { functions, roles }
}

pub fn lambda_creator_default_conf() -> String {
    String::from(
        r##"# region = "eu-west-1"
# profile = "default"
role_propagation_delay_secs = 10
list_max_items = 50
"##,
    )
}

/// Seconds since the epoch, used to make generated role names unique.
pub(crate) fn unix_seconds() -> i64 {
    chrono::Utc::now().timestamp()
}
