// SPDX-FileCopyrightText: © 2026 The lambda_creator contributors
// SPDX-License-Identifier: MIT
pub mod compute;
pub mod identity;
pub mod registry;

use aws_sdk_lambda::error::{DisplayErrorContext, ProvideErrorMetadata};

use crate::common::LambdaCreatorError;

/// Load the shared SDK configuration. Region and profile fall back to the
/// environment and the shared configuration files when not given.
pub async fn load_sdk_config(region: Option<&str>, profile: Option<&str>) -> aws_config::SdkConfig {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
    if let Some(region) = region {
        loader = loader.region(aws_config::Region::new(region.to_string()));
    }
    if let Some(profile) = profile {
        loader = loader.profile_name(profile);
    }
    loader.load().await
}

/// Error code reported by the service, if any.
pub(crate) fn has_code<E: ProvideErrorMetadata>(err: &E, code: &str) -> bool {
    err.code() == Some(code)
}

pub(crate) fn remote_rejection<E>(operation: &str, err: E) -> LambdaCreatorError
where
    E: ProvideErrorMetadata + std::error::Error,
{
    let summary = err.code().unwrap_or("unhandled error").to_string();
    let detail = match err.message() {
        Some(message) => message.to_string(),
        None => DisplayErrorContext(&err).to_string(),
    };
    log::debug!("{} rejected: {}", operation, DisplayErrorContext(&err));
    LambdaCreatorError::remote(operation, &summary, Some(detail))
}
