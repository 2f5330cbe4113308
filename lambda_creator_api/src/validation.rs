// SPDX-FileCopyrightText: © 2026 The lambda_creator contributors
// SPDX-License-Identifier: MIT

//! Pre-checks of the parameters of a function, before anything is sent to
//! the control planes.
//!
//! Each rule is independent. The composite checks evaluate them in a fixed
//! order and stop at the first failure.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::function::{CreationRequest, UpdateRequest, VpcConfig};

static FUNCTION_NAME_RE: LazyLock<regex::Regex> = LazyLock::new(|| regex::Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap());
static ROLE_NAME_RE: LazyLock<regex::Regex> = LazyLock::new(|| regex::Regex::new(r"^[a-zA-Z0-9+=,.@_-]+$").unwrap());
static REPOSITORY_NAME_RE: LazyLock<regex::Regex> = LazyLock::new(|| regex::Regex::new(r"^[a-zA-Z0-9_/-]+$").unwrap());
static IMAGE_TAG_RE: LazyLock<regex::Regex> = LazyLock::new(|| regex::Regex::new(r"^[a-zA-Z0-9_.+-]+$").unwrap());
static ENV_KEY_RE: LazyLock<regex::Regex> = LazyLock::new(|| regex::Regex::new(r"^[a-zA-Z][a-zA-Z0-9_]*$").unwrap());

pub const MAX_FUNCTION_NAME_LEN: usize = 64;
pub const MAX_ROLE_NAME_LEN: usize = 64;
pub const MIN_REPOSITORY_NAME_LEN: usize = 2;
pub const MAX_REPOSITORY_NAME_LEN: usize = 256;
pub const MAX_IMAGE_TAG_LEN: usize = 128;
pub const MIN_MEMORY_SIZE: i32 = 128;
pub const MAX_MEMORY_SIZE: i32 = 10240;
pub const MEMORY_SIZE_STEP: i32 = 64;
pub const MIN_TIMEOUT: i32 = 1;
pub const MAX_TIMEOUT: i32 = 900;
/// Bytes, summed over all keys and values.
pub const MAX_ENVIRONMENT_SIZE: usize = 4096;
pub const MAX_TAG_KEY_LEN: usize = 128;
pub const MAX_TAG_VALUE_LEN: usize = 256;

pub const INVALID_FUNCTION_NAME: &str =
    "Invalid function name. Function names must be at most 64 characters and can contain only letters, numbers, hyphens, and underscores.";
pub const INVALID_REPOSITORY_NAME: &str = "Invalid ECR repository name. Repository names must be 2-256 characters and can contain only letters, numbers, hyphens, underscores, and forward slashes.";
pub const INVALID_ROLE_NAME: &str =
    "Invalid role name. Role names must be at most 64 characters and can contain only letters, numbers, and the following characters: +=,.@-_";
pub const INVALID_IMAGE_TAG: &str =
    "Invalid image tag. Image tags must be at most 128 characters and can contain only letters, numbers, hyphens, underscores, periods, and plus signs.";
pub const INVALID_MEMORY_SIZE: &str = "Invalid memory size. Memory size must be between 128 MB and 10240 MB (10 GB) and must be a multiple of 64 MB.";
pub const INVALID_TIMEOUT: &str = "Invalid timeout. Timeout must be between 1 second and 900 seconds (15 minutes).";
pub const INVALID_ENVIRONMENT: &str = "Invalid environment variables. Keys must start with a letter and contain only letters, numbers, and underscores. Total size cannot exceed 4 KB.";
pub const INVALID_TAGS: &str = "Invalid tags. Tag keys must be 1-128 characters. Tag values can be up to 256 characters.";
pub const INVALID_VPC_CONFIG: &str = "Invalid VPC configuration. VPC configuration must include subnet IDs and security group IDs.";
pub const ALL_VALID: &str = "All parameters are valid.";

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub message: String,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            message: ALL_VALID.to_string(),
        }
    }

    pub fn failed(message: &str) -> Self {
        Self {
            valid: false,
            message: message.to_string(),
        }
    }

    /// Turn a failed result into an error, for callers that abort on invalid input.
    pub fn into_result(self) -> crate::common::LambdaCreatorResult<()> {
        match self.valid {
            true => Ok(()),
            false => Err(crate::common::LambdaCreatorError::ValidationFailure(self)),
        }
    }
}

fn bounded_match(value: &str, min_len: usize, max_len: usize, re: &regex::Regex) -> bool {
    let len = value.chars().count();
    len >= min_len && len <= max_len && re.is_match(value)
}

pub fn validate_function_name(function_name: &str) -> bool {
    bounded_match(function_name, 1, MAX_FUNCTION_NAME_LEN, &FUNCTION_NAME_RE)
}

pub fn validate_role_name(role_name: &str) -> bool {
    bounded_match(role_name, 1, MAX_ROLE_NAME_LEN, &ROLE_NAME_RE)
}

pub fn validate_repository_name(repository_name: &str) -> bool {
    bounded_match(repository_name, MIN_REPOSITORY_NAME_LEN, MAX_REPOSITORY_NAME_LEN, &REPOSITORY_NAME_RE)
}

pub fn validate_image_tag(image_tag: &str) -> bool {
    bounded_match(image_tag, 1, MAX_IMAGE_TAG_LEN, &IMAGE_TAG_RE)
}

pub fn validate_memory_size(memory_size: i32) -> bool {
    (MIN_MEMORY_SIZE..=MAX_MEMORY_SIZE).contains(&memory_size) && memory_size % MEMORY_SIZE_STEP == 0
}

pub fn validate_timeout(timeout: i32) -> bool {
    (MIN_TIMEOUT..=MAX_TIMEOUT).contains(&timeout)
}

pub fn validate_environment_variables(environment: &HashMap<String, String>) -> bool {
    if !environment.keys().all(|key| ENV_KEY_RE.is_match(key)) {
        return false;
    }
    let total_size: usize = environment.iter().map(|(key, value)| key.len() + value.len()).sum();
    total_size <= MAX_ENVIRONMENT_SIZE
}

pub fn validate_tags(tags: &HashMap<String, String>) -> bool {
    tags.iter().all(|(key, value)| {
        let key_len = key.chars().count();
        key_len >= 1 && key_len <= MAX_TAG_KEY_LEN && value.chars().count() <= MAX_TAG_VALUE_LEN
    })
}

/// An absent configuration is valid, a present one needs at least one subnet and one security group.
pub fn validate_vpc_config(vpc_config: Option<&VpcConfig>) -> bool {
    match vpc_config {
        None => true,
        Some(vpc) => !vpc.subnet_ids.is_empty() && !vpc.security_group_ids.is_empty(),
    }
}

fn non_empty<T>(map: &Option<HashMap<String, T>>) -> Option<&HashMap<String, T>> {
    map.as_ref().filter(|x| !x.is_empty())
}

/// Check all the parameters of a creation request.
///
/// Order: function name, repository, role, image tag, memory, timeout,
/// environment, tags, network placement. Only the first failure is reported.
pub fn validate_input_parameters(request: &CreationRequest) -> ValidationResult {
    if !validate_function_name(&request.function_name) {
        return ValidationResult::failed(INVALID_FUNCTION_NAME);
    }
    if !validate_repository_name(&request.repository_name) {
        return ValidationResult::failed(INVALID_REPOSITORY_NAME);
    }
    if let Some(role_name) = request.role_name.as_deref().filter(|x| !x.is_empty()) {
        if !validate_role_name(role_name) {
            return ValidationResult::failed(INVALID_ROLE_NAME);
        }
    }
    if !validate_image_tag(&request.image_tag) {
        return ValidationResult::failed(INVALID_IMAGE_TAG);
    }
    if !validate_memory_size(request.memory_size) {
        return ValidationResult::failed(INVALID_MEMORY_SIZE);
    }
    if !validate_timeout(request.timeout) {
        return ValidationResult::failed(INVALID_TIMEOUT);
    }
    if let Some(environment) = non_empty(&request.environment) {
        if !validate_environment_variables(environment) {
            return ValidationResult::failed(INVALID_ENVIRONMENT);
        }
    }
    if let Some(tags) = non_empty(&request.tags) {
        if !validate_tags(tags) {
            return ValidationResult::failed(INVALID_TAGS);
        }
    }
    if !validate_vpc_config(request.vpc_config.as_ref()) {
        return ValidationResult::failed(INVALID_VPC_CONFIG);
    }
    ValidationResult::ok()
}

/// Same rules and order as [`validate_input_parameters`], applied to the fields an update sets.
pub fn validate_update_parameters(request: &UpdateRequest) -> ValidationResult {
    if !validate_function_name(&request.function_name) {
        return ValidationResult::failed(INVALID_FUNCTION_NAME);
    }
    if let Some(repository_name) = &request.repository_name {
        if !validate_repository_name(repository_name) {
            return ValidationResult::failed(INVALID_REPOSITORY_NAME);
        }
    }
    if let Some(role_name) = request.role_name.as_deref().filter(|x| !x.is_empty()) {
        if !validate_role_name(role_name) {
            return ValidationResult::failed(INVALID_ROLE_NAME);
        }
    }
    if request.repository_name.is_some() && !validate_image_tag(&request.image_tag) {
        return ValidationResult::failed(INVALID_IMAGE_TAG);
    }
    if let Some(memory_size) = request.memory_size {
        if !validate_memory_size(memory_size) {
            return ValidationResult::failed(INVALID_MEMORY_SIZE);
        }
    }
    if let Some(timeout) = request.timeout {
        if !validate_timeout(timeout) {
            return ValidationResult::failed(INVALID_TIMEOUT);
        }
    }
    if let Some(environment) = non_empty(&request.environment) {
        if !validate_environment_variables(environment) {
            return ValidationResult::failed(INVALID_ENVIRONMENT);
        }
    }
    if !validate_vpc_config(request.vpc_config.as_ref()) {
        return ValidationResult::failed(INVALID_VPC_CONFIG);
    }
    ValidationResult::ok()
}
