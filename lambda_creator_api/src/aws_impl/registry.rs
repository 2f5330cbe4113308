// SPDX-FileCopyrightText: © 2026 The lambda_creator contributors
// SPDX-License-Identifier: MIT
use crate::common::LambdaCreatorResult;

const REPOSITORY_NOT_FOUND: &str = "RepositoryNotFoundException";

pub struct EcrRegistryClient {
    client: aws_sdk_ecr::Client,
}

impl EcrRegistryClient {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_ecr::Client::new(config),
        }
    }
}

#[async_trait::async_trait]
impl crate::registry::RegistryAPI for EcrRegistryClient {
    async fn repository_uri(&mut self, repository_name: &str) -> LambdaCreatorResult<Option<String>> {
        match self.client.describe_repositories().repository_names(repository_name).send().await {
            Ok(res) => Ok(res
                .repositories()
                .iter()
                .find(|repo| repo.repository_name() == Some(repository_name))
                .or(res.repositories().first())
                .and_then(|repo| repo.repository_uri())
                .map(|uri| uri.to_string())),
            Err(err) if super::has_code(&err, REPOSITORY_NOT_FOUND) => Ok(None),
            Err(err) => Err(super::remote_rejection("DescribeRepositories", err)),
        }
    }
}
