// SPDX-FileCopyrightText: © 2026 The lambda_creator contributors
// SPDX-License-Identifier: MIT

/// Container registry control plane.
#[async_trait::async_trait]
pub trait RegistryAPI: Sync + Send {
    /// Pullable URI of a repository, `None` if the registry has no such repository.
    async fn repository_uri(&mut self, repository_name: &str) -> crate::common::LambdaCreatorResult<Option<String>>;
}
