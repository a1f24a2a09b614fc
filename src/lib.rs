pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliConfig;

pub use crate::adapters::{git::GitCli, github::GitHubClient};
pub use crate::config::{toml_config::FileConfig, Settings};
pub use crate::core::deploy::DeployEngine;
pub use crate::domain::model::{DeployReport, DeployRequest, Manifest, PagesStatus};
pub use crate::utils::error::{DeployError, Result};

/// Run a full deploy against the real GitHub API and the system `git`.
pub async fn deploy(request: &DeployRequest) -> Result<DeployReport> {
    let github = GitHubClient::new(request.api_url.clone(), request.credential.clone())?;
    let engine = DeployEngine::new(github, GitCli::new());
    engine.run(request).await
}
