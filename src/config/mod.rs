#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::adapters::github::DEFAULT_API_URL;
use crate::core::workspace;
use crate::domain::model::{
    Credential, DeployRequest, Manifest, DEFAULT_COMMIT_MESSAGE, DEFAULT_DESCRIPTION,
    DEFAULT_REPO,
};
use crate::utils::error::{DeployError, Result};
use crate::utils::validation::{self, Validate};
use std::path::PathBuf;

/// Values gathered from flags, environment and config file, before defaults.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub username: Option<String>,
    pub repo: Option<String>,
    pub token: Option<Credential>,
    pub source: Option<PathBuf>,
    pub workspace: Option<PathBuf>,
    pub manifest: Option<Manifest>,
    pub private: Option<bool>,
    pub description: Option<String>,
    pub commit_message: Option<String>,
    pub api_url: Option<String>,
    pub open_browser: Option<bool>,
}

impl Settings {
    /// Keep every value already set, take the rest from `fallback`.
    pub fn or(self, fallback: Settings) -> Settings {
        Settings {
            username: self.username.or(fallback.username),
            repo: self.repo.or(fallback.repo),
            token: self.token.or(fallback.token),
            source: self.source.or(fallback.source),
            workspace: self.workspace.or(fallback.workspace),
            manifest: self.manifest.or(fallback.manifest),
            private: self.private.or(fallback.private),
            description: self.description.or(fallback.description),
            commit_message: self.commit_message.or(fallback.commit_message),
            api_url: self.api_url.or(fallback.api_url),
            open_browser: self.open_browser.or(fallback.open_browser),
        }
    }

    /// Apply defaults and validate. Fails before any network activity.
    pub fn resolve(self) -> Result<DeployRequest> {
        let account = validation::validate_required_field("username", &self.username)?.clone();

        let credential = match self.token {
            Some(token) if !token.is_empty() => token,
            _ => return Err(DeployError::MissingCredentialError),
        };

        let repo = self.repo.unwrap_or_else(|| DEFAULT_REPO.to_string());
        let workspace = match self.workspace {
            Some(path) => path,
            None => workspace::default_workspace(&repo)?,
        };

        let request = DeployRequest {
            account,
            repo,
            credential,
            source_dir: self.source.unwrap_or_else(default_source_dir),
            workspace,
            manifest: self.manifest.unwrap_or_default(),
            private: self.private.unwrap_or(false),
            description: self
                .description
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            commit_message: self
                .commit_message
                .unwrap_or_else(|| DEFAULT_COMMIT_MESSAGE.to_string()),
            api_url: self.api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            open_browser: self.open_browser.unwrap_or(true),
        };

        request.validate()?;
        Ok(request)
    }
}

/// Directory holding the running executable, or `.` when it cannot be found.
pub fn default_source_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}

impl Validate for DeployRequest {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("username", &self.account)?;
        validation::validate_non_empty_string("repo", &self.repo)?;
        for (field, value) in [("username", &self.account), ("repo", &self.repo)] {
            if value.contains('/') || value.chars().any(char::is_whitespace) {
                return Err(DeployError::InvalidConfigValueError {
                    field: field.to_string(),
                    value: value.clone(),
                    reason: "Must not contain '/' or whitespace".to_string(),
                });
            }
        }

        validation::validate_url("api_url", &self.api_url)?;
        validation::validate_path("source", &self.source_dir)?;
        validation::validate_path("workspace", &self.workspace)?;
        validation::validate_non_empty_string("commit_message", &self.commit_message)?;

        for entry in self.manifest.entries() {
            validation::validate_manifest_entry("manifest", entry)?;
        }

        // 工作目錄每次都會被清空，不可與來源目錄重疊
        validation::validate_disjoint_dirs("workspace", &self.workspace, "source", &self.source_dir)?;

        Ok(())
    }
}
