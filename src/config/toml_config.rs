use crate::config::Settings;
use crate::domain::model::{Credential, Manifest};
use crate::utils::error::{DeployError, Result};
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Optional `deploy.toml`. Every field may be omitted; flags win over it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub github: GithubConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub deploy: DeploySection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GithubConfig {
    pub username: Option<String>,
    pub repo: Option<String>,
    pub token: Option<String>,
    pub private: Option<bool>,
    pub description: Option<String>,
    pub api_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    pub source: Option<PathBuf>,
    pub manifest: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeploySection {
    pub workspace: Option<PathBuf>,
    pub commit_message: Option<String>,
    pub open_browser: Option<bool>,
}

impl FileConfig {
    /// 從 TOML 檔案載入配置，相對路徑以設定檔所在目錄為基準
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(DeployError::IoError)?;
        let mut config = Self::from_toml_str(&content)?;

        if let Some(base) = path.parent() {
            config.site.source = config.site.source.map(|p| rebase(base, p));
            config.deploy.workspace = config.deploy.workspace.map(|p| rebase(base, p));
        }
        Ok(config)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DeployError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GITHUB_TOKEN})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DeployError::config("toml_parsing", e.to_string()))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn into_settings(self) -> Settings {
        // an unresolved ${VAR} is not a token
        let token = self
            .github
            .token
            .filter(|t| !(t.starts_with("${") && t.ends_with('}')))
            .map(Credential::new);

        Settings {
            username: self.github.username,
            repo: self.github.repo,
            token,
            source: self.site.source,
            workspace: self.deploy.workspace,
            manifest: self.site.manifest.map(Manifest::new),
            private: self.github.private,
            description: self.github.description,
            commit_message: self.deploy.commit_message,
            api_url: self.github.api_url,
            open_browser: self.deploy.open_browser,
        }
    }
}

fn rebase(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[github]
username = "alice"
repo = "alice.github.io"
private = true
description = "Alice's site"

[site]
source = "/srv/site"
manifest = ["index.html", "assets"]

[deploy]
workspace = "/tmp/alice_deploy"
commit_message = "Publish"
open_browser = false
"#;

        let config = FileConfig::from_toml_str(toml_content).unwrap();
        let settings = config.into_settings();

        assert_eq!(settings.username.as_deref(), Some("alice"));
        assert_eq!(settings.repo.as_deref(), Some("alice.github.io"));
        assert_eq!(settings.private, Some(true));
        assert_eq!(
            settings.manifest,
            Some(Manifest::new(["index.html", "assets"]))
        );
        assert_eq!(settings.commit_message.as_deref(), Some("Publish"));
        assert_eq!(settings.open_browser, Some(false));
        assert!(settings.token.is_none());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PAGES_DEPLOY_TEST_TOKEN", "ghp_from_env");

        let toml_content = r#"
[github]
username = "alice"
token = "${PAGES_DEPLOY_TEST_TOKEN}"
"#;

        let settings = FileConfig::from_toml_str(toml_content)
            .unwrap()
            .into_settings();
        assert_eq!(
            settings.token.as_ref().map(|t| t.expose().to_string()),
            Some("ghp_from_env".to_string())
        );

        std::env::remove_var("PAGES_DEPLOY_TEST_TOKEN");
    }

    #[test]
    fn test_unset_env_var_is_not_a_token() {
        let toml_content = r#"
[github]
token = "${PAGES_DEPLOY_SURELY_UNSET_VAR}"
"#;

        let settings = FileConfig::from_toml_str(toml_content)
            .unwrap()
            .into_settings();
        assert!(settings.token.is_none());
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let toml_content = r#"
[github]
usernmae = "typo"
"#;
        assert!(matches!(
            FileConfig::from_toml_str(toml_content),
            Err(DeployError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_relative_paths_follow_config_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[site]\nsource = \"site\"\n\n[deploy]\nworkspace = \"/abs/ws\"\n")
            .unwrap();

        let config = FileConfig::from_file(temp_file.path()).unwrap();
        let base = temp_file.path().parent().unwrap();

        assert_eq!(config.site.source, Some(base.join("site")));
        assert_eq!(config.deploy.workspace, Some(PathBuf::from("/abs/ws")));
    }
}
