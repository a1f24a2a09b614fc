use crate::config::Settings;
use crate::domain::model::Credential;
use clap::Parser;
use std::path::PathBuf;

const AFTER_HELP: &str = "\
Examples:
  pages-deploy --username alice --repo portfolio
  pages-deploy --username alice --repo alice.github.io   # user site at the bare domain

Getting a GitHub token:
  1. Go to github.com → Settings → Developer Settings → Personal Access Tokens
  2. Generate a token with scopes: repo, write:pages
  3. Pass it via --token or set GITHUB_TOKEN";

#[derive(Debug, Clone, Parser)]
#[command(name = "pages-deploy", version)]
#[command(about = "Publish a static site to GitHub Pages")]
#[command(after_help = AFTER_HELP)]
pub struct CliConfig {
    /// Your GitHub username
    #[arg(long, visible_alias = "account")]
    pub username: Option<String>,

    /// Repository name [default: portfolio]
    #[arg(long)]
    pub repo: Option<String>,

    /// GitHub personal access token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, value_parser = parse_credential)]
    pub token: Option<Credential>,

    /// Folder containing the site files [default: folder of this executable]
    #[arg(long)]
    pub source: Option<PathBuf>,

    /// Don't open the browser after deploying
    #[arg(long)]
    pub no_browser: bool,

    /// Create the repository as private
    #[arg(long)]
    pub private: bool,

    /// Description used when the repository is created
    #[arg(long)]
    pub description: Option<String>,

    /// Local staging directory, wiped on every run [default: ~/<repo>_deploy]
    #[arg(long)]
    pub workspace: Option<PathBuf>,

    /// TOML file with defaults for any of the above
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// GitHub API base URL
    #[arg(long, hide = true)]
    pub api_url: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_credential(value: &str) -> Result<Credential, String> {
    Ok(Credential::new(value))
}

impl CliConfig {
    /// Flags that were actually given. Unset booleans stay `None` so the
    /// config file can still decide them.
    pub fn settings(&self) -> Settings {
        Settings {
            username: self.username.clone(),
            repo: self.repo.clone(),
            token: self.token.clone(),
            source: self.source.clone(),
            workspace: self.workspace.clone(),
            manifest: None,
            private: self.private.then_some(true),
            description: self.description.clone(),
            commit_message: None,
            api_url: self.api_url.clone(),
            open_browser: self.no_browser.then_some(false),
        }
    }
}
