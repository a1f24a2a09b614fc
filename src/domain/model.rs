use chrono::{DateTime, Utc};
use std::fmt;
use std::path::PathBuf;

/// 預設的網站檔案清單
pub const DEFAULT_MANIFEST: &[&str] = &["index.html"];

pub const DEFAULT_REPO: &str = "portfolio";

pub const DEFAULT_COMMIT_MESSAGE: &str = "Deploy portfolio 🚀";

pub const DEFAULT_DESCRIPTION: &str = "Portfolio site published with GitHub Pages";

/// Branch every deploy lands on.
pub const DEPLOY_BRANCH: &str = "main";

/// Access token. Never printed, not even through `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Replace every occurrence of the token in `text`.
    pub fn redact(&self, text: &str) -> String {
        if self.is_empty() {
            return text.to_string();
        }
        text.replace(&self.0, "***")
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// Ordered list of paths, relative to the source directory, copied on every run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest(Vec<String>);

impl Manifest {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(entries.into_iter().map(Into::into).collect())
    }

    pub fn entries(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for Manifest {
    fn default() -> Self {
        Self::new(DEFAULT_MANIFEST.iter().copied())
    }
}

/// Everything one run needs. Built once, never mutated.
#[derive(Debug, Clone)]
pub struct DeployRequest {
    pub account: String,
    pub repo: String,
    pub credential: Credential,
    pub source_dir: PathBuf,
    pub workspace: PathBuf,
    pub manifest: Manifest,
    pub private: bool,
    pub description: String,
    pub commit_message: String,
    pub api_url: String,
    pub open_browser: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRepository {
    pub clone_url: String,
    pub created: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitIdentity {
    pub name: String,
    pub email: String,
}

impl CommitIdentity {
    /// Author identity using the platform's no-reply address.
    pub fn noreply(account: &str) -> Self {
        Self {
            name: account.to_string(),
            email: format!("{}@users.noreply.github.com", account),
        }
    }
}

/// Where the push goes and how to authenticate it.
#[derive(Debug, Clone)]
pub struct PushTarget {
    pub remote_name: String,
    pub clone_url: String,
    pub credential: Credential,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PagesStatus {
    Enabled,
    AlreadyEnabled,
    Failed { status: Option<u16>, body: String },
}

impl PagesStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Enabled | Self::AlreadyEnabled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageReport {
    pub copied: Vec<(String, EntryKind)>,
    pub skipped: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DeployReport {
    pub clone_url: String,
    pub repo_created: bool,
    pub workspace: PathBuf,
    pub staged: StageReport,
    pub pages_status: PagesStatus,
    pub pages_url: String,
    pub finished_at: DateTime<Utc>,
}
