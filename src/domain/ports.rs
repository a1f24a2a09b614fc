use crate::domain::model::{CommitIdentity, PagesStatus, PushTarget, RemoteRepository};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Hosting platform REST surface.
#[async_trait]
pub trait HostingApi: Send + Sync {
    /// Look the repository up and create it when missing.
    async fn ensure_repository(
        &self,
        account: &str,
        repo: &str,
        description: &str,
        private: bool,
    ) -> Result<RemoteRepository>;

    /// Never fails: problems come back as `PagesStatus::Failed`.
    async fn enable_pages(&self, account: &str, repo: &str) -> PagesStatus;
}

#[async_trait]
pub trait VersionControl: Send + Sync {
    async fn init(&self, dir: &Path, identity: &CommitIdentity) -> Result<()>;
    async fn commit_all(&self, dir: &Path, message: &str) -> Result<()>;
    async fn push_main(&self, dir: &Path, target: &PushTarget) -> Result<()>;
}
