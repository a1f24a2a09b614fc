use crate::core::{pages, stager, workspace};
use crate::domain::model::{CommitIdentity, DeployReport, DeployRequest, PagesStatus, PushTarget};
use crate::domain::ports::{HostingApi, VersionControl};
use crate::utils::error::Result;
use chrono::Utc;

const STAGES: usize = 5;

/// Runs the five deploy stages in order. The first fatal error stops the run;
/// nothing already done remotely is rolled back.
pub struct DeployEngine<H: HostingApi, V: VersionControl> {
    hosting: H,
    vcs: V,
}

impl<H: HostingApi, V: VersionControl> DeployEngine<H, V> {
    pub fn new(hosting: H, vcs: V) -> Self {
        Self { hosting, vcs }
    }

    pub async fn run(&self, request: &DeployRequest) -> Result<DeployReport> {
        tracing::info!(
            "Deploying {}/{} from {}",
            request.account,
            request.repo,
            request.source_dir.display()
        );

        // 1. 確認遠端儲存庫
        stage_header(1, "Checking GitHub repository...");
        let remote = self
            .hosting
            .ensure_repository(
                &request.account,
                &request.repo,
                &request.description,
                request.private,
            )
            .await?;
        tracing::debug!("Clone URL: {}", remote.clone_url);

        // 2. 建立本地工作目錄
        stage_header(2, "Preparing local repository...");
        workspace::recreate(&request.workspace)?;
        self.vcs
            .init(&request.workspace, &CommitIdentity::noreply(&request.account))
            .await?;
        println!("  ✓ Initialized git repo at {}", request.workspace.display());

        // 3. 複製網站檔案
        stage_header(3, "Copying portfolio files...");
        let staged = stager::stage(&request.manifest, &request.source_dir, &request.workspace)?;
        if !staged.skipped.is_empty() {
            tracing::debug!(
                "{} of {} manifest entries were missing and skipped",
                staged.skipped.len(),
                request.manifest.len()
            );
        }

        // 4. 提交並推送
        stage_header(4, "Committing and pushing to GitHub...");
        self.vcs
            .commit_all(&request.workspace, &request.commit_message)
            .await?;
        let target = PushTarget {
            remote_name: "origin".to_string(),
            clone_url: remote.clone_url.clone(),
            credential: request.credential.clone(),
        };
        self.vcs.push_main(&request.workspace, &target).await?;
        println!("  ✓ Pushed to GitHub.");

        // 5. 啟用 GitHub Pages
        stage_header(5, "Enabling GitHub Pages...");
        let pages_status = self.hosting.enable_pages(&request.account, &request.repo).await;
        let pages_url = pages::pages_url(&request.account, &request.repo);
        match &pages_status {
            PagesStatus::Enabled | PagesStatus::AlreadyEnabled => {
                println!("  ✓ GitHub Pages enabled → {}", pages_url);
            }
            PagesStatus::Failed { status, body } => {
                let status = status.map_or_else(|| "no response".to_string(), |s| s.to_string());
                tracing::warn!("⚠ Pages API returned {}: {}", status, body);
                println!(
                    "    You can enable Pages manually at: {}",
                    pages::settings_url(&request.account, &request.repo)
                );
            }
        }

        Ok(DeployReport {
            clone_url: remote.clone_url,
            repo_created: remote.created,
            workspace: request.workspace.clone(),
            staged,
            pages_status,
            pages_url,
            finished_at: Utc::now(),
        })
    }
}

fn stage_header(step: usize, title: &str) {
    println!("\n[{}/{}] {}", step, STAGES, title);
}
