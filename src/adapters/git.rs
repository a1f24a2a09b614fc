use crate::domain::model::{CommitIdentity, Credential, PushTarget, DEPLOY_BRANCH};
use crate::domain::ports::VersionControl;
use crate::utils::error::{DeployError, Result};
use std::path::Path;
use std::process::Output;
use tokio::process::Command;
use url::Url;

/// The `https` clone URL with the token as its user-info component.
///
/// Returns `None` for anything that is not an `https` URL (local paths,
/// ssh remotes), which need no embedded credential.
pub fn authenticated_url(clone_url: &str, credential: &Credential) -> Option<String> {
    let mut url = Url::parse(clone_url).ok()?;
    if url.scheme() != "https" || credential.is_empty() {
        return None;
    }
    url.set_username(credential.expose()).ok()?;
    Some(url.to_string())
}

/// Drives the system `git` binary.
///
/// The remote is stored with the plain clone URL. The authenticated URL is
/// handed to git through `GIT_CONFIG_*` environment entries as a
/// `pushInsteadOf` rewrite, so the token stays out of argv and `.git/config`.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
}

impl GitCli {
    pub fn new() -> Self {
        Self {
            program: "git".to_string(),
        }
    }

    fn command(&self, dir: &Path, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .current_dir(dir)
            .env("GIT_TERMINAL_PROMPT", "0")
            .kill_on_drop(true);
        cmd
    }

    async fn output(&self, mut cmd: Command, args: &[&str]) -> Result<Output> {
        tracing::debug!("git {}", args.join(" "));
        cmd.output().await.map_err(|e| DeployError::GitError {
            command: args.join(" "),
            stderr: format!("failed to run git: {}", e),
        })
    }

    async fn run(&self, dir: &Path, args: &[&str]) -> Result<String> {
        let output = self.output(self.command(dir, args), args).await?;
        if !output.status.success() {
            return Err(DeployError::GitError {
                command: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    async fn attach_remote(&self, dir: &Path, target: &PushTarget) -> Result<()> {
        let remotes = self.run(dir, &["remote"]).await?;
        let exists = remotes.lines().any(|r| r.trim() == target.remote_name);

        if exists {
            self.run(
                dir,
                &["remote", "set-url", target.remote_name.as_str(), target.clone_url.as_str()],
            )
            .await?;
        } else {
            self.run(
                dir,
                &["remote", "add", target.remote_name.as_str(), target.clone_url.as_str()],
            )
            .await?;
        }
        Ok(())
    }

    /// Force-push `main:main`. Returns git's stderr on failure, token scrubbed.
    async fn force_push(
        &self,
        dir: &Path,
        target: &PushTarget,
    ) -> Result<std::result::Result<(), String>> {
        let refspec = format!("{0}:{0}", DEPLOY_BRANCH);
        let args = ["push", "--force", target.remote_name.as_str(), refspec.as_str()];
        let mut cmd = self.command(dir, &args);

        if let Some(authed) = authenticated_url(&target.clone_url, &target.credential) {
            cmd.env("GIT_CONFIG_COUNT", "1")
                .env("GIT_CONFIG_KEY_0", format!("url.{}.pushInsteadOf", authed))
                .env("GIT_CONFIG_VALUE_0", &target.clone_url);
        }

        let output = self.output(cmd, &args).await?;
        if output.status.success() {
            Ok(Ok(()))
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Ok(Err(target.credential.redact(stderr.trim())))
        }
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl VersionControl for GitCli {
    async fn init(&self, dir: &Path, identity: &CommitIdentity) -> Result<()> {
        self.run(dir, &["init"]).await?;
        self.run(dir, &["config", "user.name", identity.name.as_str()]).await?;
        self.run(dir, &["config", "user.email", identity.email.as_str()]).await?;
        Ok(())
    }

    async fn commit_all(&self, dir: &Path, message: &str) -> Result<()> {
        self.run(dir, &["add", "-A"]).await?;
        self.run(dir, &["commit", "--allow-empty", "--no-gpg-sign", "-m", message])
            .await?;
        Ok(())
    }

    async fn push_main(&self, dir: &Path, target: &PushTarget) -> Result<()> {
        self.attach_remote(dir, target).await?;

        match self.force_push(dir, target).await? {
            Ok(()) => return Ok(()),
            Err(stderr) => {
                tracing::debug!(
                    "First push failed, renaming branch to {}: {}",
                    DEPLOY_BRANCH,
                    stderr
                );
            }
        }

        // 舊版 git 預設分支為 master
        self.run(dir, &["branch", "-M", DEPLOY_BRANCH]).await?;

        match self.force_push(dir, target).await? {
            Ok(()) => Ok(()),
            Err(stderr) => Err(DeployError::PushError { stderr }),
        }
    }
}
