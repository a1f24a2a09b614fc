//! Local workspace lifecycle: one fresh directory per run.

use crate::utils::error::{DeployError, Result};
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// `{home}/{repo}_deploy`
pub fn default_workspace(repo: &str) -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| {
        DeployError::config("workspace", "Could not determine the home directory; pass --workspace")
    })?;
    Ok(home.join(format!("{}_deploy", repo)))
}

/// Remove whatever is at `path` and leave an empty directory in its place.
pub fn recreate(path: &Path) -> Result<()> {
    if path.exists() {
        tracing::debug!("Removing previous workspace {}", path.display());
        force_remove_dir_all(path)?;
    }
    fs::create_dir_all(path)?;
    Ok(())
}

/// `remove_dir_all` that survives write-protected entries.
///
/// Git marks object files read-only; on some platforms that blocks removal.
/// When the plain removal is denied, the tree is walked bottom-up and each
/// entry that refuses to go has its protection cleared and is retried.
pub fn force_remove_dir_all(path: &Path) -> io::Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            tracing::debug!("Permission denied removing {}, clearing protection", path.display());
            remove_entries(path)
        }
        Err(e) => Err(e),
    }
}

fn remove_entries(root: &Path) -> io::Result<()> {
    // 父目錄也可能是唯讀，先解除才能刪除其內容
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.map_err(io::Error::from)?;
        if entry.file_type().is_dir() {
            clear_protection(entry.path())?;
        }
    }

    for entry in WalkDir::new(root).follow_links(false).contents_first(true) {
        let entry = entry.map_err(io::Error::from)?;
        let path = entry.path();
        if entry.file_type().is_dir() {
            remove_with_retry(path, |p| fs::remove_dir(p))?;
        } else {
            remove_with_retry(path, |p| fs::remove_file(p))?;
        }
    }
    Ok(())
}

fn remove_with_retry(path: &Path, remove: impl Fn(&Path) -> io::Result<()>) -> io::Result<()> {
    match remove(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            clear_protection(path)?;
            remove(path)
        }
        Err(e) => Err(e),
    }
}

fn clear_protection(path: &Path) -> io::Result<()> {
    let mut permissions = fs::symlink_metadata(path)?.permissions();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        permissions.set_mode(0o700);
    }
    #[cfg(not(unix))]
    permissions.set_readonly(false);
    fs::set_permissions(path, permissions)
}
