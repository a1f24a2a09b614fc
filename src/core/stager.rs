//! Copies the manifest from the source directory into the workspace.

use crate::domain::model::{EntryKind, Manifest, StageReport};
use crate::utils::error::Result;
use filetime::FileTime;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Copy every manifest entry from `source` into `workspace`.
///
/// Directories are copied recursively, files keep their permissions and
/// modification time, and existing destinations are overwritten. Missing
/// entries are skipped with a warning and listed in the report.
pub fn stage(manifest: &Manifest, source: &Path, workspace: &Path) -> Result<StageReport> {
    let mut report = StageReport::default();

    for item in manifest.entries() {
        let src = source.join(item);
        let dst = workspace.join(item);

        if src.is_dir() {
            copy_dir_recursive(&src, &dst)?;
            println!("  ✓ Copied directory: {}", item);
            report.copied.push((item.clone(), EntryKind::Directory));
        } else if src.is_file() {
            if let Some(parent) = dst.parent() {
                fs::create_dir_all(parent)?;
            }
            copy_file(&src, &dst)?;
            println!("  ✓ Copied file: {}", item);
            report.copied.push((item.clone(), EntryKind::File));
        } else {
            tracing::warn!("⚠ Skipping missing file: {} (looked in {})", item, src.display());
            report.skipped.push(item.clone());
        }
    }

    Ok(report)
}

fn copy_file(src: &Path, dst: &Path) -> Result<()> {
    fs::copy(src, dst)?;
    let metadata = fs::metadata(src)?;
    let mtime = FileTime::from_last_modification_time(&metadata);
    let atime = FileTime::from_last_access_time(&metadata);
    filetime::set_file_times(dst, atime, mtime)?;
    Ok(())
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst)?;

    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry.map_err(std::io::Error::from)?;
        let rel_path = match entry.path().strip_prefix(src) {
            Ok(rel) => rel,
            Err(_) => continue,
        };
        let dst_path = dst.join(rel_path);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dst_path)?;
        } else {
            if let Some(parent) = dst_path.parent() {
                fs::create_dir_all(parent)?;
            }
            copy_file(entry.path(), &dst_path)?;
        }
    }

    Ok(())
}
