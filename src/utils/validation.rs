use crate::utils::error::{DeployError, Result};
use std::io;
use std::path::{Component, Path, PathBuf};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(DeployError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(DeployError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(DeployError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &Path) -> Result<()> {
    let display = path.to_string_lossy();
    if display.is_empty() {
        return Err(DeployError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: display.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if display.contains('\0') {
        return Err(DeployError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: display.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// Manifest entries are relative to the source directory and must stay inside it.
///
/// An entry must name something below the source root, and no part of it may
/// be `.git`: the workspace's own repository metadata is never overwritten.
pub fn validate_manifest_entry(field_name: &str, entry: &str) -> Result<()> {
    validate_non_empty_string(field_name, entry)?;

    let invalid = |reason: &str| DeployError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: entry.to_string(),
        reason: reason.to_string(),
    };

    let components: Vec<Component> = Path::new(entry).components().collect();
    let escapes = components.iter().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if escapes {
        return Err(invalid(
            "Manifest entries must be relative paths inside the source directory",
        ));
    }

    if !components.iter().any(|c| matches!(c, Component::Normal(_))) {
        return Err(invalid("Manifest entries must name a file or directory, not the source root"));
    }

    let touches_git = components.iter().any(|c| match c {
        Component::Normal(name) => name
            .to_str()
            .map_or(false, |n| n.eq_ignore_ascii_case(".git")),
        _ => false,
    });
    if touches_git {
        return Err(invalid("Manifest entries must not include .git directories"));
    }

    Ok(())
}

/// Absolute form of `path` with symlinks resolved as far as the path exists.
///
/// `.` and `..` are folded first, then the deepest existing ancestor is
/// canonicalized and the missing tail is appended unchanged.
pub fn resolve_path(path: &Path) -> io::Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut folded = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                folded.pop();
            }
            other => folded.push(other.as_os_str()),
        }
    }

    for ancestor in folded.ancestors() {
        if let Ok(canonical) = ancestor.canonicalize() {
            let rest = folded.strip_prefix(ancestor).unwrap_or(Path::new(""));
            return Ok(if rest.as_os_str().is_empty() {
                canonical
            } else {
                canonical.join(rest)
            });
        }
    }
    Ok(folded)
}

/// Fails when one directory contains the other, or both are the same.
pub fn validate_disjoint_dirs(
    field_name: &str,
    dir: &Path,
    other_name: &str,
    other: &Path,
) -> Result<()> {
    let dir_resolved = resolve_path(dir)?;
    let other_resolved = resolve_path(other)?;

    if dir_resolved.starts_with(&other_resolved) || other_resolved.starts_with(&dir_resolved) {
        return Err(DeployError::config(
            field_name,
            format!(
                "{} ({}) and {} ({}) must not contain one another",
                field_name,
                dir_resolved.display(),
                other_name,
                other_resolved.display()
            ),
        ));
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| DeployError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DeployError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("api_url", "https://api.github.com").is_ok());
        assert!(validate_url("api_url", "http://127.0.0.1:8080").is_ok());
        assert!(validate_url("api_url", "").is_err());
        assert!(validate_url("api_url", "invalid-url").is_err());
        assert!(validate_url("api_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_manifest_entry() {
        assert!(validate_manifest_entry("manifest", "index.html").is_ok());
        assert!(validate_manifest_entry("manifest", "assets/css").is_ok());
        assert!(validate_manifest_entry("manifest", "").is_err());
        assert!(validate_manifest_entry("manifest", "../secrets.txt").is_err());
        assert!(validate_manifest_entry("manifest", "/etc/passwd").is_err());
        assert!(validate_manifest_entry("manifest", ".").is_err());
        assert!(validate_manifest_entry("manifest", "./").is_err());
        assert!(validate_manifest_entry("manifest", ".git").is_err());
        assert!(validate_manifest_entry("manifest", "x/.git").is_err());
        assert!(validate_manifest_entry("manifest", ".git/config").is_err());
        assert!(validate_manifest_entry("manifest", ".GIT").is_err());
        assert!(validate_manifest_entry("manifest", "./index.html").is_ok());
        assert!(validate_manifest_entry("manifest", ".github").is_ok());
        assert!(validate_manifest_entry("manifest", ".gitignore").is_ok());
    }

    #[test]
    fn test_resolve_path_folds_dots_and_missing_tail() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let base = temp_dir.path().canonicalize().unwrap();
        std::fs::create_dir_all(base.join("proj/site")).unwrap();

        assert_eq!(
            resolve_path(&base.join("proj/other/../site")).unwrap(),
            base.join("proj/site")
        );
        assert_eq!(
            resolve_path(&base.join("proj/./new/deeper")).unwrap(),
            base.join("proj/new/deeper")
        );
        assert!(resolve_path(Path::new("relative/dir")).unwrap().is_absolute());
    }

    #[test]
    fn test_validate_disjoint_dirs() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let proj = temp_dir.path().join("proj");
        let site = proj.join("site");
        std::fs::create_dir_all(&site).unwrap();

        assert!(validate_disjoint_dirs("workspace", &proj, "source", &site).is_err());
        assert!(validate_disjoint_dirs("workspace", &site.join("out"), "source", &site).is_err());
        assert!(
            validate_disjoint_dirs("workspace", &proj.join("x/../site"), "source", &site).is_err()
        );
        assert!(
            validate_disjoint_dirs("workspace", &proj.join("site_deploy"), "source", &site).is_ok()
        );
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some("alice".to_string());
        assert_eq!(validate_required_field("username", &present).unwrap(), "alice");

        let missing: Option<String> = None;
        assert!(matches!(
            validate_required_field("username", &missing),
            Err(DeployError::MissingConfigError { .. })
        ));
    }
}
