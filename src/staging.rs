//! Filesystem helpers for the staged build directory.
//!
//! The staged tree is rebuilt from scratch on every build, so these helpers
//! never merge into an existing destination.
use crate::error::PackError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Recursively remove `staging_root`; a missing directory is not an error.
pub fn clean_staging(staging_root: &Path) -> Result<(), PackError> {
    match fs::remove_dir_all(staging_root) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(source) => Err(PackError::StageCleanupFailed {
            path: staging_root.to_path_buf(),
            source,
        }),
    }
}

/// Copy the template tree at `template_root` to a fresh `staging_root`.
///
/// Fails if `staging_root` already exists so stale files are never merged in.
pub fn stage_tree(template_root: &Path, staging_root: &Path) -> Result<(), PackError> {
    if !template_root.is_dir() {
        return Err(PackError::TemplateMissing {
            path: template_root.to_path_buf(),
        });
    }
    if let Some(parent) = staging_root.parent() {
        fs::create_dir_all(parent).map_err(|err| PackError::io(parent, err))?;
    }
    copy_dir(template_root, staging_root)
}

fn copy_dir(source: &Path, dest: &Path) -> Result<(), PackError> {
    fs::create_dir(dest).map_err(|err| PackError::io(dest, err))?;
    let entries = fs::read_dir(source).map_err(|err| PackError::io(source, err))?;
    for entry in entries {
        let entry = entry.map_err(|err| PackError::io(source, err))?;
        let path = entry.path();
        let target = dest.join(entry.file_name());
        if path.is_dir() {
            copy_dir(&path, &target)?;
        } else if path.is_file() {
            fs::copy(&path, &target).map_err(|err| PackError::io(&path, err))?;
        } else {
            tracing::debug!(path = %path.display(), "skipping non-regular template entry");
        }
    }
    Ok(())
}

/// Copy a single file into the staged tree at `rel_path`, creating parents.
pub fn stage_file(source: &Path, staging_root: &Path, rel_path: &str) -> Result<PathBuf, PackError> {
    let dest = staging_root.join(rel_path);
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|err| PackError::io(parent, err))?;
    }
    fs::copy(source, &dest).map_err(|err| PackError::io(source, err))?;
    Ok(dest)
}

pub fn write_staged_bytes(staging_root: &Path, rel_path: &str, bytes: &[u8]) -> Result<(), PackError> {
    let staging_path = staging_root.join(rel_path);
    if let Some(parent) = staging_path.parent() {
        fs::create_dir_all(parent).map_err(|err| PackError::io(parent, err))?;
    }
    fs::write(&staging_path, bytes).map_err(|err| PackError::io(&staging_path, err))?;
    Ok(())
}

/// Serialize `value` compactly into the staged tree.
pub fn write_staged_json<T: serde::Serialize>(
    staging_root: &Path,
    rel_path: &str,
    value: &T,
) -> Result<(), PackError> {
    let bytes = serde_json::to_vec(value).map_err(|source| PackError::Serialization {
        path: staging_root.join(rel_path),
        source,
    })?;
    write_staged_bytes(staging_root, rel_path, &bytes)
}

/// List every regular file under `root`, sorted by path.
pub fn collect_files_recursive(root: &Path) -> Result<Vec<PathBuf>, PackError> {
    let mut files = Vec::new();
    if !root.exists() {
        return Ok(files);
    }
    let entries = fs::read_dir(root).map_err(|err| PackError::io(root, err))?;
    for entry in entries {
        let path = entry.map_err(|err| PackError::io(root, err))?.path();
        if path.is_dir() {
            files.extend(collect_files_recursive(&path)?);
        } else if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
