use crate::error::PackError;
use crate::staging::collect_files_recursive;
use std::fs::{self, File};
use std::io;
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::result::ZipError;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// Zip every file under `staging_root` into `dest`, replacing any previous archive.
///
/// Entry names are relative to `staging_root`, use `/` separators, and are
/// written in sorted order with a fixed timestamp and mode so identical
/// staged trees produce identical archives.
pub fn write_archive(staging_root: &Path, dest: &Path) -> Result<u64, PackError> {
    let out_dir = dest.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(out_dir).map_err(|err| PackError::io(out_dir, err))?;

    let archive_err = |source| PackError::Archive {
        path: dest.to_path_buf(),
        source,
    };
    let file_name = dest
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("archive");
    let tmp_path = out_dir.join(format!(".{file_name}.tmp"));
    let entries = match zip_tree(staging_root, &tmp_path, archive_err) {
        Ok(entries) => entries,
        Err(err) => {
            let _ = fs::remove_file(&tmp_path);
            return Err(err);
        }
    };
    fs::rename(&tmp_path, dest).map_err(|err| PackError::io(dest, err))?;
    Ok(entries)
}

/// Write the archive to `tmp_path` with `File::create`, so the process umask
/// decides its mode like any other output file.
fn zip_tree(
    staging_root: &Path,
    tmp_path: &Path,
    archive_err: impl Fn(ZipError) -> PackError,
) -> Result<u64, PackError> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
        .unix_permissions(0o644);

    let file = File::create(tmp_path).map_err(|err| PackError::io(tmp_path, err))?;
    let mut writer = ZipWriter::new(file);
    let mut entries = 0u64;
    for file in collect_files_recursive(staging_root)? {
        let name = entry_name(staging_root, &file)?;
        writer.start_file(name.as_str(), options).map_err(&archive_err)?;
        let mut source = File::open(&file).map_err(|err| PackError::io(&file, err))?;
        io::copy(&mut source, &mut writer).map_err(|err| PackError::io(&file, err))?;
        tracing::debug!(entry = %name, "archived");
        entries += 1;
    }
    writer.finish().map_err(&archive_err)?;
    Ok(entries)
}

fn entry_name(staging_root: &Path, file: &Path) -> Result<String, PackError> {
    let rel = file
        .strip_prefix(staging_root)
        .map_err(|_| PackError::io(file, io::Error::other("outside staged tree")))?;
    let mut parts = Vec::new();
    for component in rel.components() {
        let part = component.as_os_str().to_str().ok_or_else(|| {
            PackError::io(file, io::Error::other("path is not valid UTF-8"))
        })?;
        parts.push(part);
    }
    Ok(parts.join("/"))
}
