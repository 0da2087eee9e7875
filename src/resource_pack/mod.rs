//! Resource-pack assembly.
//!
//! A [`PackSpec`] is validated once at construction and can then be built any
//! number of times. Each build cleans the staged tree, restages the template,
//! rewrites `pack.mcmeta`, embeds the record, and zips the result into `out/`.
//! Builds sharing a data dir must run one at a time.
mod archive;
mod format;
mod icon;
mod mcmeta;

pub use archive::write_archive;
pub use format::{validate_format, PackFormat, VALID_PACK_FORMATS};
pub use icon::validate_icon;
pub use mcmeta::inject;

use crate::error::PackError;
use crate::paths::{DataDirPaths, PACK_ICON, PACK_MCMETA, RECORD_ENTRY_REL};
use crate::staging::{clean_staging, stage_file, stage_tree, write_staged_json};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Immutable build request for one pack format.
#[derive(Debug, Clone)]
pub struct PackSpec {
    format: PackFormat,
    description: String,
    paths: DataDirPaths,
    output_file: String,
    icon: Option<PathBuf>,
}

impl PackSpec {
    /// Validate `format` and the optional icon, yielding a spec only on success.
    pub fn new(
        format: &str,
        description: &str,
        data_dir: &Path,
        output_file: &str,
    ) -> Result<Self, PackError> {
        let format = validate_format(format)?;
        let icon = validate_icon(data_dir)?;
        Ok(Self {
            format,
            description: description.to_string(),
            paths: DataDirPaths::new(data_dir.to_path_buf()),
            output_file: output_file.to_string(),
            icon,
        })
    }

    pub fn format(&self) -> PackFormat {
        self.format
    }

    pub fn icon(&self) -> Option<&Path> {
        self.icon.as_deref()
    }

    /// Final archive location for this spec.
    pub fn archive_path(&self) -> PathBuf {
        self.paths.archive_path(&self.output_file, self.format)
    }

    /// Run the full pipeline, embedding `tmp/<basename>.ogg`, and return the archive path.
    pub fn build(&self, basename: &str) -> Result<PathBuf, PackError> {
        let staged = self.paths.staged_pack_dir();
        let format = self.format.get();

        clean_staging(&staged)?;
        tracing::debug!(path = %staged.display(), "cleaned staged tree");

        let template_dir = self.paths.resource_pack_template_dir();
        stage_tree(&template_dir, &staged)?;
        tracing::info!(
            pack_format = format,
            template = %template_dir.display(),
            "staged template tree"
        );

        let mcmeta = inject(
            &self.load_mcmeta_template()?,
            self.format,
            &self.description,
        )
        .map_err(|err| err.at_template(&self.paths.pack_mcmeta_template_path()))?;
        write_staged_json(&staged, PACK_MCMETA, &mcmeta)?;

        if let Some(icon) = self.icon() {
            stage_file(icon, &staged, PACK_ICON)?;
        }

        let media = self.paths.media_path(basename);
        if !media.is_file() {
            return Err(PackError::MediaMissing { path: media });
        }
        stage_file(&media, &staged, RECORD_ENTRY_REL)?;
        tracing::info!(pack_format = format, media = %media.display(), "embedded record");

        let archive = self.archive_path();
        let entries = write_archive(&staged, &archive)?;
        tracing::info!(
            pack_format = format,
            entries,
            archive = %archive.display(),
            "resource pack built"
        );
        Ok(archive)
    }

    /// The template is read from the source tree so edits are picked up every build.
    fn load_mcmeta_template(&self) -> Result<Value, PackError> {
        let path = self.paths.pack_mcmeta_template_path();
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(PackError::TemplateMissing { path });
            }
            Err(err) => return Err(PackError::io(&path, err)),
        };
        serde_json::from_slice(&bytes).map_err(|err| PackError::MalformedTemplate {
            path: Some(path),
            reason: err.to_string(),
        })
    }
}

/// Build one archive per requested format, strictly in order.
///
/// Each format gets its own freshly validated [`PackSpec`]; the first failure
/// aborts the remaining builds.
pub fn build_all(
    formats: &[String],
    description: &str,
    data_dir: &Path,
    output_file: &str,
    basename: &str,
) -> Result<Vec<PathBuf>, PackError> {
    let mut archives = Vec::with_capacity(formats.len());
    for format in formats {
        let spec = PackSpec::new(format, description, data_dir, output_file)?;
        tracing::info!(
            pack_format = spec.format().get(),
            icon = spec.icon().is_some(),
            "building resource pack"
        );
        archives.push(spec.build(basename)?);
    }
    Ok(archives)
}

#[cfg(test)]
#[path = "build_tests.rs"]
mod tests;
