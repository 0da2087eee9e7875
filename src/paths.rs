//! Typed paths into the data-dir layout.
//!
//! Centralizing path construction keeps the pack builder, disc-config writer,
//! and media steps pointed at the same files.
use crate::resource_pack::PackFormat;
use std::path::{Path, PathBuf};

/// Relative path of the embedded record inside a staged resource pack.
pub const RECORD_ENTRY_REL: &str = "assets/minecraft/sounds/records/latestpodepisode.ogg";

/// Metadata file name shared by the template and staged trees.
pub const PACK_MCMETA: &str = "pack.mcmeta";

/// Icon file name, both in the data dir and at the pack root.
pub const PACK_ICON: &str = "pack.png";

/// Basename used for the downloaded and transcoded episode.
pub const EPISODE_BASENAME: &str = "episode";

/// Convenience wrapper for locating data-dir artifacts.
#[derive(Debug, Clone)]
pub struct DataDirPaths {
    root: PathBuf,
}

impl DataDirPaths {
    /// Create a new path helper rooted at the data dir.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Return the data-dir root used for path derivation.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Return the optional `pack.png` icon path.
    pub fn pack_icon_path(&self) -> PathBuf {
        self.root.join(PACK_ICON)
    }

    /// Return the `templates/` directory path.
    pub fn templates_dir(&self) -> PathBuf {
        self.root.join("templates")
    }

    /// Return the `templates/resourcepack/` template tree path.
    pub fn resource_pack_template_dir(&self) -> PathBuf {
        self.templates_dir().join("resourcepack")
    }

    /// Return the `templates/resourcepack/pack.mcmeta` path.
    pub fn pack_mcmeta_template_path(&self) -> PathBuf {
        self.resource_pack_template_dir().join(PACK_MCMETA)
    }

    /// Return the `templates/discs.json` path.
    pub fn discs_template_path(&self) -> PathBuf {
        self.templates_dir().join("discs.json")
    }

    /// Return the `tmp/` directory path.
    pub fn tmp_dir(&self) -> PathBuf {
        self.root.join("tmp")
    }

    /// Return the staged build directory, `tmp/resourcepack/`.
    pub fn staged_pack_dir(&self) -> PathBuf {
        self.tmp_dir().join("resourcepack")
    }

    /// Return `tmp/<basename>.ogg`, the transcoder output consumed by the build.
    pub fn media_path(&self, basename: &str) -> PathBuf {
        self.tmp_dir().join(format!("{basename}.ogg"))
    }

    /// Return `tmp/<basename>.mp3`, the raw download.
    pub fn download_path(&self, basename: &str) -> PathBuf {
        self.tmp_dir().join(format!("{basename}.mp3"))
    }

    /// Return the `out/` directory path.
    pub fn out_dir(&self) -> PathBuf {
        self.root.join("out")
    }

    /// Return `out/<output_file>_<pack_format>.zip`.
    pub fn archive_path(&self, output_file: &str, format: PackFormat) -> PathBuf {
        self.out_dir().join(format!("{output_file}_{format}.zip"))
    }

    /// Return the `out/discs.json` path.
    pub fn discs_output_path(&self) -> PathBuf {
        self.out_dir().join("discs.json")
    }

    /// Directories that must exist before a run can proceed.
    pub fn layout_dirs(&self) -> [PathBuf; 4] {
        [
            self.root.clone(),
            self.templates_dir(),
            self.tmp_dir(),
            self.out_dir(),
        ]
    }
}
