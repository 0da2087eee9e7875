//! Shared test infrastructure for integration tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Temporary data dir driven through the `rss2jext` binary.
pub struct DataDirFixture {
    _temp_dir: TempDir,
    pub root: PathBuf,
}

impl DataDirFixture {
    /// Create an empty data dir inside a fresh temp dir.
    pub fn create() -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let root = temp_dir.path().join("data");
        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    /// Run `rss2jext --data-dir <root> <args...>` with a clean environment.
    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_rss2jext"))
            .arg("--data-dir")
            .arg(&self.root)
            .args(args)
            .env_remove("RESOURCE_PACK_NAME")
            .env_remove("RSS2JEXT_DATA_DIR")
            .env("RUST_LOG", "warn")
            .output()
            .expect("run rss2jext")
    }

    pub fn write(&self, rel: &str, contents: &[u8]) {
        let path = self.root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent directory");
        }
        fs::write(path, contents).expect("write file");
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }
}

pub fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

pub fn zip_entry_names(archive: &Path) -> Vec<String> {
    let file = fs::File::open(archive).expect("open archive");
    let mut zip = zip::ZipArchive::new(file).expect("read archive");
    (0..zip.len())
        .map(|index| zip.by_index(index).expect("entry").name().to_string())
        .collect()
}
