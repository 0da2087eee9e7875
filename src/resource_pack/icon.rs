use crate::error::PackError;
use crate::paths::DataDirPaths;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Required icon edge length in pixels.
pub const ICON_SIZE: u32 = 64;

/// Check the optional `pack.png` under `data_dir`.
///
/// A missing icon is not an error. A present icon must be a PNG whose header
/// reports exactly 64x64 pixels; only the header is decoded.
pub fn validate_icon(data_dir: &Path) -> Result<Option<PathBuf>, PackError> {
    let icon_path = DataDirPaths::new(data_dir.to_path_buf()).pack_icon_path();
    if !icon_path.exists() {
        return Ok(None);
    }

    let invalid = |reason: String| PackError::InvalidIcon {
        path: icon_path.clone(),
        reason,
    };
    let file = File::open(&icon_path).map_err(|err| invalid(format!("open failed: {err}")))?;
    let reader = png::Decoder::new(BufReader::new(file))
        .read_info()
        .map_err(|err| invalid(format!("not a readable PNG: {err}")))?;
    let (width, height) = reader.info().size();

    if width != ICON_SIZE || height != ICON_SIZE {
        return Err(invalid(format!(
            "expected {ICON_SIZE}x{ICON_SIZE}px, found {width}x{height}px"
        )));
    }

    Ok(Some(icon_path))
}
