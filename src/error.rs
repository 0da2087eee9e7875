//! Typed failures for the resource-pack and disc-config builders.
//!
//! Every variant names the offending value or path so a failed run can be
//! diagnosed from the message alone.
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum PackError {
    #[error("pack format {value:?} is not one of {:?}", crate::resource_pack::VALID_PACK_FORMATS)]
    InvalidFormat { value: String },

    #[error("{} is not a usable pack icon: {reason}", .path.display())]
    InvalidIcon { path: PathBuf, reason: String },

    #[error("malformed template{}: {reason}", describe_path(.path.as_deref()))]
    MalformedTemplate {
        path: Option<PathBuf>,
        reason: String,
    },

    #[error("failed to clean staged build directory {}", .path.display())]
    StageCleanupFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("template not found at {}", .path.display())]
    TemplateMissing { path: PathBuf },

    #[error("failed to serialize {}", .path.display())]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("media file not found at {}", .path.display())]
    MediaMissing { path: PathBuf },

    #[error("lores list has too many items ({count} > {})", crate::discs::MAX_LORES)]
    TooManyLores { count: usize },

    #[error("filesystem error at {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write archive {}", .path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
}

impl PackError {
    pub fn io(path: &Path, source: io::Error) -> Self {
        PackError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Attach the template path to a `MalformedTemplate` raised by a pure helper.
    pub fn at_template(self, template: &Path) -> Self {
        match self {
            PackError::MalformedTemplate { path: None, reason } => PackError::MalformedTemplate {
                path: Some(template.to_path_buf()),
                reason,
            },
            other => other,
        }
    }
}

fn describe_path(path: Option<&Path>) -> String {
    match path {
        Some(path) => format!(" {}", path.display()),
        None => String::new(),
    }
}
