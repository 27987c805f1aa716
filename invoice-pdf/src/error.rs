//! Error types for invoice rendering

use std::io;
use std::path::{Path, PathBuf};

use pdf_canvas::ImageError;
use thiserror::Error;

/// Invoice rendering errors
#[derive(Debug, Error)]
pub enum RenderError {
    /// A timestamp field is present but its first 10 characters are not `YYYY-MM-DD`
    #[error("invalid date in `{field}`: {value:?} (expected a YYYY-MM-DD prefix)")]
    InvalidDate { field: &'static str, value: String },

    /// The document could not be produced or written to its destination
    #[error("failed to write invoice: {source}")]
    IoFailure {
        path: Option<PathBuf>,
        #[source]
        source: io::Error,
    },

    /// The configured letterhead logo could not be read or decoded
    #[error("failed to load logo {}: {source}", path.display())]
    Logo {
        path: PathBuf,
        #[source]
        source: ImageError,
    },
}

impl RenderError {
    pub(crate) fn io_at(path: &Path, source: io::Error) -> Self {
        RenderError::IoFailure {
            path: Some(path.to_path_buf()),
            source,
        }
    }

    /// Destination involved in an `IoFailure`, when there was one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            RenderError::IoFailure { path, .. } => path.as_deref(),
            RenderError::Logo { path, .. } => Some(path),
            RenderError::InvalidDate { .. } => None,
        }
    }
}

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;
