use std::path::{Path, PathBuf};

use http::StatusCode;
use storyloom_core::HttpError;
use thiserror::Error;

/// Artifact store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// A write was asked to persist zero bytes
    #[error("refusing to write empty audio artifact")]
    EmptyAudio,

    /// Local filesystem failure, with the operation and path for context
    #[error("failed to {action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
}

impl StoreError {
    pub(crate) fn io(action: &'static str, path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }
}

impl HttpError for StoreError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_type(&self) -> &'static str {
        match self {
            Self::EmptyAudio => "synthesis_error",
            Self::Io { .. } => "io_error",
        }
    }

    fn client_message(&self) -> String {
        self.to_string()
    }
}
