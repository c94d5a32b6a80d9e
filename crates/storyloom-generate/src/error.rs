use std::path::PathBuf;

use http::StatusCode;
use storyloom_core::HttpError;
use storyloom_store::StoreError;
use thiserror::Error;

/// Story generation errors
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The wait budget elapsed and a theme-matching artifact exists,
    /// but none appeared during this request
    #[error("story generation timed out, please retry later")]
    Timeout,

    /// The wait budget elapsed and the story directory holds no
    /// artifacts at all
    #[error("no story artifacts were produced")]
    NotFound,

    /// A story file appeared but contains no visible content
    #[error("generated story {0} is empty")]
    EmptyArtifact(PathBuf),

    /// The caller stopped waiting (client disconnect or shutdown); the
    /// external process keeps running unobserved
    #[error("generation wait cancelled")]
    Cancelled,

    /// The generator command could not be spawned
    #[error("failed to launch generator `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    /// Artifact directory access failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl HttpError for GenerateError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::EmptyArtifact(_) | Self::Cancelled | Self::Spawn { .. } | Self::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout_error",
            Self::NotFound => "not_found_error",
            Self::EmptyArtifact(_) | Self::Spawn { .. } => "generation_error",
            Self::Cancelled => "cancelled",
            Self::Store(_) => "io_error",
        }
    }

    fn client_message(&self) -> String {
        self.to_string()
    }
}
