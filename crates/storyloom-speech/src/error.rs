use http::StatusCode;
use storyloom_core::HttpError;
use thiserror::Error;

/// Speech synthesis errors
///
/// Only terminal failures surface here: a failed long-form task falls
/// back to short-form synthesis and a failed chunk is skipped, so most
/// provider trouble never becomes an error value.
#[derive(Debug, Error)]
pub enum SpeechError {
    /// No speech provider in the configuration
    #[error("speech synthesis is not configured")]
    NotConfigured,

    /// Provider credentials missing; nothing can proceed without them
    #[error("speech credentials are not configured")]
    Credentials,

    /// Credential exchange was reachable but did not yield a token
    #[error("token exchange failed: {0}")]
    TokenExchange(String),

    /// Input contains nothing narratable after normalization
    #[error("no narratable text to synthesize")]
    EmptyInput,

    /// The provider could not be reached
    #[error("speech provider unreachable: {0}")]
    Connection(String),

    /// Both synthesis modes completed without producing audio
    #[error("synthesis produced no audio ({0})")]
    NoAudio(String),
}

impl HttpError for SpeechError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::EmptyInput => StatusCode::BAD_REQUEST,
            Self::NotConfigured
            | Self::Credentials
            | Self::TokenExchange(_)
            | Self::Connection(_)
            | Self::NoAudio(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            Self::EmptyInput => "validation_error",
            Self::NotConfigured | Self::Credentials => "config_error",
            Self::TokenExchange(_) | Self::Connection(_) | Self::NoAudio(_) => "synthesis_error",
        }
    }

    fn client_message(&self) -> String {
        self.to_string()
    }
}
