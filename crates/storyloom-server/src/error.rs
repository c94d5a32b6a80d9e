use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use storyloom_core::HttpError;

/// HTTP-facing error assembled from any domain error
///
/// Feature crates stay decoupled from axum by implementing
/// [`HttpError`]; handlers convert with `?` through the blanket `From`
/// below.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error_type: &'static str,
    message: String,
}

impl ApiError {
    /// 400 for empty or missing required input
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error_type: "validation_error",
            message: message.into(),
        }
    }

    /// 404 for absent artifacts and out-of-root paths
    pub fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            error_type: "not_found_error",
            message: "file not found".to_string(),
        }
    }
}

impl<E: HttpError> From<E> for ApiError {
    fn from(error: E) -> Self {
        Self {
            status: error.status_code(),
            error_type: error.error_type(),
            message: error.client_message(),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorDetails,
}

#[derive(Debug, Serialize)]
struct ErrorDetails {
    message: String,
    r#type: String,
    code: u16,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ErrorDetails {
                message: self.message,
                r#type: self.error_type.to_string(),
                code: self.status.as_u16(),
            },
        };

        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use storyloom_generate::GenerateError;
    use storyloom_speech::SpeechError;

    use super::*;

    #[test]
    fn timeout_maps_to_504() {
        let error = ApiError::from(GenerateError::Timeout);
        assert_eq!(error.status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(error.error_type, "timeout_error");
    }

    #[test]
    fn empty_input_maps_to_400() {
        let error = ApiError::from(SpeechError::EmptyInput);
        assert_eq!(error.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn synthesis_failure_maps_to_500() {
        let error = ApiError::from(SpeechError::NoAudio("all chunks failed".to_string()));
        assert_eq!(error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.error_type, "synthesis_error");
    }
}
