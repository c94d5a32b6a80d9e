use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Response,
};
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PathQuery {
    path: String,
}

/// Stream a generated illustration
pub async fn view_image(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PathQuery>,
) -> Result<Response, ApiError> {
    let path = state
        .store
        .servable_path(&PathBuf::from(&query.path))
        .ok_or_else(ApiError::not_found)?;

    respond_with_file(path, "image/png", false).await
}

/// Hand an artifact back as a download
pub async fn download(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PathQuery>,
) -> Result<Response, ApiError> {
    let path = state
        .store
        .servable_path(&PathBuf::from(&query.path))
        .ok_or_else(ApiError::not_found)?;

    respond_with_file(path, "application/octet-stream", true).await
}

async fn respond_with_file(
    path: PathBuf,
    content_type: &'static str,
    attachment: bool,
) -> Result<Response, ApiError> {
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|_| ApiError::not_found())?;

    let mut builder = Response::builder().header(http::header::CONTENT_TYPE, content_type);

    if attachment {
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("artifact");
        builder = builder.header(
            http::header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        );
    }

    Ok(builder
        .body(axum::body::Body::from(bytes))
        .unwrap_or_else(|_| {
            Response::builder()
                .status(http::StatusCode::INTERNAL_SERVER_ERROR)
                .body(axum::body::Body::empty())
                .expect("empty response must build")
        }))
}
