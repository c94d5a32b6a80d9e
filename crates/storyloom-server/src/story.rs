use std::collections::HashMap;
use std::sync::Arc;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use storyloom_core::Language;
use storyloom_markdown::{extract_plain_text, render};

use crate::error::ApiError;
use crate::extract::JsonPayload;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StoryRequest {
    theme: String,
    #[serde(default)]
    language: Option<Language>,
    /// Free text, comma/whitespace separated
    #[serde(default)]
    forbidden_words: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StoryResponse {
    /// Rendered HTML with prose and illustrations interleaved
    text: String,
    /// Display URLs of the story's illustrations, in scene order
    images: Vec<String>,
    /// Download URL of the markdown source
    markdown_url: String,
    raw_markdown: String,
    /// Narration-ready text with markup stripped
    plain_text: String,
    is_cached: bool,
    /// Set when the artifact was found by the post-timeout scan and may
    /// predate this request
    stale: bool,
}

/// Handle story generation requests
pub async fn generate_story(
    State(state): State<Arc<AppState>>,
    JsonPayload(request): JsonPayload<StoryRequest>,
) -> Result<Json<StoryResponse>, ApiError> {
    let theme = request.theme.trim();
    if theme.is_empty() {
        return Err(ApiError::validation("theme must not be empty"));
    }

    tracing::info!(theme, language = ?request.language, "story requested");

    let generation = state
        .generator
        .request(theme, request.language, request.forbidden_words.as_deref());
    let story = state.generator.fetch_or_generate(&generation, &state.shutdown).await?;

    let assets = state.store.images_for(&story.artifact.path, theme)?;
    let mut locations = HashMap::new();
    let mut images = Vec::with_capacity(assets.len());
    for asset in &assets {
        let url = format!("/view_image?path={}", asset.path.display());
        locations.insert(asset.basename.clone(), url.clone());
        images.push(url);
    }

    tracing::info!(
        theme,
        cached = story.cached,
        images = images.len(),
        path = %story.artifact.path.display(),
        "story ready"
    );

    Ok(Json(StoryResponse {
        text: render(&story.artifact.raw_text, &locations).to_html(),
        images,
        markdown_url: format!("/download?path={}", story.artifact.path.display()),
        plain_text: extract_plain_text(&story.artifact.raw_text),
        raw_markdown: story.artifact.raw_text,
        is_cached: story.cached,
        stale: story.stale,
    }))
}
