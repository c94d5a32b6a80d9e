use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::Response,
};
use serde::{Deserialize, Serialize};
use storyloom_core::Language;
use storyloom_markdown::extract_plain_text;
use storyloom_speech::{SpeechError, SpeechSynthesizer};

use crate::error::ApiError;
use crate::extract::JsonPayload;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AudioRequest {
    text: String,
    #[serde(default)]
    language: Language,
}

#[derive(Debug, Serialize)]
pub struct AudioResponse {
    audio_url: String,
}

/// Handle narration requests
pub async fn generate_audio(
    State(state): State<Arc<AppState>>,
    JsonPayload(request): JsonPayload<AudioRequest>,
) -> Result<Json<AudioResponse>, ApiError> {
    if request.text.trim().is_empty() {
        return Err(ApiError::validation("text must not be empty"));
    }

    let speech = state.speech.as_ref().ok_or(SpeechError::NotConfigured)?;

    tracing::info!(chars = request.text.chars().count(), language = %request.language, "narration requested");

    let audio = match speech.synthesize(&request.text, request.language).await {
        Ok(audio) => audio,
        // The supplied text held nothing narratable (e.g. only image
        // references); narrate the latest story instead
        Err(SpeechError::EmptyInput) => {
            synthesize_latest_story(&state, speech, request.language).await?
        }
        Err(e) => return Err(e.into()),
    };

    let artifact = state.store.write_audio(&audio)?;

    tracing::info!(filename = %artifact.filename, bytes = artifact.byte_len, "narration ready");

    Ok(Json(AudioResponse {
        audio_url: format!("/audio/{}", artifact.filename),
    }))
}

async fn synthesize_latest_story(
    state: &AppState,
    speech: &SpeechSynthesizer,
    language: Language,
) -> Result<Vec<u8>, ApiError> {
    let newest = state
        .store
        .story_files()?
        .into_iter()
        .max_by_key(|(_, modified)| *modified)
        .map(|(path, _)| path);

    let Some(path) = newest else {
        return Err(SpeechError::EmptyInput.into());
    };

    tracing::info!(path = %path.display(), "request text empty after normalization, narrating latest story");

    let story = state.store.load_story(&path)?;
    let plain = extract_plain_text(&story.raw_text);
    Ok(speech.synthesize(&plain, language).await?)
}

/// Stream a previously synthesized audio file
pub async fn serve_audio(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let path = state.store.audio_file(&filename).ok_or_else(ApiError::not_found)?;

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|_| ApiError::not_found())?;

    Ok(Response::builder()
        .header(http::header::CONTENT_TYPE, "audio/mpeg")
        .body(axum::body::Body::from(bytes))
        .unwrap_or_else(|_| {
            Response::builder()
                .status(http::StatusCode::INTERNAL_SERVER_ERROR)
                .body(axum::body::Body::empty())
                .expect("empty response must build")
        }))
}
