use std::sync::Arc;
use std::time::Duration;

use storyloom_config::SpeechConfig;
use storyloom_core::Language;

use crate::backend::{ChunkOutcome, CreateOutcome, HttpBackend, SpeechBackend, TaskSnapshot};
use crate::error::SpeechError;
use crate::text;
use crate::token::TokenSource;

/// Marker the provider puts in errors for expired or revoked tokens
const INVALID_TOKEN_MARKER: &str = "Access token invalid";

/// How the long-form attempt ended
enum LongFormOutcome {
    /// Downloaded audio; the request is done
    Audio(Vec<u8>),
    /// The provider rejected our cached token
    InvalidToken,
    /// Any other failure; fall back to short-form synthesis
    Failed(String),
}

/// The synthesis pipeline: long-form first, chunked short-form fallback
pub struct SpeechSynthesizer {
    backend: Arc<dyn SpeechBackend>,
    tokens: TokenSource,
    max_text_chars: usize,
    chunk_chars: usize,
    poll_interval: Duration,
    max_polls: u32,
}

impl SpeechSynthesizer {
    /// Build the pipeline over the real provider client
    pub fn from_config(config: &SpeechConfig) -> Self {
        let backend: Arc<dyn SpeechBackend> = Arc::new(HttpBackend::new(config));
        Self::new(config, backend)
    }

    /// Build the pipeline over any backend (tests script one)
    pub fn new(config: &SpeechConfig, backend: Arc<dyn SpeechBackend>) -> Self {
        let tokens = TokenSource::new(
            Arc::clone(&backend),
            Duration::from_secs(config.token_ttl_seconds),
        );

        Self {
            backend,
            tokens,
            max_text_chars: config.max_text_chars,
            chunk_chars: config.chunk_chars,
            poll_interval: Duration::from_secs(config.poll_interval_seconds),
            max_polls: config.max_polls,
        }
    }

    /// Synthesize narration for `text`
    ///
    /// Returns the audio payload: the long-form task's download when
    /// that path succeeds, otherwise the in-order concatenation of the
    /// short-form chunks that succeeded. Errors only when neither mode
    /// produced a byte.
    ///
    /// # Errors
    ///
    /// See [`SpeechError`]
    pub async fn synthesize(&self, raw_text: &str, language: Language) -> Result<Vec<u8>, SpeechError> {
        let normalized = text::normalize(raw_text, self.max_text_chars);
        if normalized.trim().is_empty() {
            return Err(SpeechError::EmptyInput);
        }

        let lang = language.code();
        let mut token = self.tokens.acquire().await?;
        let mut diagnostics = Vec::new();

        match self.long_form(&token, &normalized, lang).await {
            LongFormOutcome::Audio(bytes) => {
                tracing::info!(bytes = bytes.len(), "long-form synthesis succeeded");
                return Ok(bytes);
            }
            LongFormOutcome::InvalidToken => {
                tracing::warn!("provider rejected cached token, re-acquiring once");
                self.tokens.invalidate();
                token = self.tokens.acquire().await?;
                diagnostics.push("long-form task refused: invalid token".to_string());
            }
            LongFormOutcome::Failed(reason) => {
                tracing::warn!(%reason, "long-form synthesis failed, falling back to chunks");
                diagnostics.push(format!("long-form: {reason}"));
            }
        }

        self.short_form(&token, &normalized, lang, diagnostics).await
    }

    async fn long_form(&self, token: &str, normalized: &str, lang: &str) -> LongFormOutcome {
        let task_id = match self.backend.create_task(token, normalized, lang).await {
            Ok(CreateOutcome::Created { task_id }) => task_id,
            Ok(CreateOutcome::Refused { error_code, error_msg }) => {
                if error_msg.contains(INVALID_TOKEN_MARKER) {
                    return LongFormOutcome::InvalidToken;
                }
                return LongFormOutcome::Failed(format!("task creation refused ({error_code}): {error_msg}"));
            }
            Ok(CreateOutcome::Malformed) => {
                return LongFormOutcome::Failed("malformed task creation response".to_string());
            }
            Err(e) => return LongFormOutcome::Failed(e.to_string()),
        };

        tracing::debug!(%task_id, "long-form task created, polling");

        for attempt in 1..=self.max_polls {
            tokio::time::sleep(self.poll_interval).await;

            match self.backend.query_task(token, &task_id).await {
                Ok(TaskSnapshot::Pending) => {
                    tracing::debug!(%task_id, attempt, "task still pending");
                }
                Ok(TaskSnapshot::Success { speech_url }) => {
                    // Terminal either way: the download is not retried
                    return match self.backend.download(&speech_url).await {
                        Ok(bytes) if !bytes.is_empty() => LongFormOutcome::Audio(bytes),
                        Ok(_) => LongFormOutcome::Failed("downloaded payload was empty".to_string()),
                        Err(e) => LongFormOutcome::Failed(format!("download failed: {e}")),
                    };
                }
                Ok(TaskSnapshot::Failed { error_msg }) => {
                    return LongFormOutcome::Failed(format!("task failed: {error_msg}"));
                }
                Ok(TaskSnapshot::Malformed) => {
                    return LongFormOutcome::Failed("malformed task query response".to_string());
                }
                Err(e) => return LongFormOutcome::Failed(format!("task query failed: {e}")),
            }
        }

        LongFormOutcome::Failed(format!("task not terminal after {} polls", self.max_polls))
    }

    async fn short_form(
        &self,
        token: &str,
        normalized: &str,
        lang: &str,
        mut diagnostics: Vec<String>,
    ) -> Result<Vec<u8>, SpeechError> {
        let chunks = text::chunk_chars(normalized, self.chunk_chars);
        let total = chunks.len();
        tracing::info!(total, "short-form fallback over chunks");

        let mut audio = Vec::new();
        let mut failed = 0usize;

        for (index, chunk) in chunks.iter().enumerate() {
            match self.backend.synthesize_chunk(token, chunk, lang).await {
                Ok(ChunkOutcome::Audio(bytes)) => {
                    tracing::debug!(index, bytes = bytes.len(), "chunk synthesized");
                    audio.extend_from_slice(&bytes);
                }
                Ok(ChunkOutcome::Refused { error_code, error_msg }) => {
                    tracing::warn!(index, error_code, %error_msg, "chunk refused, skipping");
                    failed += 1;
                }
                Err(e) => {
                    tracing::warn!(index, error = %e, "chunk call failed, skipping");
                    failed += 1;
                }
            }
        }

        if audio.is_empty() {
            diagnostics.push(format!("all {failed} of {total} short-form chunks failed"));
            return Err(SpeechError::NoAudio(diagnostics.join("; ")));
        }

        if failed > 0 {
            tracing::warn!(failed, total, "returning partial audio");
        }

        Ok(audio)
    }
}
