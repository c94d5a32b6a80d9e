use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use storyloom_config::SpeechConfig;
use url::Url;

use crate::error::SpeechError;

/// Outcome of a long-form task creation call
#[derive(Debug, Clone)]
pub enum CreateOutcome {
    /// Task accepted; poll it by id
    Created { task_id: String },
    /// Provider answered with a structured error; the long-form path is
    /// over (creation is never retried)
    Refused { error_code: i64, error_msg: String },
    /// Response parsed as neither a task nor an error
    Malformed,
}

/// One observation of a long-form task's status
#[derive(Debug, Clone)]
pub enum TaskSnapshot {
    /// Created or Running; keep polling
    Pending,
    /// Terminal success with a downloadable payload
    Success { speech_url: String },
    /// Terminal failure
    Failed { error_msg: String },
    /// Query response unusable; treated as long-form failure
    Malformed,
}

/// Outcome of one short-form chunk call
#[derive(Debug, Clone)]
pub enum ChunkOutcome {
    /// Raw audio bytes for this chunk
    Audio(Vec<u8>),
    /// Provider answered with a non-audio body; the chunk is skipped
    Refused { error_code: i64, error_msg: String },
}

/// Provider HTTP surface behind the pipeline
///
/// Every provider round-trip goes through this trait, so tests can
/// script the provider without a network. `Err` means transport
/// failure; provider-level refusals come back as `Ok` variants.
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    /// Exchange stored credentials for a bearer token
    async fn exchange_token(&self) -> Result<String, SpeechError>;

    /// Create a long-form synthesis task
    async fn create_task(
        &self,
        token: &str,
        text: &str,
        lang: &str,
    ) -> Result<CreateOutcome, SpeechError>;

    /// Query a long-form task's status
    async fn query_task(&self, token: &str, task_id: &str) -> Result<TaskSnapshot, SpeechError>;

    /// Download a finished task's audio payload
    async fn download(&self, url: &str) -> Result<Vec<u8>, SpeechError>;

    /// Synthesize one short-form chunk
    async fn synthesize_chunk(
        &self,
        token: &str,
        chunk: &str,
        lang: &str,
    ) -> Result<ChunkOutcome, SpeechError>;
}

/// The real provider client
pub struct HttpBackend {
    client: Client,
    token_url: Url,
    create_url: Url,
    query_url: Url,
    short_form_url: Url,
    api_key: SecretString,
    secret_key: SecretString,
    long_form_voice: u8,
    short_form_voice: u8,
    speed: u8,
    pitch: u8,
    volume: u8,
}

/// Client identifier sent with short-form calls
const CUID: &str = "storyloom";

/// One pooled HTTP client for every provider round-trip
///
/// The generous timeout covers long-form audio downloads, which can
/// run to tens of megabytes on a slow link.
fn provider_client() -> Client {
    use std::sync::OnceLock;
    use std::time::Duration;

    static CLIENT: OnceLock<Client> = OnceLock::new();

    CLIENT
        .get_or_init(|| {
            Client::builder()
                .timeout(Duration::from_secs(120))
                .pool_idle_timeout(Some(Duration::from_secs(30)))
                .tcp_keepalive(Some(Duration::from_secs(60)))
                .build()
                .expect("default HTTP client must build")
        })
        .clone()
}

impl HttpBackend {
    pub fn new(config: &SpeechConfig) -> Self {
        Self {
            client: provider_client(),
            token_url: config.token_url.clone(),
            create_url: config.create_url.clone(),
            query_url: config.query_url.clone(),
            short_form_url: config.short_form_url.clone(),
            api_key: config.api_key.clone(),
            secret_key: config.secret_key.clone(),
            long_form_voice: config.voice.long_form_voice,
            short_form_voice: config.voice.short_form_voice,
            speed: config.voice.speed,
            pitch: config.voice.pitch,
            volume: config.voice.volume,
        }
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

#[derive(Deserialize)]
struct CreateResponse {
    task_id: Option<String>,
    error_code: Option<i64>,
    error_msg: Option<String>,
}

#[derive(Deserialize)]
struct QueryResponse {
    error_code: Option<i64>,
    error_msg: Option<String>,
    #[serde(default)]
    tasks_info: Vec<TaskInfo>,
}

#[derive(Deserialize)]
struct TaskInfo {
    task_status: Option<String>,
    #[serde(default)]
    task_result: TaskResult,
}

#[derive(Default, Deserialize)]
struct TaskResult {
    speech_url: Option<String>,
    error_msg: Option<String>,
}

#[derive(Deserialize)]
struct ChunkError {
    err_no: Option<i64>,
    err_msg: Option<String>,
}

#[async_trait]
impl SpeechBackend for HttpBackend {
    async fn exchange_token(&self) -> Result<String, SpeechError> {
        if self.api_key.expose_secret().is_empty() || self.secret_key.expose_secret().is_empty() {
            return Err(SpeechError::Credentials);
        }

        let response = self
            .client
            .post(self.token_url.clone())
            .query(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.api_key.expose_secret()),
                ("client_secret", self.secret_key.expose_secret()),
            ])
            .send()
            .await
            .map_err(|e| SpeechError::Connection(format!("token endpoint: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SpeechError::TokenExchange(format!("status {status}")));
        }

        // The body echoes credentials on some error shapes, so it is
        // never included in error messages
        let parsed: TokenResponse = response
            .json()
            .await
            .map_err(|_| SpeechError::TokenExchange("unparseable response".to_string()))?;

        parsed
            .access_token
            .ok_or_else(|| SpeechError::TokenExchange("response carried no access token".to_string()))
    }

    async fn create_task(
        &self,
        token: &str,
        text: &str,
        lang: &str,
    ) -> Result<CreateOutcome, SpeechError> {
        let body = serde_json::json!({
            "text": text,
            "format": "mp3-16k",
            "voice": self.long_form_voice,
            "lang": lang,
            "speed": self.speed,
            "pitch": self.pitch,
            "volume": self.volume,
            "enable_subtitle": 0,
        });

        let response = self
            .client
            .post(self.create_url.clone())
            .query(&[("access_token", token)])
            .json(&body)
            .send()
            .await
            .map_err(|e| SpeechError::Connection(format!("create endpoint: {e}")))?;

        let Ok(parsed) = response.json::<CreateResponse>().await else {
            return Ok(CreateOutcome::Malformed);
        };

        if let Some(error_code) = parsed.error_code {
            return Ok(CreateOutcome::Refused {
                error_code,
                error_msg: parsed.error_msg.unwrap_or_default(),
            });
        }

        Ok(parsed
            .task_id
            .map_or(CreateOutcome::Malformed, |task_id| CreateOutcome::Created { task_id }))
    }

    async fn query_task(&self, token: &str, task_id: &str) -> Result<TaskSnapshot, SpeechError> {
        let body = serde_json::json!({ "task_ids": [task_id] });

        let response = self
            .client
            .post(self.query_url.clone())
            .query(&[("access_token", token)])
            .json(&body)
            .send()
            .await
            .map_err(|e| SpeechError::Connection(format!("query endpoint: {e}")))?;

        let Ok(parsed) = response.json::<QueryResponse>().await else {
            return Ok(TaskSnapshot::Malformed);
        };

        if parsed.error_code.is_some() {
            return Ok(TaskSnapshot::Failed {
                error_msg: parsed.error_msg.unwrap_or_default(),
            });
        }

        let Some(info) = parsed.tasks_info.into_iter().next() else {
            return Ok(TaskSnapshot::Malformed);
        };

        let snapshot = match info.task_status.as_deref() {
            Some("Created" | "Running") => TaskSnapshot::Pending,
            Some("Success") => info
                .task_result
                .speech_url
                .map_or(TaskSnapshot::Malformed, |speech_url| TaskSnapshot::Success { speech_url }),
            Some("Failed") => TaskSnapshot::Failed {
                error_msg: info.task_result.error_msg.unwrap_or_default(),
            },
            _ => TaskSnapshot::Malformed,
        };

        Ok(snapshot)
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, SpeechError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SpeechError::Connection(format!("download: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SpeechError::Connection(format!("download returned status {status}")));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SpeechError::Connection(format!("download body: {e}")))?;

        Ok(bytes.to_vec())
    }

    async fn synthesize_chunk(
        &self,
        token: &str,
        chunk: &str,
        lang: &str,
    ) -> Result<ChunkOutcome, SpeechError> {
        let speed = self.speed.to_string();
        let pitch = self.pitch.to_string();
        let volume = self.volume.to_string();
        let voice = self.short_form_voice.to_string();

        let response = self
            .client
            .get(self.short_form_url.clone())
            .query(&[
                ("tok", token),
                ("tex", chunk),
                ("cuid", CUID),
                ("ctp", "1"),
                ("lan", lang),
                ("spd", speed.as_str()),
                ("pit", pitch.as_str()),
                ("vol", volume.as_str()),
                ("per", voice.as_str()),
                ("aue", "3"),
            ])
            .send()
            .await
            .map_err(|e| SpeechError::Connection(format!("short-form endpoint: {e}")))?;

        let is_audio = response
            .headers()
            .get(http::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.contains("audio"));

        if is_audio {
            let bytes = response
                .bytes()
                .await
                .map_err(|e| SpeechError::Connection(format!("short-form body: {e}")))?;
            return Ok(ChunkOutcome::Audio(bytes.to_vec()));
        }

        let parsed = response.json::<ChunkError>().await.ok();
        Ok(ChunkOutcome::Refused {
            error_code: parsed.as_ref().and_then(|e| e.err_no).unwrap_or(-1),
            error_msg: parsed
                .and_then(|e| e.err_msg)
                .unwrap_or_else(|| "unparseable error response".to_string()),
        })
    }
}
