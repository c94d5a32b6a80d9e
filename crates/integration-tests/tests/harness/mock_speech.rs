//! Scripted stand-in for the speech provider
//!
//! Hands out a token, refuses long-form task creation, and answers
//! short-form calls with a fixed audio body — so a request exercises
//! the whole fallback path over real HTTP.

use std::net::SocketAddr;

use axum::{
    Json, Router,
    response::Response,
    routing::{get, post},
};
use tokio_util::sync::CancellationToken;

pub struct MockSpeech {
    addr: SocketAddr,
    shutdown: CancellationToken,
}

pub const MOCK_AUDIO: &[u8] = b"mock-mp3-bytes";

impl MockSpeech {
    pub async fn start() -> anyhow::Result<Self> {
        let app = Router::new()
            .route("/oauth/2.0/token", post(token))
            .route("/tts/v1/create", post(create))
            .route("/tts/v1/query", post(query))
            .route("/text2audio", get(short_form));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown })
    }

    /// Speech config TOML pointing every endpoint at this mock
    pub fn speech_toml(&self) -> String {
        format!(
            "api_key = \"mock-ak\"\n\
             secret_key = \"mock-sk\"\n\
             token_url = \"http://{addr}/oauth/2.0/token\"\n\
             create_url = \"http://{addr}/tts/v1/create\"\n\
             query_url = \"http://{addr}/tts/v1/query\"\n\
             short_form_url = \"http://{addr}/text2audio\"\n\
             poll_interval_seconds = 0\n",
            addr = self.addr
        )
    }
}

impl Drop for MockSpeech {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn token() -> Json<serde_json::Value> {
    Json(serde_json::json!({"access_token": "mock-token", "expires_in": 2_592_000}))
}

async fn create() -> Json<serde_json::Value> {
    Json(serde_json::json!({"error_code": 3301, "error_msg": "long-form disabled in mock"}))
}

async fn query() -> Json<serde_json::Value> {
    Json(serde_json::json!({"error_code": 110, "error_msg": "mock never has tasks"}))
}

async fn short_form() -> Response {
    Response::builder()
        .header(http::header::CONTENT_TYPE, "audio/mp3")
        .body(axum::body::Body::from(MOCK_AUDIO))
        .expect("mock response must build")
}
