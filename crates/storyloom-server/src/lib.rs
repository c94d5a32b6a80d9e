//! HTTP surface for Storyloom
//!
//! Assembles the router over the artifact store, the generation
//! poller, and the speech pipeline.

mod audio;
mod error;
mod extract;
mod files;
mod health;
mod state;
mod story;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use storyloom_config::Config;
use storyloom_generate::StoryGenerator;
use storyloom_speech::SpeechSynthesizer;
use storyloom_store::ArtifactStore;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
    shutdown: CancellationToken,
}

impl Server {
    /// Build the server from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact directories cannot be created
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let listen_address = config
            .server
            .listen_address
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 5000)));

        let store = ArtifactStore::new(&config.storage);
        store.ensure_layout()?;

        let generator = StoryGenerator::new(config.generator, store.clone());

        let speech = config.speech.as_ref().map(SpeechSynthesizer::from_config);
        if speech.is_none() {
            tracing::warn!("no speech provider configured, narration endpoint will refuse requests");
        }

        let shutdown = CancellationToken::new();
        let state = Arc::new(state::AppState {
            store,
            generator,
            speech,
            shutdown: shutdown.clone(),
        });

        let mut app = Router::new()
            .route("/generate_story", post(story::generate_story))
            .route("/generate_audio", post(audio::generate_audio))
            .route("/audio/{filename}", get(audio::serve_audio))
            .route("/view_image", get(files::view_image))
            .route("/download", get(files::download))
            .with_state(state);

        if config.server.health.enabled {
            app = app.route(&config.server.health.path, get(health::health_handler));
        }

        app = app.layer(TraceLayer::new_for_http());

        Ok(Self {
            router: app,
            listen_address,
            shutdown,
        })
    }

    /// Run the server until `shutdown` fires
    ///
    /// Cancellation stops accepting connections, aborts in-flight
    /// generation waits, and drains remaining responses.
    ///
    /// # Errors
    ///
    /// Returns an error if binding or serving fails
    pub async fn serve(self, shutdown: CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;

        tracing::info!(address = %self.listen_address, "listening");

        let handlers = self.shutdown;
        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                handlers.cancel();
            })
            .await?;

        Ok(())
    }

    /// The assembled router, for tests that bind their own listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Address the server will bind
    pub fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }
}
