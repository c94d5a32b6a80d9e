#![allow(clippy::must_use_candidate)]

mod env;
pub mod generator;
pub mod health;
mod loader;
pub mod server;
pub mod speech;
pub mod storage;

use serde::Deserialize;

pub use generator::GeneratorConfig;
pub use health::HealthConfig;
pub use server::ServerConfig;
pub use speech::{SpeechConfig, VoiceConfig};
pub use storage::StorageConfig;

/// Top-level Storyloom configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Artifact directory layout
    #[serde(default)]
    pub storage: StorageConfig,
    /// External story generator configuration
    #[serde(default)]
    pub generator: GeneratorConfig,
    /// Speech synthesis provider configuration
    #[serde(default)]
    pub speech: Option<SpeechConfig>,
}
