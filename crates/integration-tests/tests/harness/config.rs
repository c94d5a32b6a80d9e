//! Config builder over temporary artifact directories

use std::path::PathBuf;

use storyloom_config::{Config, GeneratorConfig, HealthConfig, ServerConfig, SpeechConfig, StorageConfig};
use storyloom_core::Language;

/// Builds a server config whose "generator" is a shell script
///
/// The script sees the theme as `$0`, exactly like a real generator
/// command would see its final argument.
pub struct ConfigBuilder {
    root: tempfile::TempDir,
    script: String,
    poll_seconds: u64,
    wait_seconds: u64,
    health: bool,
    speech: Option<SpeechConfig>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().expect("tempdir must be creatable"),
            script: "true".to_string(),
            poll_seconds: 1,
            wait_seconds: 3,
            health: true,
            speech: None,
        }
    }

    pub fn with_generator_script(mut self, script: impl Into<String>) -> Self {
        self.script = script.into();
        self
    }

    pub fn with_wait_seconds(mut self, wait_seconds: u64) -> Self {
        self.wait_seconds = wait_seconds;
        self
    }

    pub fn without_health(mut self) -> Self {
        self.health = false;
        self
    }

    pub fn with_speech(mut self, speech: SpeechConfig) -> Self {
        self.speech = Some(speech);
        self
    }

    pub fn story_dir(&self) -> PathBuf {
        self.root.path().join("stories")
    }

    pub fn image_dir(&self) -> PathBuf {
        self.root.path().join("images")
    }

    pub fn build(self) -> (Config, tempfile::TempDir) {
        let config = Config {
            server: ServerConfig {
                listen_address: None,
                health: HealthConfig {
                    enabled: self.health,
                    path: "/health".to_string(),
                },
            },
            storage: StorageConfig {
                story_dir: self.root.path().join("stories"),
                image_dir: self.root.path().join("images"),
                audio_dir: self.root.path().join("audio"),
            },
            generator: GeneratorConfig {
                command: "sh".to_string(),
                args: vec!["-c".to_string(), self.script],
                language: Language::Zh,
                forbidden_words: vec!["scary".to_string()],
                poll_interval_seconds: self.poll_seconds,
                max_wait_seconds: self.wait_seconds,
            },
            speech: self.speech,
        };

        (config, self.root)
    }
}
