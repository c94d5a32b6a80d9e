use storyloom_generate::StoryGenerator;
use storyloom_speech::SpeechSynthesizer;
use storyloom_store::ArtifactStore;
use tokio_util::sync::CancellationToken;

/// Shared handler state
pub struct AppState {
    pub store: ArtifactStore,
    pub generator: StoryGenerator,
    /// Absent when no speech provider is configured
    pub speech: Option<SpeechSynthesizer>,
    /// Cancelled on shutdown so in-flight generation waits end promptly
    pub shutdown: CancellationToken,
}
