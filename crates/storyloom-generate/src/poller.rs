use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, SystemTime};

use storyloom_config::GeneratorConfig;
use storyloom_store::{ArtifactStore, StoryArtifact};
use tokio_util::sync::CancellationToken;

use crate::error::GenerateError;
use crate::flight::FlightRegistry;
use crate::request::GenerationRequest;

/// Outcome of a story request
#[derive(Debug)]
pub struct GeneratedStory {
    pub artifact: StoryArtifact,
    /// Served from an artifact that existed before this request
    pub cached: bool,
    /// Found only by the post-timeout scan; may predate this request
    pub stale: bool,
}

/// Spawns the external generator and waits for its artifact
pub struct StoryGenerator {
    config: GeneratorConfig,
    store: ArtifactStore,
    flights: FlightRegistry,
}

impl StoryGenerator {
    pub fn new(config: GeneratorConfig, store: ArtifactStore) -> Self {
        Self {
            config,
            store,
            flights: FlightRegistry::default(),
        }
    }

    /// Build a request from HTTP inputs, filling gaps from the
    /// configured defaults
    pub fn request(
        &self,
        theme: impl Into<String>,
        language: Option<storyloom_core::Language>,
        user_words: Option<&str>,
    ) -> GenerationRequest {
        GenerationRequest::new(
            theme,
            language.unwrap_or(self.config.language),
            &self.config.forbidden_words,
            user_words,
        )
    }

    /// Resolve an existing story for the theme or generate a new one
    ///
    /// Cache hits never launch the generator. On a miss the request
    /// takes the theme's flight lock; waiters that arrive while a
    /// generation is in flight re-check the resolver after the holder
    /// finishes and observe its artifact as a cache hit, so N
    /// concurrent requests for one theme spawn at most one process.
    ///
    /// # Errors
    ///
    /// See [`GenerateError`]
    pub async fn fetch_or_generate(
        &self,
        request: &GenerationRequest,
        cancel: &CancellationToken,
    ) -> Result<GeneratedStory, GenerateError> {
        if let Some(artifact) = self.store.resolve_story(&request.theme)? {
            tracing::info!(theme = %request.theme, path = %artifact.path.display(), "serving cached story");
            return Ok(GeneratedStory {
                artifact,
                cached: true,
                stale: false,
            });
        }

        let flight = self.flights.lock_for(&request.theme);
        let _guard = tokio::select! {
            guard = flight.lock_owned() => guard,
            () = cancel.cancelled() => return Err(GenerateError::Cancelled),
        };

        // A holder may have produced this theme while we waited
        if let Some(artifact) = self.store.resolve_story(&request.theme)? {
            tracing::info!(theme = %request.theme, "story generated by an earlier in-flight request");
            return Ok(GeneratedStory {
                artifact,
                cached: true,
                stale: false,
            });
        }

        self.generate(request, cancel).await
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
        cancel: &CancellationToken,
    ) -> Result<GeneratedStory, GenerateError> {
        let before = self.store.snapshot_stories()?;
        let started = SystemTime::now();

        self.spawn_generator(request)?;

        let interval = Duration::from_secs(self.config.poll_interval_seconds);
        let budget = Duration::from_secs(self.config.max_wait_seconds);
        let loop_started = tokio::time::Instant::now();
        let mut logged_minutes = 0;

        tracing::info!(
            theme = %request.theme,
            budget_seconds = budget.as_secs(),
            "generator launched, waiting for story artifact"
        );

        loop {
            let elapsed = loop_started.elapsed();
            if elapsed >= budget {
                break;
            }

            tokio::select! {
                () = tokio::time::sleep(interval) => {}
                () = cancel.cancelled() => {
                    tracing::info!(theme = %request.theme, "wait cancelled, generator left running");
                    return Err(GenerateError::Cancelled);
                }
            }

            if let Some(path) = self.scan(&before, &request.theme, started)? {
                return self.finish(path, false);
            }

            let minutes = elapsed.as_secs() / 60;
            if minutes > logged_minutes {
                logged_minutes = minutes;
                tracing::info!(theme = %request.theme, minutes, "still waiting for story artifact");
            }
        }

        // Budget exhausted: one best-effort scan for any theme match,
        // which may predate this request
        if let Some(path) = self.store.newest_story_matching(&request.theme)? {
            tracing::warn!(
                theme = %request.theme,
                path = %path.display(),
                "wait budget elapsed, using latest theme match which may be stale"
            );
            return self.finish(path, true);
        }

        if self.store.story_files()?.is_empty() {
            return Err(GenerateError::NotFound);
        }

        Err(GenerateError::Timeout)
    }

    /// One poll iteration: look for a plausible artifact
    ///
    /// A file absent from the pre-launch snapshot wins first (newest
    /// such file); failing that, a theme-substring match modified after
    /// the launch. The first hit ends the wait — later files belong to
    /// the next request.
    fn scan(
        &self,
        before: &HashSet<PathBuf>,
        theme: &str,
        started: SystemTime,
    ) -> Result<Option<PathBuf>, GenerateError> {
        let files = self.store.story_files()?;

        let newest_unseen = files
            .iter()
            .filter(|(path, _)| !before.contains(path))
            .max_by_key(|(_, modified)| *modified);
        if let Some((path, _)) = newest_unseen {
            tracing::debug!(path = %path.display(), "new story file detected");
            return Ok(Some(path.clone()));
        }

        let fresh_theme_match = files
            .iter()
            .filter(|(path, modified)| filename_contains(path, theme) && *modified > started)
            .max_by_key(|(_, modified)| *modified);
        if let Some((path, _)) = fresh_theme_match {
            tracing::debug!(path = %path.display(), "freshly modified theme match detected");
            return Ok(Some(path.clone()));
        }

        Ok(None)
    }

    fn finish(&self, path: PathBuf, stale: bool) -> Result<GeneratedStory, GenerateError> {
        let artifact = self.store.load_story(&path)?;
        if artifact.is_blank() {
            return Err(GenerateError::EmptyArtifact(path));
        }

        Ok(GeneratedStory {
            artifact,
            cached: false,
            stale,
        })
    }

    /// Launch the generator detached
    ///
    /// The theme rides as the final argument and the request
    /// configuration as process environment. The child is deliberately
    /// not awaited and never killed: its exit status and output are
    /// meaningless here, only the files it writes matter.
    fn spawn_generator(&self, request: &GenerationRequest) -> Result<(), GenerateError> {
        let child = tokio::process::Command::new(&self.config.command)
            .args(&self.config.args)
            .arg(&request.theme)
            .env("OUTPUT_LANG", request.language.code())
            .env("FORBIDDEN_KEYWORDS", request.forbidden_words_csv())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(false)
            .spawn()
            .map_err(|source| GenerateError::Spawn {
                command: self.config.command.clone(),
                source,
            })?;

        drop(child);
        Ok(())
    }
}

fn filename_contains(path: &Path, needle: &str) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.contains(needle))
}
