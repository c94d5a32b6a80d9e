use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::{ArtifactStore, StoreError};

/// A generated story as found on disk
///
/// Identity is the filesystem path. The raw text is immutable once the
/// generator has written it; rendering and narration are projections.
#[derive(Debug, Clone)]
pub struct StoryArtifact {
    pub path: PathBuf,
    pub modified: SystemTime,
    pub raw_text: String,
}

impl StoryArtifact {
    /// True when the story contains no visible content
    pub fn is_blank(&self) -> bool {
        self.raw_text.trim().is_empty()
    }
}

impl ArtifactStore {
    /// Snapshot the set of story files currently on disk
    ///
    /// # Errors
    ///
    /// Returns an error if the story directory cannot be read
    pub fn snapshot_stories(&self) -> Result<HashSet<PathBuf>, StoreError> {
        Ok(self.story_files()?.into_iter().map(|(path, _)| path).collect())
    }

    /// Find the latest story whose filename contains `theme`
    ///
    /// Blank stories are treated as misses. The substring match is a
    /// pragmatic cache key: distinct themes sharing a substring collide,
    /// and staleness is bounded only by external directory cleanup.
    ///
    /// # Errors
    ///
    /// Returns an error if the story directory cannot be read
    pub fn resolve_story(&self, theme: &str) -> Result<Option<StoryArtifact>, StoreError> {
        let Some(path) = self.newest_story_matching(theme)? else {
            return Ok(None);
        };

        let artifact = self.load_story(&path)?;
        if artifact.is_blank() {
            tracing::warn!(path = %path.display(), "ignoring blank story file");
            return Ok(None);
        }

        Ok(Some(artifact))
    }

    /// Latest story file whose filename contains `theme`, regardless of
    /// content
    ///
    /// # Errors
    ///
    /// Returns an error if the story directory cannot be read
    pub fn newest_story_matching(&self, theme: &str) -> Result<Option<PathBuf>, StoreError> {
        let newest = self
            .story_files()?
            .into_iter()
            .filter(|(path, _)| filename_contains(path, theme))
            .max_by_key(|(_, modified)| *modified)
            .map(|(path, _)| path);

        Ok(newest)
    }

    /// Read one story file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its metadata is
    /// unavailable
    pub fn load_story(&self, path: &Path) -> Result<StoryArtifact, StoreError> {
        let raw_text =
            std::fs::read_to_string(path).map_err(|source| StoreError::io("read", path, source))?;
        let modified = std::fs::metadata(path)
            .and_then(|meta| meta.modified())
            .map_err(|source| StoreError::io("stat", path, source))?;

        Ok(StoryArtifact {
            path: path.to_path_buf(),
            modified,
            raw_text,
        })
    }

    /// All story files with their modification times
    ///
    /// Files whose metadata cannot be read (e.g. deleted mid-scan) are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the story directory cannot be read
    pub fn story_files(&self) -> Result<Vec<(PathBuf, SystemTime)>, StoreError> {
        let entries = std::fs::read_dir(&self.story_dir)
            .map_err(|source| StoreError::io("read", &self.story_dir, source))?;

        let mut files = Vec::new();
        for entry in entries {
            let Ok(entry) = entry else { continue };
            let path = entry.path();

            if path.extension().is_none_or(|ext| ext != "md") {
                continue;
            }

            if let Ok(modified) = entry.metadata().and_then(|meta| meta.modified()) {
                files.push((path, modified));
            }
        }

        Ok(files)
    }
}

pub(crate) fn filename_contains(path: &Path, needle: &str) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.contains(needle))
}
