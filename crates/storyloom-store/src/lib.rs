//! Artifact store: the filesystem contract between this service and
//! the external generator
//!
//! The generator writes story markdown into the story directory and
//! PNG illustrations into the image directory; this service reads both
//! and writes narrated audio into the audio directory. Stories are
//! immutable once written; every write performed here lands under a
//! temporary name and is renamed into place so readers never observe a
//! partial file.

mod audio;
mod error;
mod images;
mod story;

use std::path::{Path, PathBuf};

use storyloom_config::StorageConfig;

pub use audio::AudioArtifact;
pub use error::StoreError;
pub use images::ImageAsset;
pub use story::StoryArtifact;

/// Handle on the three artifact directories
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    story_dir: PathBuf,
    image_dir: PathBuf,
    audio_dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            story_dir: config.story_dir.clone(),
            image_dir: config.image_dir.clone(),
            audio_dir: config.audio_dir.clone(),
        }
    }

    /// Create the artifact directories if they do not exist yet
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be created
    pub fn ensure_layout(&self) -> Result<(), StoreError> {
        for dir in [&self.story_dir, &self.image_dir, &self.audio_dir] {
            std::fs::create_dir_all(dir).map_err(|source| StoreError::io("create", dir, source))?;
        }
        Ok(())
    }

    pub fn story_dir(&self) -> &Path {
        &self.story_dir
    }

    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }

    pub fn audio_dir(&self) -> &Path {
        &self.audio_dir
    }

    /// Resolve a path to a servable artifact file
    ///
    /// Accepts only paths that canonicalize to a location inside one of
    /// the three artifact directories; everything else — missing files
    /// included — yields `None` so callers answer 404 without
    /// distinguishing traversal attempts from absent files.
    pub fn servable_path(&self, requested: &Path) -> Option<PathBuf> {
        let canonical = requested.canonicalize().ok()?;

        let contained = [&self.story_dir, &self.image_dir, &self.audio_dir]
            .into_iter()
            .filter_map(|dir| dir.canonicalize().ok())
            .any(|dir| canonical.starts_with(dir));

        (contained && canonical.is_file()).then_some(canonical)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Store over three fresh temp directories
    pub fn temp_store() -> (tempfile::TempDir, ArtifactStore) {
        let root = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            story_dir: root.path().join("stories"),
            image_dir: root.path().join("images"),
            audio_dir: root.path().join("audio"),
        };
        let store = ArtifactStore::new(&config);
        store.ensure_layout().unwrap();
        (root, store)
    }
}
