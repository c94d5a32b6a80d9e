use std::path::PathBuf;

use uuid::Uuid;

use crate::{ArtifactStore, StoreError};

/// Narrated audio written by this service
#[derive(Debug, Clone)]
pub struct AudioArtifact {
    pub path: PathBuf,
    pub filename: String,
    pub byte_len: usize,
}

impl ArtifactStore {
    /// Persist synthesized audio under a fresh unique filename
    ///
    /// The payload is written to a temporary name and renamed into
    /// place, so a concurrent reader either sees the whole file or none
    /// of it. Empty payloads are rejected: an audio artifact is only
    /// valid with a nonzero byte length.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::EmptyAudio` for a zero-length payload, or
    /// an I/O error if the write or rename fails
    pub fn write_audio(&self, bytes: &[u8]) -> Result<AudioArtifact, StoreError> {
        if bytes.is_empty() {
            return Err(StoreError::EmptyAudio);
        }

        let id = Uuid::new_v4();
        let filename = format!("story_audio_{id}.mp3");
        let staging = self.audio_dir.join(format!(".{id}.tmp"));
        let path = self.audio_dir.join(&filename);

        std::fs::write(&staging, bytes).map_err(|source| StoreError::io("write", &staging, source))?;
        std::fs::rename(&staging, &path).map_err(|source| StoreError::io("rename", &path, source))?;

        tracing::debug!(path = %path.display(), bytes = bytes.len(), "audio artifact written");

        Ok(AudioArtifact {
            path,
            filename,
            byte_len: bytes.len(),
        })
    }

    /// Locate a previously written audio file by its bare filename
    ///
    /// Rejects anything that is not a plain filename (path separators,
    /// parent references) and anything that does not exist.
    pub fn audio_file(&self, filename: &str) -> Option<PathBuf> {
        if filename.is_empty() || filename.contains(['/', '\\']) || filename.contains("..") {
            return None;
        }

        let path = self.audio_dir.join(filename);
        path.is_file().then_some(path)
    }
}
