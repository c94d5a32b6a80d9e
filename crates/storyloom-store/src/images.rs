use std::path::{Path, PathBuf};

use crate::story::filename_contains;
use crate::{ArtifactStore, StoreError};

/// A generated illustration associated with one story
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    pub path: PathBuf,
    pub basename: String,
}

impl ArtifactStore {
    /// Illustrations belonging to a story
    ///
    /// The generator names artifacts `{title}_{suffix}`, so the primary
    /// association is a prefix match on the story's basename token (the
    /// text before the first underscore). When that yields nothing, a
    /// theme-substring match is tried instead. Results are sorted by
    /// filename so scene ordering is stable across directory scans.
    ///
    /// # Errors
    ///
    /// Returns an error if the image directory cannot be read
    pub fn images_for(&self, story_path: &Path, theme: &str) -> Result<Vec<ImageAsset>, StoreError> {
        let prefix = story_basename_token(story_path);

        let mut images = self.png_files(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(&prefix))
        })?;

        if images.is_empty() {
            tracing::debug!(%prefix, theme, "no prefix-matched images, trying theme match");
            images = self.png_files(|path| filename_contains(path, theme))?;
        }

        images.sort_by(|a, b| a.basename.cmp(&b.basename));
        Ok(images)
    }

    fn png_files(&self, keep: impl Fn(&Path) -> bool) -> Result<Vec<ImageAsset>, StoreError> {
        let entries = std::fs::read_dir(&self.image_dir)
            .map_err(|source| StoreError::io("read", &self.image_dir, source))?;

        let mut images = Vec::new();
        for entry in entries {
            let Ok(entry) = entry else { continue };
            let path = entry.path();

            if path.extension().is_none_or(|ext| ext != "png") || !keep(&path) {
                continue;
            }

            if let Some(basename) = path.file_name().and_then(|name| name.to_str()) {
                images.push(ImageAsset {
                    basename: basename.to_string(),
                    path,
                });
            }
        }

        Ok(images)
    }
}

/// The association token of a story file: its filename up to the first
/// underscore
fn story_basename_token(story_path: &Path) -> String {
    let name = story_path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();

    name.split('_').next().unwrap_or(name).to_string()
}
