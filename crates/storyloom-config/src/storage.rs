use std::path::PathBuf;

use serde::Deserialize;

/// Artifact directory layout
///
/// The external generator writes stories and illustrations into these
/// directories; this service only ever reads them, plus writes narrated
/// audio into `audio_dir`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory holding one markdown file per generated story
    #[serde(default = "default_story_dir")]
    pub story_dir: PathBuf,
    /// Directory holding generated PNG illustrations
    #[serde(default = "default_image_dir")]
    pub image_dir: PathBuf,
    /// Directory this service writes narrated audio into
    #[serde(default = "default_audio_dir")]
    pub audio_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            story_dir: default_story_dir(),
            image_dir: default_image_dir(),
            audio_dir: default_audio_dir(),
        }
    }
}

fn default_story_dir() -> PathBuf {
    PathBuf::from("generated_stories")
}

fn default_image_dir() -> PathBuf {
    PathBuf::from("generated_images")
}

fn default_audio_dir() -> PathBuf {
    PathBuf::from("generated_audio")
}
