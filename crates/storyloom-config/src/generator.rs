use serde::Deserialize;
use storyloom_core::Language;

/// External story generator configuration
///
/// The generator is an opaque command: it receives the theme as its
/// final argument and the request language / forbidden-word set through
/// `OUTPUT_LANG` and `FORBIDDEN_KEYWORDS` environment variables, then
/// eventually writes a markdown story and PNG illustrations into the
/// storage directories. Its exit status is never inspected.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Command to spawn, e.g. `python3`
    #[serde(default = "default_command")]
    pub command: String,
    /// Arguments preceding the theme, e.g. `["story_generator.py"]`
    #[serde(default)]
    pub args: Vec<String>,
    /// Default output language when the request does not carry one
    #[serde(default)]
    pub language: Language,
    /// Base forbidden-word set merged with the per-request words
    #[serde(default = "default_forbidden_words")]
    pub forbidden_words: Vec<String>,
    /// Seconds between artifact directory scans
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    /// Overall wait budget before a generation times out
    #[serde(default = "default_max_wait")]
    pub max_wait_seconds: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            args: Vec::new(),
            language: Language::default(),
            forbidden_words: default_forbidden_words(),
            poll_interval_seconds: default_poll_interval(),
            max_wait_seconds: default_max_wait(),
        }
    }
}

fn default_command() -> String {
    "python3".to_string()
}

fn default_forbidden_words() -> Vec<String> {
    ["nsfw", "ugly", "scary", "horror", "violent", "blood", "gore", "disturbing"]
        .map(str::to_string)
        .to_vec()
}

#[allow(clippy::missing_const_for_fn)]
fn default_poll_interval() -> u64 {
    5
}

#[allow(clippy::missing_const_for_fn)]
fn default_max_wait() -> u64 {
    2700
}
