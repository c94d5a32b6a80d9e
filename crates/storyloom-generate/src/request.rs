use std::collections::BTreeSet;

use storyloom_core::Language;

/// One story-generation request
///
/// Exists for the duration of an HTTP call; the configuration it
/// carries is handed to the spawned generator as process environment,
/// never written to shared state.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub theme: String,
    pub language: Language,
    pub forbidden_words: BTreeSet<String>,
}

impl GenerationRequest {
    /// Build a request, merging user-supplied forbidden words into the
    /// configured base set
    ///
    /// User words arrive as free text separated by commas and/or
    /// whitespace; blanks are dropped and duplicates collapse.
    pub fn new(
        theme: impl Into<String>,
        language: Language,
        base_words: &[String],
        user_words: Option<&str>,
    ) -> Self {
        let mut forbidden_words: BTreeSet<String> = base_words.iter().cloned().collect();
        forbidden_words.extend(parse_words(user_words.unwrap_or_default()));

        Self {
            theme: theme.into(),
            language,
            forbidden_words,
        }
    }

    /// Forbidden words as the comma-separated list the generator reads
    pub fn forbidden_words_csv(&self) -> String {
        self.forbidden_words.iter().cloned().collect::<Vec<_>>().join(",")
    }
}

fn parse_words(raw: &str) -> impl Iterator<Item = String> + '_ {
    raw.split([',', ' ', '\t', '\n'])
        .map(str::trim)
        .filter(|word| !word.is_empty())
        .map(str::to_string)
}
