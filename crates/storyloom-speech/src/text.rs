use std::sync::OnceLock;

use regex::Regex;

fn image_refs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"!\[[^\]]*\]\([^)]*\)").expect("must be valid regex"))
}

/// Prepare raw text for synthesis: drop illustration references and
/// truncate to the provider's long-form limit
///
/// Truncation discards the remainder outright; splitting into chunks
/// only happens later, in the short-form fallback, and operates on this
/// already-truncated text.
pub fn normalize(text: &str, max_chars: usize) -> String {
    let stripped = image_refs().replace_all(text, "");
    truncate_chars(&stripped, max_chars).to_string()
}

/// Truncate to at most `max_chars` characters, on a character boundary
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Split into chunks of `size` characters, preserving order
///
/// The final chunk carries the remainder; concatenating the chunks
/// reproduces the input exactly.
pub fn chunk_chars(text: &str, size: usize) -> Vec<String> {
    assert!(size > 0, "chunk size must be positive");

    let chars: Vec<char> = text.chars().collect();
    chars.chunks(size).map(|chunk| chunk.iter().collect()).collect()
}
