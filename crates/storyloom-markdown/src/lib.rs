//! Pure projections over generated story markdown
//!
//! The generator writes stories as markdown with a title heading, a
//! cast list, vocabulary blocks, and inline illustration references.
//! This crate derives two views from that text without ever mutating
//! it: narration-ready plain text and an ordered block structure for
//! display.

mod extract;
mod render;

pub use extract::extract_plain_text;
pub use render::{Block, ListEntry, RenderedDocument, render};
