//! Speech synthesis pipeline
//!
//! Narration goes through the provider's asynchronous long-form task
//! API first (create, poll, download); when any step of that path
//! fails, the already-truncated text is re-synthesized through the
//! synchronous short-form endpoint in fixed-size chunks, skipping
//! chunks that fail individually. A request only errors once both
//! modes have produced nothing.

mod backend;
mod error;
mod pipeline;
mod text;
mod token;

pub use backend::{ChunkOutcome, CreateOutcome, HttpBackend, SpeechBackend, TaskSnapshot};
pub use error::SpeechError;
pub use pipeline::SpeechSynthesizer;
pub use token::TokenSource;
