//! Generation poller: bridges the fire-and-forget external generator
//! to a request/response cycle
//!
//! The external generator is an opaque command. It is spawned detached
//! with request-scoped configuration, and completion is observed by
//! polling the story directory for a new artifact until a deadline.
//! Concurrent requests for the same theme share one in-flight
//! generation.

mod error;
mod flight;
mod poller;
mod request;

pub use error::GenerateError;
pub use poller::{GeneratedStory, StoryGenerator};
pub use request::GenerationRequest;
