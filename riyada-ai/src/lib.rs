//! Structured-completion assistant for the riyada toolkit.
//!
//! Every task builds a [`CompletionRequest`](client::CompletionRequest) with a
//! response schema, sends it through a [`CompletionService`], and decodes the
//! JSON payload defensively before anything touches learner state.

pub mod assistant;
pub mod client;
pub mod error;
pub mod gate;
pub mod parse;
pub mod schema;
pub mod tasks;

pub use assistant::Assistant;
pub use client::{CompletionRequest, CompletionService, GeminiClient};
pub use error::AiError;
pub use schema::ResponseSchema;
