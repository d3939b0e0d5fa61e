//! # researcher-model
//!
//! Chat-completion model clients for the keyword research pipeline:
//!
//! - [`OpenAIChatModel`] - OpenAI-compatible chat completions over HTTP
//! - [`MockChatModel`] - scripted model for tests
//!
//! Retries and timeouts are deliberately absent: the pipeline treats the
//! hosted model as an opaque collaborator and re-invokes the whole run if
//! retry behavior is wanted.

pub mod config;
pub mod mock;
pub mod openai;

pub use config::{OPENAI_API_BASE, OpenAIConfig};
pub use mock::MockChatModel;
pub use openai::OpenAIChatModel;
