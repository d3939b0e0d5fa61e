//! # researcher-core
//!
//! Core traits and types for the keyword research pipeline.
//!
//! ## Overview
//!
//! This crate provides the foundational abstractions shared by the pipeline
//! crates:
//!
//! - [`ResearchTopic`] / [`RequestConfig`] - the domain schema, with
//!   validation via [`RequestConfig::from_value`]
//! - [`ChatModel`] - the hosted chat-completion collaborator
//! - [`Tool`] / [`Toolset`] - external capabilities (web search, file I/O)
//! - [`StageResult`] / [`RunResults`] / [`ResearchOutput`] - run outputs
//! - [`ResearcherError`] / [`Result`] - unified error handling

pub mod error;
pub mod model;
pub mod schema;
pub mod tool;
pub mod types;

pub use error::{ResearcherError, Result};
pub use model::{
    ChatMessage, ChatModel, ChatRequest, ChatResponse, ChatRole, GenerationConfig, ModelConfig,
    ToolCall, ToolDeclaration, Usage,
};
pub use tool::{Tool, Toolset};
pub use types::{
    DEFAULT_MAX_SOURCES, RequestConfig, ResearchDepth, ResearchOutput, ResearchTopic, RunResults,
    StageResult,
};
