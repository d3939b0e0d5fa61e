//! # researcher-tool
//!
//! Built-in tools for the keyword research pipeline:
//!
//! - [`WebSearchTool`] - web search via the Serper API
//! - [`FileReadTool`] / [`FileWriteTool`] - text file access

pub mod file;
pub mod search;

pub use file::{FileReadTool, FileWriteTool};
pub use search::{SERPER_API_URL, WebSearchTool};
