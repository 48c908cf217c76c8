//! Shared, file-backed task tree for a checklist companion app and AI agents.
//!
//! The crate is layered leaves first:
//! - [`storage`]: atomic document writes, the project registry, task document
//!   load/save and the append-only raw log.
//! - [`tree`]: id lookup and ancestry-preserving filtering over a forest.
//! - [`service`]: request-level operations returning rendered text.
//! - [`mcp`]: the stdio MCP tool surface over [`service`].

pub mod config;
pub mod error;
pub mod mcp;
pub mod models;
pub mod render;
pub mod service;
pub mod storage;
pub mod tree;

pub use error::{Result, StoreError};
