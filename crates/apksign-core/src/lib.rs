//! apksign Core Library
//!
//! Configuration, models, external-signer invocation, and tool routing for
//! the uber-apk-signer MCP server.

pub mod config;
pub mod error;
pub mod models;
pub mod signer;
pub mod tools;

pub use error::{ApkSignError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
