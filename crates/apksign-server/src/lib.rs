//! apksign MCP server.
//!
//! Serves the tool catalog from apksign-core over newline-delimited
//! JSON-RPC 2.0 on stdin/stdout.

pub mod cli;
pub mod server;
