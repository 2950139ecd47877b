//! Invocation of the external uber-apk-signer tool.
//!
//! This module provides:
//! - subprocess invocation and command-line construction for the signer CLI
//! - parsing of its verification output into structured results

pub mod invoker;
pub mod parser;

pub use invoker::*;
pub use parser::*;
