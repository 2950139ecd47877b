//! Tool surface exposed over the protocol.
//!
//! The catalog is the static contract clients discover via `tools/list`;
//! the router turns `tools/call` requests into signer invocations and
//! uniform response envelopes.

pub mod catalog;
pub mod router;

pub use catalog::*;
pub use router::*;
