//! Todosync - Remote Sync Client
//!
//! Implements:
//! - Wire types of the task service's sync endpoint
//! - Classification of an exchange into success, offline or server-down
//! - An HTTP client performing one exchange per call (`remote` feature)

#[cfg(feature = "remote")]
mod client;
mod outcome;
mod wire;

#[cfg(feature = "remote")]
pub use client::*;
pub use outcome::*;
pub use wire::*;
