//! Sync scheduler
//!
//! Drives a [`SyncEngine`](crate::sync::SyncEngine) on a tokio task:
//! - An initial sync on start
//! - A one-second countdown that triggers a sync when it reaches zero
//! - A periodic status re-render
//! - Manual triggers through a [`SyncHandle`]
//!
//! At most one exchange is in flight. Triggers that arrive meanwhile are
//! coalesced into a single pending sync, where a full sync wins.

mod driver;
mod handle;

pub use driver::*;
pub use handle::*;
