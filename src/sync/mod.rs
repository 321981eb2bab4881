//! Sync layer
//!
//! Implements:
//! - Accumulated content state and its persisted snapshot
//! - Append-only merging of fetched deltas
//! - Task scoring
//! - Connectivity status and the automatic sync countdown
//! - The engine running sync cycles

mod content;
mod display;
mod engine;
mod merge;
mod score;
mod store;
mod tracker;

pub use content::*;
pub use display::*;
pub use engine::*;
pub use merge::*;
pub use score::*;
pub use store::*;
pub use tracker::*;
