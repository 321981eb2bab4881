//! Core traits, constants and error types (always included).

mod constants;
mod error;
mod traits;

pub use constants::*;
pub use error::*;
pub use traits::*;
