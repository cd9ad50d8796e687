//! Error handling, timing and test utilities shared across the crystal-growth workspace.
#![forbid(unsafe_code)]

#[macro_use]
mod cast_macro;

mod error;
mod generational_index;
mod no_hasher;
mod test_logger;
mod timing;

pub use error::*;
pub use generational_index::*;
pub use no_hasher::*;
pub use random_test::*;
pub use test_logger::*;
pub use timing::*;
