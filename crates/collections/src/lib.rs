//! The bucketed priority container, the interning set and the sorted-vector set shared
//! across the crystal-growth workspace.
#![forbid(unsafe_code)]

mod bucket;
mod indexed_set;
mod vecset;

pub use bucket::*;
pub use indexed_set::*;
pub use vecset::*;
