//! Depth-first enumeration over reachable crystal configurations under local-minimum
//! transitions: translation-invariant deduplication, per-population-size aggregation,
//! report rendering and crystal dumping.
#![forbid(unsafe_code)]

mod cursor;
mod dump;
mod report;
mod search;
mod subset;
mod ti_key;

pub use cursor::StateCursor;
pub use dump::dump_to_directory;
pub use dump::dump_to_writer;
pub use dump::render_crystal;
pub use dump::DumpFlags;
pub use report::Report;
pub use search::search;
pub use search::SearchConfig;
pub use search::SearchResult;
pub use subset::Subset;
pub use ti_key::ti_key;
pub use ti_key::TiKey;
