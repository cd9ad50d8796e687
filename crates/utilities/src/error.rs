use std::path::PathBuf;

use thiserror::Error;

/// The error taxonomy for the crystal-growth workspace.
///
/// Only conditions that a caller can reasonably recover from are represented
/// here. Precondition violations on the hot paths (toggling a vertex that is
/// not in the named boundary, reading the priority of an absent key, an
/// invariant check failing) are programming errors and are reported with
/// `debug_assert!`/`panic!` instead, per the propagation policy: construction
/// fails loudly through `Result`, steady-state operations trust their
/// preconditions.
#[derive(Error, Debug)]
pub enum CrystalError {
    /// An invalid lattice, seed or search configuration was supplied at
    /// construction time (unknown lattice name, malformed basis, a seed
    /// vertex of the wrong dimension, and so on).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// An allocation or size precondition could not be satisfied for the
    /// requested enumeration.
    #[error("out of resources: {0}")]
    ResourceExhausted(String),

    /// A crystal dump was requested but a file already exists at the target
    /// path. Non-fatal: the caller is expected to log this and continue with
    /// the remaining sizes.
    #[error("dump destination already exists: {}", .0.display())]
    DumpCollision(PathBuf),
}
