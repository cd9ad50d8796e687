//! Uniform-neighborhood lattices: vertex interning and lazily materialised neighbor
//! adjacency over `Z^d`.
#![forbid(unsafe_code)]

mod lattice;
mod neighborhood;

pub use lattice::Lattice;
pub use lattice::VertexKey;
pub use neighborhood::UniformNeighborhood;
