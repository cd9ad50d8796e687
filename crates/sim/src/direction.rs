/// Which way a single-vertex toggle moves the subset: growth (add a vertex) or shrink
/// (remove one).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Add a vertex: pulls candidates from the exterior boundary.
    Forwards,
    /// Remove a vertex: pulls candidates from the interior boundary.
    Backwards,
}

impl Direction {
    /// The opposite direction.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Forwards => Direction::Backwards,
            Direction::Backwards => Direction::Forwards,
        }
    }
}
