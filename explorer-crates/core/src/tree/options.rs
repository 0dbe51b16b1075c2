/// Options which determine how the search tree stores and rebuilds solver states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExplorerOptions {
    /// A branch node whose state had to be rebuilt from more than `copy_distance` decisions keeps
    /// that state as a copy, so its descendants recompute from there. Must be at least 1.
    pub copy_distance: u32,
    /// When a recomputation replays more than this many decisions, a copy of the state half-way
    /// down the path is stored as well. `None` disables these intermediate copies.
    pub adaptive_distance: Option<u32>,
    /// Whether the last untried child of a node may take the copy of that node instead of
    /// recomputing.
    pub last_alternative_optimisation: bool,
}

impl Default for ExplorerOptions {
    fn default() -> Self {
        Self {
            copy_distance: 8,
            adaptive_distance: Some(2),
            last_alternative_optimisation: true,
        }
    }
}

impl ExplorerOptions {
    pub(crate) fn effective_copy_distance(&self) -> u32 {
        self.copy_distance.max(1)
    }
}
