use std::fmt::Display;

use enum_map::EnumMap;

use super::StatusKind;
use crate::basic_types::NodeId;

/// A snapshot of the shape of a search tree, cheap enough to be taken while a worker is running.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TreeSummary {
    pub nodes: EnumMap<StatusKind, usize>,
    /// The number of nodes holding a copy.
    pub copies: usize,
    /// The number of nodes holding a working state.
    pub working_states: usize,
    pub max_depth: usize,
    pub best_node: Option<NodeId>,
    /// Whether the whole tree has been explored.
    pub exhausted: bool,
}

impl TreeSummary {
    pub fn total_nodes(&self) -> usize {
        self.nodes.values().sum()
    }
}

impl Display for TreeSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "nodes={} branch={} solved={} failed={} undetermined={} copies={} depth={}",
            self.total_nodes(),
            self.nodes[StatusKind::Branch] + self.nodes[StatusKind::Special],
            self.nodes[StatusKind::Solved],
            self.nodes[StatusKind::Failed],
            self.nodes[StatusKind::Undetermined],
            self.copies,
            self.max_depth,
        )
    }
}
