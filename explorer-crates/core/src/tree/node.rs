use std::sync::Arc;

use enum_map::Enum;

use crate::basic_types::ExplorerError;
use crate::basic_types::NodeId;
use crate::space::Decision;
use crate::space::SolverState;
use crate::space::SpecialDescriptor;
use crate::tree::BestId;

/// The status of a node.
///
/// Every node starts out as [`NodeStatus::Undetermined`]; once it has been expanded (or a status
/// has been forced onto it) the status never changes again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeStatus {
    Undetermined,
    /// The node has the given number of children.
    Branch(usize),
    Solved,
    Failed,
    /// A user supplied constraint was posted; the node has a single child.
    Special,
}

impl NodeStatus {
    pub fn is_determined(self) -> bool {
        self != NodeStatus::Undetermined
    }

    pub fn kind(self) -> StatusKind {
        match self {
            NodeStatus::Undetermined => StatusKind::Undetermined,
            NodeStatus::Branch(_) => StatusKind::Branch,
            NodeStatus::Solved => StatusKind::Solved,
            NodeStatus::Failed => StatusKind::Failed,
            NodeStatus::Special => StatusKind::Special,
        }
    }
}

/// [`NodeStatus`] without the payload, used to count nodes per status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Enum)]
pub enum StatusKind {
    Undetermined,
    Branch,
    Solved,
    Failed,
    Special,
}

/// A status which can be imposed on an undetermined node from outside.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ForcedStatus {
    /// Post the descriptor at the node; the node gets exactly one child.
    Special(SpecialDescriptor),
    /// Mark the node as failed without looking at its state.
    Failed,
}

/// A state shared behind an [`Arc`] so it can be cloned outside of the tree lock.
#[derive(Debug)]
pub(crate) struct Snapshot<S> {
    pub(crate) state: Arc<S>,
    /// The best solution the state has been constrained with.
    pub(crate) bound: Option<BestId>,
}

impl<S> Clone for Snapshot<S> {
    fn clone(&self) -> Self {
        Snapshot {
            state: Arc::clone(&self.state),
            bound: self.bound,
        }
    }
}

/// An exclusively owned state together with the best solution it has been constrained with.
#[derive(Debug)]
pub(crate) struct Bounded<S> {
    pub(crate) state: S,
    pub(crate) bound: Option<BestId>,
}

pub(crate) struct SearchNode<S: SolverState> {
    pub(crate) parent: Option<NodeId>,
    pub(crate) alternative: usize,
    pub(crate) depth: usize,
    pub(crate) status: NodeStatus,
    pub(crate) decision: Option<Decision<S::Branching>>,
    /// Children are stored contiguously; child `i` is `first_child + i`.
    pub(crate) first_child: Option<NodeId>,
    pub(crate) owned_copy: Option<Snapshot<S>>,
    pub(crate) working_state: Option<Bounded<S>>,
    pub(crate) open_child_count: usize,
    pub(crate) has_failed_descendant: bool,
    pub(crate) has_solved_descendant: bool,
    pub(crate) reopened: bool,
    pub(crate) expansion_error: Option<ExplorerError>,
    /// The best solution the state of this node was constrained with when it was determined.
    pub(crate) own_best: Option<BestId>,
    pub(crate) best_as_of_creation: Option<BestId>,
}

impl<S: SolverState> std::fmt::Debug for SearchNode<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchNode")
            .field("parent", &self.parent)
            .field("alternative", &self.alternative)
            .field("status", &self.status)
            .field("open_child_count", &self.open_child_count)
            .field("has_copy", &self.owned_copy.is_some())
            .field("has_working_state", &self.working_state.is_some())
            .finish_non_exhaustive()
    }
}

impl<S: SolverState> SearchNode<S> {
    pub(crate) fn new(
        parent: Option<NodeId>,
        alternative: usize,
        depth: usize,
        best_as_of_creation: Option<BestId>,
    ) -> Self {
        SearchNode {
            parent,
            alternative,
            depth,
            status: NodeStatus::Undetermined,
            decision: None,
            first_child: None,
            owned_copy: None,
            working_state: None,
            open_child_count: 0,
            has_failed_descendant: false,
            has_solved_descendant: false,
            reopened: false,
            expansion_error: None,
            own_best: None,
            best_as_of_creation,
        }
    }

    pub(crate) fn number_of_children(&self) -> usize {
        match self.status {
            NodeStatus::Branch(alternatives) => alternatives,
            NodeStatus::Special => 1,
            NodeStatus::Undetermined | NodeStatus::Solved | NodeStatus::Failed => 0,
        }
    }

    /// A node is open while it (or something below it) still has to be explored.
    pub(crate) fn is_open(&self) -> bool {
        match self.status {
            NodeStatus::Undetermined => true,
            NodeStatus::Branch(_) | NodeStatus::Special => {
                self.open_child_count > 0 || self.reopened
            }
            NodeStatus::Solved | NodeStatus::Failed => self.reopened,
        }
    }

    /// The bound the state of this node is defined under; undetermined nodes use the best which
    /// was known when they were created.
    pub(crate) fn defining_bound(&self) -> Option<BestId> {
        if self.status.is_determined() {
            self.own_best
        } else {
            self.best_as_of_creation
        }
    }
}
