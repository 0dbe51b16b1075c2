//! The search tree: an arena of nodes which lazily acquire solver states, decide whether to keep
//! them as copies or hand them down to a child, and keep the open/closed bookkeeping of the tree
//! up to date.
//!
//! Every operation on a [`SearchTree`] is synchronous. The expansion of a node is split into a
//! preparation, a run and a completion phase so that [`crate::SharedTree`] only needs to hold its
//! lock while states are moved around, not while they are cloned or propagated.
mod acquisition;
mod best_solution;
mod bookkeeping;
mod expansion;
mod node;
mod options;
mod statistics;
mod summary;
#[cfg(test)]
pub(crate) mod test_space;

use std::sync::Arc;

pub use best_solution::BestId;
pub use best_solution::BestSolution;
pub(crate) use expansion::Expanded;
pub(crate) use expansion::Preparation;
pub use node::ForcedStatus;
pub use node::NodeStatus;
pub use node::StatusKind;
pub use options::ExplorerOptions;
pub use statistics::ExplorerStatistics;
pub use summary::TreeSummary;

use self::node::SearchNode;
use self::node::Snapshot;
use crate::basic_types::ExplorerError;
use crate::basic_types::NodeId;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;
use crate::space::Better;
use crate::space::Decision;
use crate::space::SolverState;
use crate::statistics::should_log_statistics;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;
use crate::termination::TerminationCondition;

/// A search tree over states of type `S`.
///
/// The root holds a copy of the initial state for the whole lifetime of the tree; every other
/// state is either derived from it or from a copy stored further down.
pub struct SearchTree<S: SolverState> {
    nodes: KeyedVec<NodeId, SearchNode<S>>,
    best: Option<BestSolution<S>>,
    options: ExplorerOptions,
    statistics: ExplorerStatistics,
}

impl<S: SolverState> std::fmt::Debug for SearchTree<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchTree")
            .field("nodes", &self.nodes.len())
            .field("best", &self.best)
            .field("options", &self.options)
            .field("statistics", &self.statistics)
            .finish()
    }
}

impl<S: SolverState> SearchTree<S> {
    /// Create a tree for a satisfaction search.
    pub fn new(root: S, options: ExplorerOptions) -> Self {
        Self::create(root, None, options)
    }

    /// Create a tree for a branch-and-bound search; every state is constrained with the best
    /// solution known when it is expanded.
    pub fn with_comparator(
        root: S,
        better: impl Better<S> + 'static,
        options: ExplorerOptions,
    ) -> Self {
        Self::create(root, Some(BestSolution::new(better)), options)
    }

    fn create(root: S, best: Option<BestSolution<S>>, options: ExplorerOptions) -> Self {
        let mut nodes = KeyedVec::default();
        let mut root_node = SearchNode::new(None, 0, 0, None);
        root_node.owned_copy = Some(Snapshot {
            state: Arc::new(root),
            bound: None,
        });
        let root_id = nodes.push(root_node);
        crate::explorer_assert_eq_simple!(NodeId::ROOT, root_id);

        SearchTree {
            nodes,
            best,
            options,
            statistics: ExplorerStatistics::default(),
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn options(&self) -> &ExplorerOptions {
        &self.options
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// All nodes of the tree, parents before their children.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        self.nodes.keys()
    }

    /// Determine the status of `node` and return its number of children.
    ///
    /// Expanding a node which is already determined does not touch any state.
    pub fn expand(
        &mut self,
        node: NodeId,
        termination: &mut impl TerminationCondition,
    ) -> Result<usize, ExplorerError> {
        match self.prepare_expansion(node)? {
            Preparation::Determined(children) => Ok(children),
            Preparation::Acquire(plan) => {
                let result = Expanded::compute(plan, termination);
                self.complete_expansion(node, result)
            }
        }
    }

    /// Hand a state for `node` to the caller, e.g. to inspect the domains at that node.
    ///
    /// The state is constrained with the best solution the node was determined under and has the
    /// decisions leading to the node applied, but it is not propagated; call
    /// [`SolverState::status`] on it to reach the fixpoint, where the state of a solved node is its
    /// solution. A working state retained by the node is handed over as well.
    pub fn get_space(
        &mut self,
        node: NodeId,
        termination: &mut impl TerminationCondition,
    ) -> Result<S, ExplorerError> {
        let plan = self.prepare_inspection(node)?;
        let result = plan.execute(termination);
        self.complete_inspection(result)
    }

    pub fn status(&self, node: NodeId) -> NodeStatus {
        self.nodes[node].status
    }

    pub fn has_failed_descendant(&self, node: NodeId) -> bool {
        self.nodes[node].has_failed_descendant
    }

    pub fn has_solved_descendant(&self, node: NodeId) -> bool {
        self.nodes[node].has_solved_descendant
    }

    pub fn open_child_count(&self, node: NodeId) -> usize {
        self.nodes[node].open_child_count
    }

    pub fn is_open(&self, node: NodeId) -> bool {
        self.nodes[node].is_open()
    }

    pub fn has_copy(&self, node: NodeId) -> bool {
        self.nodes[node].owned_copy.is_some()
    }

    pub fn has_working_state(&self, node: NodeId) -> bool {
        self.nodes[node].working_state.is_some()
    }

    /// The error of the last failed expansion of `node`, if it has not been expanded since.
    pub fn expansion_error(&self, node: NodeId) -> Option<ExplorerError> {
        self.nodes[node].expansion_error
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node].parent
    }

    pub fn alternative(&self, node: NodeId) -> usize {
        self.nodes[node].alternative
    }

    pub fn depth(&self, node: NodeId) -> usize {
        self.nodes[node].depth
    }

    pub fn number_of_children(&self, node: NodeId) -> usize {
        self.nodes[node].number_of_children()
    }

    pub fn child(&self, node: NodeId, alternative: usize) -> Option<NodeId> {
        let node = &self.nodes[node];
        if alternative >= node.number_of_children() {
            return None;
        }
        node.first_child
            .map(|first| NodeId::create_from_index(first.index() + alternative))
    }

    pub fn children(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        let first = self.nodes[node].first_child.map_or(0, |first| first.index());
        let count = self.nodes[node].number_of_children();
        (first..first + count).map(NodeId::create_from_index)
    }

    /// The branching descriptor of a branch node.
    pub fn branching(&self, node: NodeId) -> Option<&S::Branching> {
        match &self.nodes[node].decision {
            Some(Decision::Branching(branching)) => Some(branching.as_ref()),
            Some(Decision::Special(_)) | None => None,
        }
    }

    /// The number of decisions which have to be replayed to rebuild the state of `node` from the
    /// closest copy on its path to the root, or `None` if there is no such copy.
    pub fn recomputation_distance(&self, node: NodeId) -> Option<usize> {
        let mut distance = 0;
        let mut current = node;
        loop {
            let search_node = &self.nodes[current];
            if search_node.owned_copy.is_some() {
                return Some(distance);
            }
            current = search_node.parent?;
            distance += 1;
        }
    }

    pub fn best_solution(&self) -> Option<&BestSolution<S>> {
        self.best.as_ref()
    }

    pub fn current_best(&self) -> Option<&S> {
        self.best.as_ref().and_then(BestSolution::current_best)
    }

    /// Whether `node` was determined before the current best solution was found, and so has not
    /// been pruned with it.
    pub fn is_stale(&self, node: NodeId) -> bool {
        let search_node = &self.nodes[node];
        if !search_node.status.is_determined() {
            return false;
        }
        let Some(best) = &self.best else {
            return false;
        };

        match best.current_id() {
            Some(current) => {
                Some(current) > search_node.own_best && best.node_of(current) != Some(node)
            }
            None => false,
        }
    }

    pub fn statistics(&self) -> ExplorerStatistics {
        self.statistics
    }

    pub fn log_statistics(&self) {
        if should_log_statistics() {
            self.statistics.log(StatisticLogger::new(["explorer"]));
        }
    }

    pub fn summary(&self) -> TreeSummary {
        let mut summary = TreeSummary {
            best_node: self.best.as_ref().and_then(BestSolution::current_node),
            exhausted: !self.nodes[NodeId::ROOT].is_open(),
            ..Default::default()
        };
        for node in self.nodes.iter() {
            summary.nodes[node.status.kind()] += 1;
            summary.copies += usize::from(node.owned_copy.is_some());
            summary.working_states += usize::from(node.working_state.is_some());
            summary.max_depth = summary.max_depth.max(node.depth);
        }
        summary
    }

    fn current_best_id(&self) -> Option<BestId> {
        self.best.as_ref().and_then(BestSolution::current_id)
    }
}
