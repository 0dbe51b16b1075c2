use std::sync::Arc;

use log::debug;
use log::warn;

use super::acquisition::Abandoned;
use super::acquisition::AcquisitionPlan;
use super::acquisition::Acquired;
use super::node::Bounded;
use super::node::SearchNode;
use super::node::Snapshot;
use super::ForcedStatus;
use super::NodeStatus;
use super::SearchTree;
use crate::basic_types::ExplorerError;
use crate::basic_types::NodeId;
use crate::explorer_assert_advanced;
use crate::space::Decision;
use crate::space::SolverState;
use crate::space::SpaceStatus;
use crate::termination::TerminationCondition;

/// The first phase of an expansion.
#[derive(Debug)]
pub(crate) enum Preparation<S: SolverState> {
    /// The node was already determined and has this many children.
    Determined(usize),
    Acquire(AcquisitionPlan<S>),
}

/// A state at its fixpoint, ready to be linked into the tree.
#[derive(Debug)]
pub(crate) struct Expanded<S: SolverState> {
    acquired: Acquired<S>,
    status: SpaceStatus<S::Branching>,
}

impl<S: SolverState> Expanded<S> {
    /// The second phase of an expansion; it does not need access to the tree.
    ///
    /// On failure, the states the plan took from the tree are returned for
    /// [`SearchTree::complete_expansion`] to put back.
    pub(crate) fn compute(
        plan: AcquisitionPlan<S>,
        termination: &mut impl TerminationCondition,
    ) -> Result<Self, Abandoned<S>> {
        if termination.should_stop() {
            return Err(plan.abandon(ExplorerError::Interrupted));
        }

        let mut acquired = plan.execute(termination)?;
        match acquired.state.state.status(termination) {
            Ok(status) => Ok(Expanded { acquired, status }),
            Err(interrupted) => Err(Abandoned {
                error: interrupted.into(),
                unused: None,
                built: Some(acquired),
            }),
        }
    }
}

impl<S: SolverState> SearchTree<S> {
    pub(crate) fn prepare_expansion(
        &mut self,
        node: NodeId,
    ) -> Result<Preparation<S>, ExplorerError> {
        let search_node = &self.nodes[node];
        if search_node.status.is_determined() {
            return Ok(Preparation::Determined(search_node.number_of_children()));
        }

        let live_best = self.current_best_id();
        self.plan_acquisition(node, live_best)
            .map(Preparation::Acquire)
    }

    /// The last phase of an expansion: link the computed status into the tree.
    ///
    /// If `node` was determined in the meantime, the result is discarded and the known number of
    /// children is returned.
    pub(crate) fn complete_expansion(
        &mut self,
        node: NodeId,
        result: Result<Expanded<S>, Abandoned<S>>,
    ) -> Result<usize, ExplorerError> {
        let Expanded {
            mut acquired,
            status,
        } = match result {
            Ok(expanded) => expanded,
            Err(abandoned) => {
                let error = self.restore(abandoned);
                if error == ExplorerError::AllocationFailure {
                    self.nodes[node].expansion_error = Some(error);
                }
                return Err(error);
            }
        };

        self.record_acquisition(&mut acquired);

        if self.nodes[node].status.is_determined() {
            warn!("discarding the expansion of {node}, it was determined concurrently");
            return Ok(self.nodes[node].number_of_children());
        }

        self.statistics.num_expansions += 1;
        let state = acquired.state;
        let search_node = &mut self.nodes[node];
        search_node.expansion_error = None;
        search_node.own_best = state.bound;

        match status {
            SpaceStatus::Failed | SpaceStatus::Branch { alternatives: 0, .. } => {
                self.mark_failed(node);
                Ok(0)
            }
            SpaceStatus::Solved => {
                self.mark_solved(node, state.state);
                Ok(0)
            }
            SpaceStatus::Branch {
                descriptor,
                alternatives,
            } => {
                self.create_children(
                    node,
                    NodeStatus::Branch(alternatives),
                    Decision::Branching(Arc::new(descriptor)),
                );
                self.retain_state(node, state);
                Ok(alternatives)
            }
        }
    }

    /// Impose a status on an undetermined node without computing its state.
    pub fn set_status(&mut self, node: NodeId, status: ForcedStatus) -> Result<(), ExplorerError> {
        let search_node = &mut self.nodes[node];
        if search_node.status.is_determined() {
            return Err(ExplorerError::InvalidStatusTransition(node));
        }
        search_node.own_best = search_node.best_as_of_creation;

        match status {
            ForcedStatus::Failed => self.mark_failed(node),
            ForcedStatus::Special(special) => {
                debug!("posting {special} at {node}");
                self.create_children(
                    node,
                    NodeStatus::Special,
                    Decision::Special(Arc::new(special)),
                );
            }
        }
        Ok(())
    }

    pub(crate) fn prepare_inspection(
        &mut self,
        node: NodeId,
    ) -> Result<AcquisitionPlan<S>, ExplorerError> {
        let bound = self.nodes[node].defining_bound();
        let mut plan = self.plan_acquisition(node, bound)?;

        let is_branch = matches!(self.nodes[node].status, NodeStatus::Branch(_));
        let too_far = match self.recomputation_distance(node) {
            Some(distance) => distance > self.options.effective_copy_distance() as usize,
            None => true,
        };
        plan.store_copy(is_branch && !self.has_copy(node) && too_far);

        Ok(plan)
    }

    pub(crate) fn complete_inspection(
        &mut self,
        result: Result<Acquired<S>, Abandoned<S>>,
    ) -> Result<S, ExplorerError> {
        match result {
            Ok(mut acquired) => {
                self.record_acquisition(&mut acquired);
                Ok(acquired.state.state)
            }
            Err(abandoned) => Err(self.restore(abandoned)),
        }
    }

    fn create_children(
        &mut self,
        node: NodeId,
        status: NodeStatus,
        decision: Decision<S::Branching>,
    ) {
        let count = match status {
            NodeStatus::Branch(alternatives) => alternatives,
            NodeStatus::Special => 1,
            NodeStatus::Undetermined | NodeStatus::Solved | NodeStatus::Failed => 0,
        };
        let depth = self.nodes[node].depth + 1;
        let best = self.current_best_id();

        let first_child = self.nodes.next_key();
        for alternative in 0..count {
            let _ = self
                .nodes
                .push(SearchNode::new(Some(node), alternative, depth, best));
        }

        let search_node = &mut self.nodes[node];
        search_node.status = status;
        search_node.decision = Some(decision);
        search_node.first_child = Some(first_child);
        search_node.open_child_count = count;
        explorer_assert_advanced!(search_node.open_child_count == search_node.number_of_children());
    }

    /// Keep the state of a branch node either as a working state, which its first child to be
    /// expanded receives, or as a copy when it is too far away from the closest copy above it.
    fn retain_state(&mut self, node: NodeId, state: Bounded<S>) {
        let is_root = self.nodes[node].parent.is_none();
        if self.has_copy(node) {
            if is_root {
                self.nodes[node].working_state = Some(state);
            }
            return;
        }

        let distance = self.recomputation_distance(node).unwrap_or(usize::MAX);
        if distance > self.options.effective_copy_distance() as usize {
            debug!("{node} is {distance} decisions away from a copy and keeps its state as one");
            self.nodes[node].owned_copy = Some(Snapshot {
                state: Arc::new(state.state),
                bound: state.bound,
            });
            self.statistics.num_copies_created += 1;
        } else {
            self.nodes[node].working_state = Some(state);
        }
    }

    fn mark_failed(&mut self, node: NodeId) {
        let search_node = &mut self.nodes[node];
        search_node.status = NodeStatus::Failed;
        search_node.has_failed_descendant = true;
        let parent = search_node.parent;
        self.statistics.num_failures += 1;

        if let Some(parent) = parent {
            self.close_child(parent, true, false);
        }
    }

    fn mark_solved(&mut self, node: NodeId, state: S) {
        let search_node = &mut self.nodes[node];
        search_node.status = NodeStatus::Solved;
        search_node.has_solved_descendant = true;
        let parent = search_node.parent;
        self.statistics.num_solutions += 1;

        if let Some(best) = &mut self.best {
            if best.try_improve(state, node) {
                debug!("{node} improves the best solution");
            }
        }

        self.solve_up(node);
        if let Some(parent) = parent {
            self.close_child(parent, false, true);
        }
    }
}
