use std::sync::Arc;

use log::debug;
use log::trace;

use super::best_solution::BestRef;
use super::node::Bounded;
use super::node::Snapshot;
use super::BestId;
use super::SearchTree;
use crate::basic_types::ExplorerError;
use crate::basic_types::NodeId;
use crate::space::Decision;
use crate::space::SolverState;
use crate::space::SpaceStatus;
use crate::termination::TerminationCondition;

/// How a node obtained its state, in order of preference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AcquisitionMethod {
    /// The node held a working state itself.
    WorkingState,
    /// The copy of the node was cloned.
    Copy,
    /// The working state of the parent was moved into the node.
    Donation,
    /// The node is the last untried child and took the copy of its parent.
    LastAlternative,
    /// The state was rebuilt from the closest copy on the path to the root.
    Recomputation,
}

/// One decision which is replayed to move a state from a node to its child.
pub(crate) struct ReplayStep<S: SolverState> {
    /// The node whose state results from applying the step.
    pub(crate) node: NodeId,
    pub(crate) decision: Decision<S::Branching>,
    pub(crate) alternative: usize,
    /// The best solution the state of the parent was constrained with.
    pub(crate) bound: Option<BestRef<S>>,
}

enum Source<S> {
    Owned(Bounded<S>),
    Shared(Snapshot<S>),
}

/// Everything needed to build the state of a node without access to the tree.
pub(crate) struct AcquisitionPlan<S: SolverState> {
    pub(crate) node: NodeId,
    pub(crate) method: AcquisitionMethod,
    /// The node the source was taken from.
    origin: NodeId,
    source: Source<S>,
    steps: Vec<ReplayStep<S>>,
    /// After this many steps, a copy of the intermediate state is stored.
    adaptive_midpoint: Option<usize>,
    /// The best solution the final state is constrained with.
    target_bound: Option<BestRef<S>>,
    /// Whether a clone of the final state should be stored as the copy of the node.
    store_copy: bool,
}

impl<S: SolverState> std::fmt::Debug for AcquisitionPlan<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AcquisitionPlan")
            .field("node", &self.node)
            .field("method", &self.method)
            .field("steps", &self.steps.len())
            .field("adaptive_midpoint", &self.adaptive_midpoint)
            .finish_non_exhaustive()
    }
}

/// A state which a plan moved out of the tree and never touched.
pub(crate) struct UnusedSource<S> {
    method: AcquisitionMethod,
    origin: NodeId,
    source: Source<S>,
}

impl<S> std::fmt::Debug for UnusedSource<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnusedSource")
            .field("method", &self.method)
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

/// What remains of a plan which failed to produce a state at its fixpoint.
#[derive(Debug)]
pub(crate) struct Abandoned<S: SolverState> {
    pub(crate) error: ExplorerError,
    /// The untouched source, if the plan had moved it out of the tree.
    pub(crate) unused: Option<UnusedSource<S>>,
    /// The state of the node, with every decision applied but not propagated to its fixpoint.
    pub(crate) built: Option<Acquired<S>>,
}

impl<S: SolverState> Abandoned<S> {
    fn lost(error: impl Into<ExplorerError>) -> Self {
        Abandoned {
            error: error.into(),
            unused: None,
            built: None,
        }
    }
}

/// A state built by executing an [`AcquisitionPlan`].
#[derive(Debug)]
pub(crate) struct Acquired<S> {
    pub(crate) node: NodeId,
    pub(crate) method: AcquisitionMethod,
    pub(crate) state: Bounded<S>,
    pub(crate) adaptive_copy: Option<(NodeId, Snapshot<S>)>,
    pub(crate) node_copy: Option<Snapshot<S>>,
    pub(crate) replayed: usize,
    pub(crate) clones: u64,
}

impl<S: SolverState> SearchTree<S> {
    /// Decide how the state of `node` is obtained. States which are moved (a working state, a
    /// donated state or a copy taken by the last alternative) leave the tree here.
    pub(crate) fn plan_acquisition(
        &mut self,
        node: NodeId,
        target_bound: Option<BestId>,
    ) -> Result<AcquisitionPlan<S>, ExplorerError> {
        let target_bound = self.bound_ref(target_bound);

        if let Some(working_state) = self.nodes[node].working_state.take() {
            return Ok(AcquisitionPlan::from_source(
                node,
                AcquisitionMethod::WorkingState,
                node,
                Source::Owned(working_state),
                vec![],
                target_bound,
            ));
        }

        if let Some(copy) = &self.nodes[node].owned_copy {
            let source = Source::Shared(copy.clone());
            return Ok(AcquisitionPlan::from_source(
                node,
                AcquisitionMethod::Copy,
                node,
                source,
                vec![],
                target_bound,
            ));
        }

        let Some(parent) = self.nodes[node].parent else {
            return Err(ExplorerError::InvalidOwnershipState(node));
        };

        if self.nodes[parent].working_state.is_some() {
            let step = self.replay_step(node)?;
            if let Some(donated) = self.nodes[parent].working_state.take() {
                debug!("{parent} donates its working state to {node}");
                return Ok(AcquisitionPlan::from_source(
                    node,
                    AcquisitionMethod::Donation,
                    parent,
                    Source::Owned(donated),
                    vec![step],
                    target_bound,
                ));
            }
        }

        if self.can_take_parent_copy(node, parent) {
            let step = self.replay_step(node)?;
            if let Some(copy) = self.nodes[parent].owned_copy.take() {
                debug!("{node} is the last alternative and takes the copy of {parent}");
                return Ok(AcquisitionPlan::from_source(
                    node,
                    AcquisitionMethod::LastAlternative,
                    parent,
                    Source::Shared(copy),
                    vec![step],
                    target_bound,
                ));
            }
        }

        self.plan_recomputation(node, target_bound)
    }

    fn plan_recomputation(
        &self,
        node: NodeId,
        target_bound: Option<BestRef<S>>,
    ) -> Result<AcquisitionPlan<S>, ExplorerError> {
        let mut steps = vec![];
        let mut current = node;
        let anchor = loop {
            if let Some(copy) = &self.nodes[current].owned_copy {
                break copy.clone();
            }
            let Some(parent) = self.nodes[current].parent else {
                return Err(ExplorerError::InvalidOwnershipState(node));
            };
            steps.push(self.replay_step(current)?);
            current = parent;
        };
        steps.reverse();

        let adaptive_midpoint = self
            .options
            .adaptive_distance
            .filter(|&distance| steps.len() > distance as usize)
            .map(|_| steps.len() / 2)
            .filter(|&midpoint| midpoint > 0);

        debug!(
            "recomputing {node} from the copy at {current} ({} decisions)",
            steps.len()
        );

        Ok(AcquisitionPlan {
            node,
            method: AcquisitionMethod::Recomputation,
            origin: current,
            source: Source::Shared(anchor),
            steps,
            adaptive_midpoint,
            target_bound,
            store_copy: false,
        })
    }

    /// The decision which leads from the parent of `node` to `node`.
    fn replay_step(&self, node: NodeId) -> Result<ReplayStep<S>, ExplorerError> {
        let search_node = &self.nodes[node];
        let parent = search_node
            .parent
            .ok_or(ExplorerError::InvalidOwnershipState(node))?;
        let decision = self.nodes[parent]
            .decision
            .clone()
            .ok_or(ExplorerError::InvalidOwnershipState(node))?;

        Ok(ReplayStep {
            node,
            decision,
            alternative: search_node.alternative,
            bound: self.bound_ref(self.nodes[parent].own_best),
        })
    }

    /// The parent no longer needs its copy once every sibling subtree is closed. The copy of the
    /// root is never taken; it anchors every recomputation.
    fn can_take_parent_copy(&self, node: NodeId, parent: NodeId) -> bool {
        self.options.last_alternative_optimisation
            && self.nodes[parent].parent.is_some()
            && self.nodes[parent].owned_copy.is_some()
            && self
                .children(parent)
                .filter(|&sibling| sibling != node)
                .all(|sibling| !self.nodes[sibling].is_open())
    }

    fn bound_ref(&self, bound: Option<BestId>) -> Option<BestRef<S>> {
        let best = self.best.as_ref()?;
        bound.and_then(|id| best.entry(id))
    }

    /// Store a state built by an [`AcquisitionPlan`] back into the tree where the plan asked for
    /// it, and record what it cost.
    pub(crate) fn record_acquisition(&mut self, acquired: &mut Acquired<S>) {
        match acquired.method {
            AcquisitionMethod::WorkingState | AcquisitionMethod::Copy => {}
            AcquisitionMethod::Donation => self.statistics.num_donations += 1,
            AcquisitionMethod::LastAlternative => {
                self.statistics.num_last_alternative_optimisations += 1
            }
            AcquisitionMethod::Recomputation => {
                self.statistics.num_recomputations += 1;
                self.statistics.max_recomputation_distance = self
                    .statistics
                    .max_recomputation_distance
                    .max(acquired.replayed as u64);
            }
        }
        self.statistics.num_clones += acquired.clones;
        self.statistics.num_commits += acquired.replayed as u64;

        if let Some((intermediate, copy)) = acquired.adaptive_copy.take() {
            if self.nodes[intermediate].owned_copy.is_none() {
                debug!("storing an intermediate copy at {intermediate}");
                self.nodes[intermediate].owned_copy = Some(copy);
                self.statistics.num_adaptive_copies += 1;
            }
        }

        if let Some(copy) = acquired.node_copy.take() {
            let node = acquired.node;
            if self.nodes[node].owned_copy.is_none() {
                debug!("storing a copy at {node}");
                self.nodes[node].owned_copy = Some(copy);
                self.statistics.num_copies_created += 1;
            }
        }
    }

    /// Put the states an abandoned plan still holds back into the tree, and return its error.
    ///
    /// An untouched source goes back where it was taken from. A state which was built for the node
    /// but interrupted before its fixpoint stays with the node as its working state, so the next
    /// acquisition resumes from it.
    pub(crate) fn restore(&mut self, abandoned: Abandoned<S>) -> ExplorerError {
        if let Some(UnusedSource {
            method,
            origin,
            source,
        }) = abandoned.unused
        {
            let origin_node = &mut self.nodes[origin];
            match source {
                Source::Owned(state) if origin_node.working_state.is_none() => {
                    debug!("returning the working state to {origin}");
                    origin_node.working_state = Some(state);
                }
                Source::Shared(copy) if origin_node.owned_copy.is_none() => {
                    debug!("returning the copy to {origin} after a failed {method:?} acquisition");
                    origin_node.owned_copy = Some(copy);
                }
                Source::Owned(_) | Source::Shared(_) => {}
            }
        }

        if let Some(mut built) = abandoned.built {
            self.record_acquisition(&mut built);
            let node = &mut self.nodes[built.node];
            if !node.status.is_determined() && node.working_state.is_none() {
                debug!("{} keeps its state until its expansion is resumed", built.node);
                node.working_state = Some(built.state);
            }
        }

        abandoned.error
    }
}

impl<S: SolverState> AcquisitionPlan<S> {
    fn from_source(
        node: NodeId,
        method: AcquisitionMethod,
        origin: NodeId,
        source: Source<S>,
        steps: Vec<ReplayStep<S>>,
        target_bound: Option<BestRef<S>>,
    ) -> Self {
        AcquisitionPlan {
            node,
            method,
            origin,
            source,
            steps,
            adaptive_midpoint: None,
            target_bound,
            store_copy: false,
        }
    }

    pub(crate) fn store_copy(&mut self, store_copy: bool) {
        self.store_copy = store_copy;
    }

    /// Give up on the plan before anything was built.
    pub(crate) fn abandon(self, error: ExplorerError) -> Abandoned<S> {
        Abandoned {
            error,
            unused: UnusedSource::returned_by(self.method, self.origin, self.source),
            built: None,
        }
    }

    /// Build the state. Clones, replays and intermediate propagation all happen here, without
    /// access to the tree.
    pub(crate) fn execute(
        self,
        termination: &mut impl TerminationCondition,
    ) -> Result<Acquired<S>, Abandoned<S>> {
        let AcquisitionPlan {
            node,
            method,
            origin,
            source,
            steps,
            adaptive_midpoint,
            target_bound,
            store_copy,
        } = self;

        let mut clones = 0;
        let Bounded {
            mut state,
            mut bound,
        } = match source {
            Source::Owned(owned) => owned,
            Source::Shared(Snapshot { state, bound }) => {
                let state = match method {
                    AcquisitionMethod::LastAlternative => match Arc::try_unwrap(state) {
                        Ok(state) => state,
                        Err(shared) => match shared.try_clone() {
                            Ok(state) => {
                                clones += 1;
                                state
                            }
                            Err(error) => {
                                let copy = Snapshot {
                                    state: shared,
                                    bound,
                                };
                                return Err(Abandoned {
                                    error: error.into(),
                                    unused: UnusedSource::returned_by(
                                        method,
                                        origin,
                                        Source::Shared(copy),
                                    ),
                                    built: None,
                                });
                            }
                        },
                    },
                    _ => {
                        clones += 1;
                        state.try_clone().map_err(Abandoned::lost)?
                    }
                };
                Bounded { state, bound }
            }
        };

        let mut adaptive_copy = None;
        for (index, step) in steps.iter().enumerate() {
            constrain_to(&mut state, &mut bound, step.bound.as_ref());

            if adaptive_midpoint == Some(index) {
                let intermediate = steps[index - 1].node;
                let status = state.status(termination).map_err(Abandoned::lost)?;
                if matches!(status, SpaceStatus::Failed) {
                    debug!("not storing an intermediate copy at failed node {intermediate}");
                } else {
                    clones += 1;
                    let copy = state.try_clone().map_err(Abandoned::lost)?;
                    adaptive_copy = Some((
                        intermediate,
                        Snapshot {
                            state: Arc::new(copy),
                            bound,
                        },
                    ));
                }
            }

            trace!("replaying alternative {} towards {}", step.alternative, step.node);
            match &step.decision {
                Decision::Branching(branching) => state.commit(branching, step.alternative),
                Decision::Special(special) => state.post(special),
            }
        }

        constrain_to(&mut state, &mut bound, target_bound.as_ref());

        let mut acquired = Acquired {
            node,
            method,
            state: Bounded { state, bound },
            adaptive_copy,
            node_copy: None,
            replayed: steps.len(),
            clones,
        };

        if store_copy {
            match acquired.state.state.try_clone() {
                Ok(copy) => {
                    acquired.clones += 1;
                    acquired.node_copy = Some(Snapshot {
                        state: Arc::new(copy),
                        bound: acquired.state.bound,
                    });
                }
                Err(error) => {
                    return Err(Abandoned {
                        error: error.into(),
                        unused: None,
                        built: Some(acquired),
                    })
                }
            }
        }

        Ok(acquired)
    }
}

impl<S> UnusedSource<S> {
    /// Only moved states are handed back; shared copies never left the tree.
    fn returned_by(method: AcquisitionMethod, origin: NodeId, source: Source<S>) -> Option<Self> {
        match method {
            AcquisitionMethod::WorkingState
            | AcquisitionMethod::Donation
            | AcquisitionMethod::LastAlternative => Some(UnusedSource {
                method,
                origin,
                source,
            }),
            AcquisitionMethod::Copy | AcquisitionMethod::Recomputation => None,
        }
    }
}

/// Constrain `state` with `target` unless it has already been constrained with it (or with a
/// better solution).
fn constrain_to<S: SolverState>(
    state: &mut S,
    bound: &mut Option<BestId>,
    target: Option<&BestRef<S>>,
) {
    if let Some(best) = target {
        if Some(best.id) > *bound {
            state.constrain(&best.state);
            *bound = Some(best.id);
        }
    }
}
