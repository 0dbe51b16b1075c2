//! The seam between the explorer and the constraint engine. A [`SolverState`] is a snapshot of the
//! engine at one position of the search tree; the explorer decides when to copy it, when to hand it
//! from a parent to a child and when to rebuild it by replaying decisions.
mod better;
mod descriptors;

use std::fmt::Debug;

pub use better::Better;
pub use descriptors::Decision;
pub use descriptors::Relation;
pub use descriptors::SpecialDescriptor;

use crate::basic_types::AllocationFailure;
use crate::basic_types::Interrupted;
use crate::termination::TerminationCondition;

/// The outcome of propagating a [`SolverState`] to its fixpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpaceStatus<Branching> {
    Failed,
    Solved,
    /// The state can be split further; committing alternative `i` (for `i < alternatives`) to a
    /// copy of the state yields the state of child `i`.
    Branch {
        descriptor: Branching,
        alternatives: usize,
    },
}

/// The operations the explorer needs from a constraint store.
pub trait SolverState: Sized + Send + Sync + 'static {
    /// Replayable record of one branching decision.
    type Branching: Debug + Send + Sync + 'static;

    /// Create an independent copy of the state.
    fn try_clone(&self) -> Result<Self, AllocationFailure>;

    /// Propagate to the fixpoint and report what the state looks like there.
    ///
    /// Implementations should poll `termination` and give up with [`Interrupted`] when it
    /// triggers. An interrupted state must stay usable: the explorer keeps it and calls `status`
    /// on it again later.
    fn status(
        &mut self,
        termination: &mut impl TerminationCondition,
    ) -> Result<SpaceStatus<Self::Branching>, Interrupted>;

    /// Apply alternative `alternative` of `branching`.
    fn commit(&mut self, branching: &Self::Branching, alternative: usize);

    /// Post an ad-hoc constraint requested by the user.
    fn post(&mut self, special: &SpecialDescriptor);

    /// Restrict the state to solutions better than `best`.
    fn constrain(&mut self, best: &Self);
}
