use thiserror::Error;

use super::NodeId;

/// Errors which can occur when expanding or inspecting a node of the search tree.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExplorerError {
    /// Cloning a solver state failed. The node stays undetermined and is marked with the error.
    #[error("failed to allocate memory for a solver state")]
    AllocationFailure,
    /// The node has no state of its own and no ancestor holds a copy to recompute from.
    #[error("node {0} has no state and no ancestor copy to recompute from")]
    InvalidOwnershipState(NodeId),
    /// The termination condition triggered while the status of a node was being computed.
    #[error("the status computation was interrupted")]
    Interrupted,
    /// A status was forced onto a node which is not undetermined.
    #[error("node {0} is already determined")]
    InvalidStatusTransition(NodeId),
}

/// Returned by [`crate::SolverState::try_clone`] when the copy could not be allocated.
#[derive(Error, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[error("failed to allocate memory for a solver state")]
pub struct AllocationFailure;

/// Returned by [`crate::SolverState::status`] when the termination condition triggered.
#[derive(Error, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[error("the status computation was interrupted")]
pub struct Interrupted;

impl From<AllocationFailure> for ExplorerError {
    fn from(_: AllocationFailure) -> Self {
        ExplorerError::AllocationFailure
    }
}

impl From<Interrupted> for ExplorerError {
    fn from(_: Interrupted) -> Self {
        ExplorerError::Interrupted
    }
}
