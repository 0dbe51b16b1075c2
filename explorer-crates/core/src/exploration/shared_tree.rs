use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use crate::basic_types::ExplorerError;
use crate::basic_types::NodeId;
use crate::space::SolverState;
use crate::termination::TerminationCondition;
use crate::tree::Expanded;
use crate::tree::Preparation;
use crate::tree::SearchTree;
use crate::tree::TreeSummary;

/// A [`SearchTree`] shared between an exploring worker and a reading foreground thread.
///
/// The lock is only held while states are moved in or out of the tree; cloning, replaying and
/// propagating happen while it is released.
pub struct SharedTree<S: SolverState> {
    tree: Arc<Mutex<SearchTree<S>>>,
}

impl<S: SolverState> Clone for SharedTree<S> {
    fn clone(&self) -> Self {
        SharedTree {
            tree: Arc::clone(&self.tree),
        }
    }
}

impl<S: SolverState> std::fmt::Debug for SharedTree<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedTree").finish_non_exhaustive()
    }
}

impl<S: SolverState> SharedTree<S> {
    pub fn new(tree: SearchTree<S>) -> Self {
        SharedTree {
            tree: Arc::new(Mutex::new(tree)),
        }
    }

    /// Lock the tree for reading or for operations which do not touch solver states.
    ///
    /// The lock is recovered if another thread panicked while holding it.
    pub fn lock(&self) -> MutexGuard<'_, SearchTree<S>> {
        self.tree.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// See [`SearchTree::expand`].
    pub fn expand(
        &self,
        node: NodeId,
        termination: &mut impl TerminationCondition,
    ) -> Result<usize, ExplorerError> {
        let preparation = self.lock().prepare_expansion(node)?;
        match preparation {
            Preparation::Determined(children) => Ok(children),
            Preparation::Acquire(plan) => {
                let result = Expanded::compute(plan, termination);
                self.lock().complete_expansion(node, result)
            }
        }
    }

    /// See [`SearchTree::get_space`].
    pub fn get_space(
        &self,
        node: NodeId,
        termination: &mut impl TerminationCondition,
    ) -> Result<S, ExplorerError> {
        let plan = self.lock().prepare_inspection(node)?;
        let result = plan.execute(termination);
        self.lock().complete_inspection(result)
    }

    pub fn summary(&self) -> TreeSummary {
        self.lock().summary()
    }

    /// Take the tree back once no other handle to it exists.
    pub fn try_unwrap(self) -> Result<SearchTree<S>, Self> {
        Arc::try_unwrap(self.tree)
            .map(|mutex| mutex.into_inner().unwrap_or_else(PoisonError::into_inner))
            .map_err(|tree| SharedTree { tree })
    }
}
