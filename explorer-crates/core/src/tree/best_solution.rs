use std::sync::Arc;

use crate::basic_types::NodeId;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;
use crate::space::Better;

/// Identifies an entry of the [`BestSolution`] history. Later entries are strictly better than
/// earlier ones, so ids are ordered by quality.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BestId(u32);

impl StorageKey for BestId {
    fn index(&self) -> usize {
        self.0 as usize
    }

    fn create_from_index(index: usize) -> Self {
        BestId(index as u32)
    }
}

#[derive(Debug)]
pub(crate) struct BestEntry<S> {
    pub(crate) node: NodeId,
    pub(crate) state: Arc<S>,
}

/// A reference to a recorded best solution, detached from the registry.
#[derive(Debug)]
pub(crate) struct BestRef<S> {
    pub(crate) id: BestId,
    pub(crate) state: Arc<S>,
}

impl<S> Clone for BestRef<S> {
    fn clone(&self) -> Self {
        BestRef {
            id: self.id,
            state: Arc::clone(&self.state),
        }
    }
}

/// The best known solution of a branch-and-bound search, together with every solution which was
/// the best at some point. A node remembers the [`BestId`] it was constrained with, so the
/// history is kept for as long as the search lives.
pub struct BestSolution<S> {
    better: Box<dyn Better<S>>,
    history: KeyedVec<BestId, BestEntry<S>>,
}

impl<S> std::fmt::Debug for BestSolution<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BestSolution")
            .field("improvements", &self.history.len())
            .field("current_node", &self.current_node())
            .finish_non_exhaustive()
    }
}

impl<S> BestSolution<S> {
    pub fn new(better: impl Better<S> + 'static) -> Self {
        BestSolution {
            better: Box::new(better),
            history: KeyedVec::default(),
        }
    }

    pub fn current_best(&self) -> Option<&S> {
        self.current_entry().map(|entry| entry.state.as_ref())
    }

    pub fn current_id(&self) -> Option<BestId> {
        if self.history.is_empty() {
            None
        } else {
            Some(BestId::create_from_index(self.history.len() - 1))
        }
    }

    /// The node which produced the current best solution.
    pub fn current_node(&self) -> Option<NodeId> {
        self.current_entry().map(|entry| entry.node)
    }

    /// The number of times the best solution has improved.
    pub fn improvements(&self) -> usize {
        self.history.len()
    }

    /// Offer the solution found at `node`. The registry keeps it if there is no best solution yet
    /// or if it is better than the current one; otherwise it is dropped.
    pub fn try_improve(&mut self, candidate: S, node: NodeId) -> bool {
        let improves = match self.current_best() {
            Some(incumbent) => self.better.is_better(&candidate, incumbent),
            None => true,
        };

        if improves {
            let _ = self.history.push(BestEntry {
                node,
                state: Arc::new(candidate),
            });
        }

        improves
    }

    pub(crate) fn entry(&self, id: BestId) -> Option<BestRef<S>> {
        self.history.get(id).map(|entry| BestRef {
            id,
            state: Arc::clone(&entry.state),
        })
    }

    pub(crate) fn node_of(&self, id: BestId) -> Option<NodeId> {
        self.history.get(id).map(|entry| entry.node)
    }

    fn current_entry(&self) -> Option<&BestEntry<S>> {
        self.current_id().and_then(|id| self.history.get(id))
    }
}
