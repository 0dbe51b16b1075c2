//! A scripted [`SolverState`] for testing the search tree. The state is the sequence of decisions
//! applied to it, and a shape function tells what the state looks like at its fixpoint.

use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use crate::basic_types::AllocationFailure;
use crate::basic_types::Interrupted;
use crate::basic_types::NodeId;
use crate::space::SolverState;
use crate::space::SpaceStatus;
use crate::space::SpecialDescriptor;
use crate::termination::Indefinite;
use crate::termination::TerminationCondition;
use crate::tree::ExplorerOptions;
use crate::tree::SearchTree;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Step {
    Alternative(usize),
    Special(i32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Shape {
    Failed,
    /// A solution with the given objective value; smaller is better.
    Solved(i64),
    Branch(usize),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TestBranching {
    depth: usize,
    alternatives: usize,
}

#[derive(Debug)]
pub(crate) struct Counters {
    pub(crate) clones: AtomicUsize,
    pub(crate) clone_limit: AtomicUsize,
    pub(crate) status_calls: AtomicUsize,
}

pub(crate) struct TestSpace {
    pub(crate) path: Vec<Step>,
    /// Solutions must have an objective strictly below the bound.
    pub(crate) bound: Option<i64>,
    shape: Arc<dyn Fn(&[Step]) -> Shape + Send + Sync>,
    counters: Arc<Counters>,
}

impl std::fmt::Debug for TestSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestSpace")
            .field("path", &self.path)
            .field("bound", &self.bound)
            .finish_non_exhaustive()
    }
}

impl TestSpace {
    pub(crate) fn new(shape: impl Fn(&[Step]) -> Shape + Send + Sync + 'static) -> Self {
        TestSpace {
            path: vec![],
            bound: None,
            shape: Arc::new(shape),
            counters: Arc::new(Counters {
                clones: AtomicUsize::new(0),
                clone_limit: AtomicUsize::new(usize::MAX),
                status_calls: AtomicUsize::new(0),
            }),
        }
    }

    pub(crate) fn counters(&self) -> Arc<Counters> {
        Arc::clone(&self.counters)
    }

    pub(crate) fn objective(&self) -> Option<i64> {
        match (self.shape)(&self.path) {
            Shape::Solved(objective) => Some(objective),
            Shape::Failed | Shape::Branch(_) => None,
        }
    }
}

impl Counters {
    pub(crate) fn clones(&self) -> usize {
        self.clones.load(Ordering::SeqCst)
    }

    pub(crate) fn limit_clones(&self, limit: usize) {
        self.clone_limit.store(limit, Ordering::SeqCst);
    }

    pub(crate) fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }
}

impl SolverState for TestSpace {
    type Branching = TestBranching;

    fn try_clone(&self) -> Result<Self, AllocationFailure> {
        if self.counters.clones() >= self.counters.clone_limit.load(Ordering::SeqCst) {
            return Err(AllocationFailure);
        }
        let _ = self.counters.clones.fetch_add(1, Ordering::SeqCst);

        Ok(TestSpace {
            path: self.path.clone(),
            bound: self.bound,
            shape: Arc::clone(&self.shape),
            counters: Arc::clone(&self.counters),
        })
    }

    fn status(
        &mut self,
        termination: &mut impl TerminationCondition,
    ) -> Result<SpaceStatus<TestBranching>, Interrupted> {
        if termination.should_stop() {
            return Err(Interrupted);
        }
        let _ = self.counters.status_calls.fetch_add(1, Ordering::SeqCst);

        Ok(match (self.shape)(&self.path) {
            Shape::Failed => SpaceStatus::Failed,
            Shape::Solved(objective) => match self.bound {
                Some(bound) if objective >= bound => SpaceStatus::Failed,
                _ => SpaceStatus::Solved,
            },
            Shape::Branch(alternatives) => SpaceStatus::Branch {
                descriptor: TestBranching {
                    depth: self.path.len(),
                    alternatives,
                },
                alternatives,
            },
        })
    }

    fn commit(&mut self, branching: &TestBranching, alternative: usize) {
        assert_eq!(branching.depth, self.path.len(), "replayed out of order");
        assert!(alternative < branching.alternatives);
        self.path.push(Step::Alternative(alternative));
    }

    fn post(&mut self, special: &SpecialDescriptor) {
        self.path.push(Step::Special(special.value));
    }

    fn constrain(&mut self, best: &Self) {
        if let Some(objective) = best.objective() {
            self.bound = Some(self.bound.map_or(objective, |bound| bound.min(objective)));
        }
    }
}

/// Every node at depth `depth` is a solution whose objective is the sum of its alternatives.
pub(crate) fn complete_tree(
    branching_factor: usize,
    depth: usize,
) -> impl Fn(&[Step]) -> Shape + Send + Sync + 'static {
    move |path| {
        if path.len() < depth {
            Shape::Branch(branching_factor)
        } else {
            Shape::Solved(
                path.iter()
                    .map(|step| match step {
                        Step::Alternative(alternative) => *alternative as i64,
                        Step::Special(value) => i64::from(*value),
                    })
                    .sum(),
            )
        }
    }
}

/// Expand every node below `node`, depth-first with the lowest alternative first.
pub(crate) fn explore(tree: &mut SearchTree<TestSpace>, node: NodeId) {
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        let _ = tree
            .expand(current, &mut Indefinite)
            .expect("expansion succeeds");
        let children: Vec<_> = tree.children(current).collect();
        stack.extend(children.into_iter().rev());
    }
}

pub(crate) fn without_adaptive_copies() -> ExplorerOptions {
    ExplorerOptions {
        adaptive_distance: None,
        ..ExplorerOptions::default()
    }
}
