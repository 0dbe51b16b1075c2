use std::collections::VecDeque;
use std::fmt::Display;
use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::Duration;

use log::debug;
use log::error;
use log::warn;

use super::AllocationFailurePolicy;
use super::ExplorationMode;
use super::ExplorationOptions;
use super::ExplorationStrategy;
use super::SharedTree;
use crate::basic_types::ExplorerError;
use crate::basic_types::NodeId;
use crate::space::SolverState;
use crate::termination::Combinator;
use crate::termination::StopFlag;
use crate::termination::TerminationCondition;
use crate::tree::NodeStatus;

/// Why an exploration ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplorationOutcome {
    /// Every node below the start node has been explored.
    Exhausted,
    /// Every node below the start node was visited, but skipped nodes leave it open; see
    /// [`ExplorationReport::skipped`].
    Incomplete,
    /// The exploration ran in [`ExplorationMode::NextSolution`] and found a solution at this
    /// node.
    SolutionFound(NodeId),
    /// The termination condition triggered or the exploration was cancelled.
    Interrupted,
    /// An expansion failed with an error the exploration cannot recover from.
    Aborted(ExplorerError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExplorationReport {
    /// The number of nodes determined by this exploration.
    pub expanded: u64,
    /// The number of those nodes which are solutions.
    pub solutions: u64,
    /// The number of nodes skipped after an allocation failure.
    pub skipped: u64,
    pub outcome: ExplorationOutcome,
}

impl Display for ExplorationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let outcome = match self.outcome {
            ExplorationOutcome::Exhausted => "exhausted".to_owned(),
            ExplorationOutcome::Incomplete => "incomplete".to_owned(),
            ExplorationOutcome::SolutionFound(node) => format!("solution at {node}"),
            ExplorationOutcome::Interrupted => "interrupted".to_owned(),
            ExplorationOutcome::Aborted(error) => format!("aborted: {error}"),
        };
        write!(
            f,
            "expanded={} solutions={} skipped={} outcome={outcome}",
            self.expanded, self.solutions, self.skipped
        )
    }
}

/// The open nodes which still have to be visited.
#[derive(Debug)]
struct Frontier {
    strategy: ExplorationStrategy,
    nodes: VecDeque<NodeId>,
}

impl Frontier {
    fn new(strategy: ExplorationStrategy, start: NodeId) -> Self {
        Frontier {
            strategy,
            nodes: VecDeque::from([start]),
        }
    }

    fn next(&mut self) -> Option<NodeId> {
        match self.strategy {
            ExplorationStrategy::DepthFirst => self.nodes.pop_back(),
            ExplorationStrategy::BreadthFirst => self.nodes.pop_front(),
        }
    }

    fn extend(&mut self, children: Vec<NodeId>) {
        match self.strategy {
            ExplorationStrategy::DepthFirst => self.nodes.extend(children.into_iter().rev()),
            ExplorationStrategy::BreadthFirst => self.nodes.extend(children),
        }
    }
}

/// Expand the open nodes below `start` until the tree is exhausted, the mode says to stop or the
/// termination condition triggers.
pub fn explore<S: SolverState>(
    tree: &SharedTree<S>,
    start: NodeId,
    options: ExplorationOptions,
    termination: &mut impl TerminationCondition,
) -> ExplorationReport {
    let mut report = ExplorationReport {
        expanded: 0,
        solutions: 0,
        skipped: 0,
        outcome: ExplorationOutcome::Exhausted,
    };
    let mut frontier = Frontier::new(options.strategy, start);

    while let Some(node) = frontier.next() {
        if termination.should_stop() {
            report.outcome = ExplorationOutcome::Interrupted;
            return report;
        }

        let was_determined = {
            let tree = tree.lock();
            if !tree.is_open(node) {
                continue;
            }
            tree.status(node).is_determined()
        };

        match tree.expand(node, termination) {
            Ok(_) => {}
            Err(ExplorerError::Interrupted) => {
                report.outcome = ExplorationOutcome::Interrupted;
                return report;
            }
            Err(ExplorerError::AllocationFailure)
                if options.allocation_failure_policy == AllocationFailurePolicy::SkipNode =>
            {
                warn!("skipping {node}, its state could not be allocated");
                report.skipped += 1;
                continue;
            }
            Err(error) => {
                error!("exploration aborted at {node}: {error}");
                report.outcome = ExplorationOutcome::Aborted(error);
                return report;
            }
        }

        let (status, children) = {
            let tree = tree.lock();
            (tree.status(node), tree.children(node).collect::<Vec<_>>())
        };

        if !was_determined {
            report.expanded += 1;
            termination.node_expanded();

            if status == NodeStatus::Solved {
                report.solutions += 1;
                if options.mode == ExplorationMode::NextSolution {
                    report.outcome = ExplorationOutcome::SolutionFound(node);
                    return report;
                }
            }
        }

        frontier.extend(children);
    }

    if report.skipped > 0 && tree.lock().is_open(start) {
        warn!(
            "exploration below {start} left {} skipped nodes unexplored",
            report.skipped
        );
        report.outcome = ExplorationOutcome::Incomplete;
    } else {
        debug!("exploration below {start} exhausted");
    }
    report
}

/// An exploration running on a background thread.
#[derive(Debug)]
pub struct Explorer {
    cancel: StopFlag,
    rx: mpsc::Receiver<ExplorationReport>,
    join: Option<JoinHandle<()>>,
}

impl Explorer {
    /// Start exploring below `start` on a new thread.
    pub fn spawn<S, T>(
        tree: SharedTree<S>,
        start: NodeId,
        options: ExplorationOptions,
        termination: T,
    ) -> Explorer
    where
        S: SolverState,
        T: TerminationCondition + Send + 'static,
    {
        let cancel = StopFlag::new();
        let cancel_for_thread = cancel.clone();
        let (tx, rx) = mpsc::channel::<ExplorationReport>();

        let join = std::thread::spawn(move || {
            let mut termination = Combinator::new(cancel_for_thread, termination);
            let report = explore(&tree, start, options, &mut termination);
            let _ = tx.send(report);
        });

        Explorer {
            cancel,
            rx,
            join: Some(join),
        }
    }

    /// Ask the worker to stop; a status computation in progress is interrupted.
    pub fn cancel(&self) {
        self.cancel.raise();
    }

    /// The report of the exploration, if it has ended.
    pub fn try_recv(&self) -> Option<ExplorationReport> {
        self.rx.try_recv().ok()
    }

    /// Wait at most `timeout` for the report of the exploration.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<ExplorationReport> {
        self.rx.recv_timeout(timeout).ok()
    }

    /// Whether the worker thread has stopped, either after sending its report or by panicking.
    pub fn is_finished(&self) -> bool {
        self.join.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Block until the exploration has ended. Returns `None` if the worker panicked.
    pub fn wait(mut self) -> Option<ExplorationReport> {
        let result = self.rx.recv().ok();
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
        result
    }
}
