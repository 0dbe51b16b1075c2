/// The order in which the explorer visits open nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ExplorationStrategy {
    /// Expand the children of a node before its siblings, lowest alternative first.
    #[default]
    DepthFirst,
    /// Expand the tree level by level.
    BreadthFirst,
}

/// When the explorer stops on its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ExplorationMode {
    /// Keep going until the tree is exhausted.
    #[default]
    AllSolutions,
    /// Stop at the first node which turns out to be a solution.
    NextSolution,
}

/// What the explorer does when a state could not be cloned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum AllocationFailurePolicy {
    /// Stop exploring and report the error.
    #[default]
    Abort,
    /// Leave the node undetermined and carry on with the next one.
    SkipNode,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExplorationOptions {
    pub strategy: ExplorationStrategy,
    pub mode: ExplorationMode,
    pub allocation_failure_policy: AllocationFailurePolicy,
}
