use crate::create_statistics_struct;

create_statistics_struct!(
    /// Counters of the work done by a [`crate::SearchTree`].
    ExplorerStatistics {
        /// The number of nodes which were determined by an expansion
        num_expansions: u64,
        /// The number of solver states which were cloned
        num_clones: u64,
        /// The number of decisions which were committed to a state
        num_commits: u64,
        /// The number of states which were rebuilt from an ancestor copy
        num_recomputations: u64,
        /// The number of times a child received the working state of its parent
        num_donations: u64,
        /// The number of times a last alternative took the copy of its parent
        num_last_alternative_optimisations: u64,
        /// The number of copies stored because the acquisition distance became too large
        num_copies_created: u64,
        /// The number of copies stored half-way down a long recomputation
        num_adaptive_copies: u64,
        /// The number of solved nodes
        num_solutions: u64,
        /// The number of failed nodes
        num_failures: u64,
        /// The largest number of decisions replayed by a single recomputation
        max_recomputation_distance: u64,
    }
);
