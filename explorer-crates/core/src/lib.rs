//! The node core of an interactive search-tree explorer.
//!
//! A [`SearchTree`] holds one node per position of a branch-and-bound search. Nodes acquire
//! solver states lazily: by cloning a copy, by taking over the state of their parent, or by
//! replaying the decisions from the closest copy above them. The tree decides where copies are
//! kept so that states can be rebuilt quickly without keeping one per node.
//!
//! # Example
//! ```rust
//! # use explorer_core::int_space::models::n_queens;
//! # use explorer_core::int_space::BranchingStrategy;
//! # use explorer_core::termination::Indefinite;
//! # use explorer_core::*;
//! let space = n_queens(4, BranchingStrategy::Split).into_space();
//! let tree = SharedTree::new(SearchTree::new(space, ExplorerOptions::default()));
//!
//! let report = explore(&tree, NodeId::ROOT, ExplorationOptions::default(), &mut Indefinite);
//!
//! assert_eq!(2, report.solutions);
//! assert_eq!(ExplorationOutcome::Exhausted, report.outcome);
//! ```
#[doc(hidden)]
pub mod asserts;
pub(crate) mod basic_types;
pub mod containers;
pub(crate) mod exploration;
pub mod int_space;
pub(crate) mod space;
pub mod statistics;
pub mod termination;
pub(crate) mod tree;

pub use convert_case;

pub use crate::basic_types::AllocationFailure;
pub use crate::basic_types::ExplorerError;
pub use crate::basic_types::Interrupted;
pub use crate::basic_types::NodeId;
pub use crate::exploration::*;
pub use crate::space::*;
pub use crate::tree::BestId;
pub use crate::tree::BestSolution;
pub use crate::tree::ExplorerOptions;
pub use crate::tree::ExplorerStatistics;
pub use crate::tree::ForcedStatus;
pub use crate::tree::NodeStatus;
pub use crate::tree::SearchTree;
pub use crate::tree::StatusKind;
pub use crate::tree::TreeSummary;
