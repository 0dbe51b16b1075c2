//! Exploring a tree from a background thread while the foreground thread reads it.
mod explorer;
mod shared_tree;
mod strategy;

pub use explorer::explore;
pub use explorer::ExplorationOutcome;
pub use explorer::ExplorationReport;
pub use explorer::Explorer;
pub use shared_tree::SharedTree;
pub use strategy::AllocationFailurePolicy;
pub use strategy::ExplorationMode;
pub use strategy::ExplorationOptions;
pub use strategy::ExplorationStrategy;
