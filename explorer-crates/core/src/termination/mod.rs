//! Conditions under which an exploration gives up before the tree is exhausted.
//!
//! The explorer polls its [`TerminationCondition`] before every expansion, and the condition is
//! also handed to [`crate::SolverState::status`] so that a long propagation can be cut short.
//! Conditions compose through [`Combinator`] and `Option`.

mod combinator;
mod node_budget;
mod stop_flag;
mod time_budget;

pub use combinator::Combinator;
pub use node_budget::NodeBudget;
pub use stop_flag::StopFlag;
pub use time_budget::TimeBudget;

pub trait TerminationCondition {
    /// Whether the exploration should stop now.
    fn should_stop(&mut self) -> bool;

    /// Called once for every node whose status the explorer determined.
    fn node_expanded(&mut self) {}
}

/// Never asks to stop; the exploration runs until the tree is exhausted.
#[derive(Clone, Copy, Debug)]
pub struct Indefinite;

impl TerminationCondition for Indefinite {
    fn should_stop(&mut self) -> bool {
        false
    }
}

impl<T: TerminationCondition> TerminationCondition for Option<T> {
    fn should_stop(&mut self) -> bool {
        self.as_mut().is_some_and(TerminationCondition::should_stop)
    }

    fn node_expanded(&mut self) {
        if let Some(condition) = self {
            condition.node_expanded()
        }
    }
}

impl<T: TerminationCondition + ?Sized> TerminationCondition for &mut T {
    fn should_stop(&mut self) -> bool {
        (**self).should_stop()
    }

    fn node_expanded(&mut self) {
        (**self).node_expanded()
    }
}
