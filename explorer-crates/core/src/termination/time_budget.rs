use std::time::Duration;
use std::time::Instant;

use super::TerminationCondition;

/// Stops the exploration once a wall-clock deadline has passed.
///
/// The deadline is only checked between node expansions, so a single expensive status
/// computation can overrun it.
#[derive(Clone, Copy, Debug)]
pub struct TimeBudget {
    /// `None` when the budget reaches beyond what an [`Instant`] can represent.
    deadline: Option<Instant>,
}

impl TimeBudget {
    /// A budget of `budget` wall-clock time, measured from the moment of this call.
    pub fn starting_now(budget: Duration) -> TimeBudget {
        TimeBudget {
            deadline: Instant::now().checked_add(budget),
        }
    }

    /// The time left before the deadline; zero once it has passed.
    pub fn remaining(&self) -> Duration {
        self.deadline.map_or(Duration::MAX, |deadline| {
            deadline.saturating_duration_since(Instant::now())
        })
    }
}

impl TerminationCondition for TimeBudget {
    fn should_stop(&mut self) -> bool {
        self.deadline
            .is_some_and(|deadline| Instant::now() >= deadline)
    }
}
