use super::TerminationCondition;

/// Stops as soon as either of its two conditions asks to stop. Every expanded node is reported to
/// both of them.
///
/// Nest combinators to combine more than two conditions.
#[derive(Clone, Copy, Debug)]
pub struct Combinator<A, B> {
    first: A,
    second: B,
}

impl<A, B> Combinator<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Combinator { first, second }
    }
}

impl<A, B> TerminationCondition for Combinator<A, B>
where
    A: TerminationCondition,
    B: TerminationCondition,
{
    fn should_stop(&mut self) -> bool {
        // Both sides are polled so that stateful conditions observe every check.
        let first = self.first.should_stop();
        let second = self.second.should_stop();
        first || second
    }

    fn node_expanded(&mut self) {
        self.first.node_expanded();
        self.second.node_expanded();
    }
}
