/// The better-than relation of a branch-and-bound search.
///
/// Implemented for any closure `Fn(&S, &S) -> bool`.
pub trait Better<S>: Send {
    /// Returns `true` if `candidate` should replace `incumbent` as the best known solution.
    fn is_better(&self, candidate: &S, incumbent: &S) -> bool;
}

impl<S, F: Fn(&S, &S) -> bool + Send> Better<S> for F {
    fn is_better(&self, candidate: &S, incumbent: &S) -> bool {
        (self)(candidate, incumbent)
    }
}
