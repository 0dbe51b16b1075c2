use super::IntegerSpace;
use super::ObjectiveDirection;
use crate::space::Better;

/// Compares solutions of an [`IntegerSpace`] by the value of the objective of their model.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObjectiveComparator {
    direction: ObjectiveDirection,
}

impl ObjectiveComparator {
    pub fn new(direction: ObjectiveDirection) -> Self {
        ObjectiveComparator { direction }
    }
}

impl Better<IntegerSpace> for ObjectiveComparator {
    fn is_better(&self, candidate: &IntegerSpace, incumbent: &IntegerSpace) -> bool {
        match (candidate.objective_value(), incumbent.objective_value()) {
            (Some(candidate), Some(incumbent)) => match self.direction {
                ObjectiveDirection::Minimise => candidate < incumbent,
                ObjectiveDirection::Maximise => candidate > incumbent,
            },
            (Some(_), None) => true,
            (None, _) => false,
        }
    }
}
