//! A small integer constraint store implementing [`SolverState`], used to drive the explorer from
//! tests and from the command line.
//!
//! Variables have explicit domains; propagation runs every constraint until nothing changes.
mod branching;
mod comparator;
mod constraint;
mod domain;
mod model;
pub mod models;

use std::fmt::Display;
use std::sync::Arc;

use log::warn;

pub use branching::BranchingStrategy;
pub use branching::IntegerBranching;
pub use comparator::ObjectiveComparator;
pub use constraint::Constraint;
pub use domain::Domain;
pub use model::IntegerModel;
pub use model::Objective;
pub use model::ObjectiveDirection;

use crate::basic_types::AllocationFailure;
use crate::basic_types::Interrupted;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;
use crate::space::SolverState;
use crate::space::SpaceStatus;
use crate::space::SpecialDescriptor;
use crate::termination::TerminationCondition;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId(u32);

impl StorageKey for VariableId {
    fn index(&self) -> usize {
        self.0 as usize
    }

    fn create_from_index(index: usize) -> Self {
        VariableId(index as u32)
    }
}

impl Display for VariableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.0)
    }
}

/// The domains of the variables of an [`IntegerModel`] at one node of the search tree.
#[derive(Debug)]
pub struct IntegerSpace {
    model: Arc<IntegerModel>,
    domains: KeyedVec<VariableId, Domain>,
    /// Constraints posted at special nodes.
    posted: Vec<Constraint>,
    /// The objective has to improve on this bound.
    objective_bound: Option<Constraint>,
    failed: bool,
}

impl IntegerSpace {
    pub fn new(model: Arc<IntegerModel>) -> Self {
        IntegerSpace {
            domains: model.initial_domains.clone(),
            model,
            posted: vec![],
            objective_bound: None,
            failed: false,
        }
    }

    pub fn model(&self) -> &IntegerModel {
        &self.model
    }

    pub fn domain(&self, variable: VariableId) -> &Domain {
        &self.domains[variable]
    }

    /// The value of the variable called `name`, if it is fixed.
    pub fn value(&self, name: &str) -> Option<i32> {
        self.model
            .variable(name)
            .and_then(|variable| self.domains[variable].value())
    }

    pub fn is_failed(&self) -> bool {
        self.failed
    }

    /// The value of the objective, once all of its variables are fixed.
    pub fn objective_value(&self) -> Option<i64> {
        let objective = self.model.objective()?;
        objective
            .terms
            .iter()
            .map(|&(weight, variable)| {
                self.domains[variable]
                    .value()
                    .map(|value| i64::from(weight) * i64::from(value))
            })
            .sum()
    }

    /// Run every constraint until no domain changes any more.
    fn propagate(
        &mut self,
        termination: &mut impl TerminationCondition,
    ) -> Result<(), Interrupted> {
        while !self.failed {
            if termination.should_stop() {
                return Err(Interrupted);
            }

            let mut changed = false;
            for constraint in self
                .model
                .constraints
                .iter()
                .chain(&self.posted)
                .chain(&self.objective_bound)
            {
                match constraint.propagate(&mut self.domains) {
                    Ok(constraint_changed) => changed |= constraint_changed,
                    Err(_) => {
                        self.failed = true;
                        break;
                    }
                }
            }

            if !changed {
                break;
            }
        }
        Ok(())
    }

    /// The unfixed variable with the smallest domain, the first one on ties.
    fn first_fail(&self) -> Option<VariableId> {
        self.domains
            .keys()
            .filter(|&variable| !self.domains[variable].is_fixed())
            .min_by_key(|&variable| self.domains[variable].size())
    }

    fn restrict(&mut self, variable: VariableId, predicate: impl Fn(i32) -> bool) {
        let _ = self.domains[variable].retain(predicate);
        if self.domains[variable].is_empty() {
            self.failed = true;
        }
    }
}

impl SolverState for IntegerSpace {
    type Branching = IntegerBranching;

    fn try_clone(&self) -> Result<Self, AllocationFailure> {
        let mut domains = KeyedVec::default();
        domains
            .try_reserve(self.domains.len())
            .map_err(|_| AllocationFailure)?;
        for domain in self.domains.iter() {
            let _ = domains.push(domain.try_clone()?);
        }

        Ok(IntegerSpace {
            model: Arc::clone(&self.model),
            domains,
            posted: self.posted.clone(),
            objective_bound: self.objective_bound.clone(),
            failed: self.failed,
        })
    }

    fn status(
        &mut self,
        termination: &mut impl TerminationCondition,
    ) -> Result<SpaceStatus<IntegerBranching>, Interrupted> {
        self.propagate(termination)?;
        if self.domains.iter().any(Domain::is_empty) {
            self.failed = true;
        }
        if self.failed {
            return Ok(SpaceStatus::Failed);
        }

        let Some(variable) = self.first_fail() else {
            return Ok(SpaceStatus::Solved);
        };
        let domain = &self.domains[variable];
        let Some(smallest) = domain.lower_bound() else {
            return Ok(SpaceStatus::Failed);
        };
        let descriptor = match self.model.branching {
            BranchingStrategy::Split => IntegerBranching::Split {
                variable,
                value: smallest,
            },
            BranchingStrategy::Enumerate => IntegerBranching::Enumerate {
                variable,
                values: domain.values().to_vec(),
            },
        };

        Ok(SpaceStatus::Branch {
            alternatives: descriptor.alternatives(),
            descriptor,
        })
    }

    fn commit(&mut self, branching: &IntegerBranching, alternative: usize) {
        match branching {
            IntegerBranching::Split { variable, value } => {
                let value = *value;
                if alternative == 0 {
                    self.restrict(*variable, |candidate| candidate == value);
                } else {
                    self.restrict(*variable, |candidate| candidate != value);
                }
            }
            IntegerBranching::Enumerate { variable, values } => match values.get(alternative) {
                Some(&value) => self.restrict(*variable, |candidate| candidate == value),
                None => self.failed = true,
            },
        }
    }

    fn post(&mut self, special: &SpecialDescriptor) {
        let Some(variable) = self.model.variable(&special.variable) else {
            warn!("cannot post {special}, there is no variable {}", special.variable);
            self.failed = true;
            return;
        };
        self.posted.push(Constraint::Unary {
            variable,
            relation: special.relation,
            value: special.value,
        });
    }

    fn constrain(&mut self, best: &Self) {
        let (Some(objective), Some(value)) = (self.model.objective(), best.objective_value()) else {
            return;
        };

        self.objective_bound = Some(match objective.direction {
            ObjectiveDirection::Minimise => Constraint::LinearLessOrEqual {
                terms: objective.terms.clone(),
                rhs: value - 1,
            },
            ObjectiveDirection::Maximise => Constraint::LinearLessOrEqual {
                terms: objective
                    .terms
                    .iter()
                    .map(|&(weight, variable)| (-weight, variable))
                    .collect(),
                rhs: -(value + 1),
            },
        });
    }
}

impl Display for IntegerSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.failed {
            return write!(f, "failed");
        }
        for (index, variable) in self.domains.keys().enumerate() {
            if index > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}={}", self.model.name(variable), self.domains[variable])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::space::Relation;
    use crate::termination::Indefinite;
    use crate::termination::NodeBudget;

    fn two_variables() -> IntegerSpace {
        let mut model = IntegerModel::default();
        let x = model.new_variable("x", Domain::interval(0, 2));
        let y = model.new_variable("y", Domain::interval(0, 2));
        model.all_different([(x, 0), (y, 0)]);
        model.minimise([(1, x), (1, y)]);
        model.into_space()
    }

    #[test]
    fn unfixed_states_branch_on_the_smallest_domain() {
        let mut space = two_variables();

        let status = space.status(&mut Indefinite).unwrap();

        let x = space.model().variable("x").unwrap();
        assert_eq!(
            SpaceStatus::Branch {
                descriptor: IntegerBranching::Split { variable: x, value: 0 },
                alternatives: 2,
            },
            status
        );
    }

    #[test]
    fn committing_the_first_alternative_fixes_the_variable() {
        let mut space = two_variables();
        let SpaceStatus::Branch { descriptor, .. } = space.status(&mut Indefinite).unwrap() else {
            panic!("expected a branch")
        };

        space.commit(&descriptor, 0);
        let _ = space.status(&mut Indefinite).unwrap();

        assert_eq!(Some(0), space.value("x"));
        assert!(!space.domain(space.model().variable("y").unwrap()).contains(0));
    }

    #[test]
    fn constraining_with_a_solution_requires_a_better_objective() {
        let mut solution = two_variables();
        solution.post(&SpecialDescriptor::new("x", Relation::Equal, 1));
        solution.post(&SpecialDescriptor::new("y", Relation::Equal, 0));
        assert_eq!(SpaceStatus::Solved, solution.status(&mut Indefinite).unwrap());
        assert_eq!(Some(1), solution.objective_value());

        let mut space = two_variables();
        space.constrain(&solution);

        assert_eq!(SpaceStatus::Failed, space.status(&mut Indefinite).unwrap());
    }

    #[test]
    fn posting_on_an_unknown_variable_fails_the_state() {
        let mut space = two_variables();

        space.post(&SpecialDescriptor::new("z", Relation::Equal, 1));

        assert!(space.is_failed());
        assert_eq!(SpaceStatus::Failed, space.status(&mut Indefinite).unwrap());
    }

    #[test]
    fn propagation_polls_the_termination_condition() {
        let mut space = two_variables();

        assert_eq!(Err(Interrupted), space.status(&mut NodeBudget::new(0)));
    }

    #[test]
    fn clones_are_independent() {
        let mut space = two_variables();
        let copy = space.try_clone().unwrap();

        space.post(&SpecialDescriptor::new("x", Relation::Equal, 2));
        let _ = space.status(&mut Indefinite).unwrap();

        assert_eq!(Some(2), space.value("x"));
        assert_eq!(None, copy.value("x"));
    }
}
