use std::sync::Arc;

use super::BranchingStrategy;
use super::Constraint;
use super::Domain;
use super::IntegerSpace;
use super::ObjectiveComparator;
use super::VariableId;
use crate::containers::HashMap;
use crate::containers::KeyedVec;
use crate::space::Relation;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectiveDirection {
    Minimise,
    Maximise,
}

/// A linear objective over the variables of a model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Objective {
    pub direction: ObjectiveDirection,
    pub terms: Vec<(i32, VariableId)>,
}

/// The variables, constraints and objective of a problem. The model is shared by every
/// [`IntegerSpace`] created from it.
#[derive(Clone, Debug, Default)]
pub struct IntegerModel {
    names: KeyedVec<VariableId, String>,
    name_index: HashMap<String, VariableId>,
    pub(crate) initial_domains: KeyedVec<VariableId, Domain>,
    pub(crate) constraints: Vec<Constraint>,
    pub(crate) objective: Option<Objective>,
    pub(crate) branching: BranchingStrategy,
}

impl IntegerModel {
    pub fn new_variable(&mut self, name: impl Into<String>, domain: Domain) -> VariableId {
        let name = name.into();
        let id = self.names.push(name.clone());
        let _ = self.initial_domains.push(domain);
        let _ = self.name_index.insert(name, id);
        id
    }

    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    pub fn all_different(&mut self, terms: impl IntoIterator<Item = (VariableId, i32)>) {
        self.add_constraint(Constraint::AllDifferent(terms.into_iter().collect()));
    }

    pub fn linear_less_or_equal(
        &mut self,
        terms: impl IntoIterator<Item = (i32, VariableId)>,
        rhs: i64,
    ) {
        self.add_constraint(Constraint::LinearLessOrEqual {
            terms: terms.into_iter().collect(),
            rhs,
        });
    }

    /// Posted as two `<=` constraints.
    pub fn linear_equal(&mut self, terms: impl IntoIterator<Item = (i32, VariableId)>, rhs: i64) {
        let terms: Vec<_> = terms.into_iter().collect();
        self.linear_less_or_equal(
            terms.iter().map(|&(weight, variable)| (-weight, variable)),
            -rhs,
        );
        self.linear_less_or_equal(terms, rhs);
    }

    pub fn relation(&mut self, variable: VariableId, relation: Relation, value: i32) {
        self.add_constraint(Constraint::Unary {
            variable,
            relation,
            value,
        });
    }

    pub fn minimise(&mut self, terms: impl IntoIterator<Item = (i32, VariableId)>) {
        self.objective = Some(Objective {
            direction: ObjectiveDirection::Minimise,
            terms: terms.into_iter().collect(),
        });
    }

    pub fn maximise(&mut self, terms: impl IntoIterator<Item = (i32, VariableId)>) {
        self.objective = Some(Objective {
            direction: ObjectiveDirection::Maximise,
            terms: terms.into_iter().collect(),
        });
    }

    pub fn set_branching(&mut self, branching: BranchingStrategy) {
        self.branching = branching;
    }

    pub fn variable(&self, name: &str) -> Option<VariableId> {
        self.name_index.get(name).copied()
    }

    pub fn name(&self, variable: VariableId) -> &str {
        &self.names[variable]
    }

    pub fn num_variables(&self) -> usize {
        self.names.len()
    }

    pub fn objective(&self) -> Option<&Objective> {
        self.objective.as_ref()
    }

    /// The comparator of a branch-and-bound search over this model, if it has an objective.
    pub fn comparator(&self) -> Option<ObjectiveComparator> {
        self.objective
            .as_ref()
            .map(|objective| ObjectiveComparator::new(objective.direction))
    }

    /// The state at the root of the search.
    pub fn into_space(self) -> IntegerSpace {
        IntegerSpace::new(Arc::new(self))
    }
}
