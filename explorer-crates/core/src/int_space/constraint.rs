use thiserror::Error;

use super::Domain;
use super::VariableId;
use crate::containers::KeyedVec;
use crate::space::Relation;

/// A domain became empty.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
#[error("a domain became empty")]
pub(crate) struct Inconsistency;

/// The constraints understood by [`super::IntegerSpace`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Constraint {
    /// The values `variable + offset` are pairwise different.
    AllDifferent(Vec<(VariableId, i32)>),
    /// `sum(weight * variable) <= rhs`.
    LinearLessOrEqual {
        terms: Vec<(i32, VariableId)>,
        rhs: i64,
    },
    /// `variable relation value`.
    Unary {
        variable: VariableId,
        relation: Relation,
        value: i32,
    },
}

type PropagationResult = Result<bool, Inconsistency>;

impl Constraint {
    /// Remove values which cannot be part of a solution. Returns whether a domain changed.
    pub(crate) fn propagate(
        &self,
        domains: &mut KeyedVec<VariableId, Domain>,
    ) -> PropagationResult {
        let changed = match self {
            Constraint::AllDifferent(terms) => propagate_all_different(terms, domains),
            Constraint::LinearLessOrEqual { terms, rhs } => {
                propagate_linear_less_or_equal(terms, *rhs, domains)?
            }
            Constraint::Unary {
                variable,
                relation,
                value,
            } => domains[*variable].retain(|candidate| relation.holds(candidate, *value)),
        };

        if domains.iter().any(Domain::is_empty) {
            return Err(Inconsistency);
        }
        Ok(changed)
    }
}

fn propagate_all_different(
    terms: &[(VariableId, i32)],
    domains: &mut KeyedVec<VariableId, Domain>,
) -> bool {
    let mut changed = false;
    for (index, &(variable, offset)) in terms.iter().enumerate() {
        let Some(value) = domains[variable].value() else {
            continue;
        };
        let shifted = i64::from(value) + i64::from(offset);

        for (other_index, &(other, other_offset)) in terms.iter().enumerate() {
            if other_index == index {
                continue;
            }
            let Ok(excluded) = i32::try_from(shifted - i64::from(other_offset)) else {
                continue;
            };
            changed |= domains[other].remove(excluded);
        }
    }
    changed
}

fn propagate_linear_less_or_equal(
    terms: &[(i32, VariableId)],
    rhs: i64,
    domains: &mut KeyedVec<VariableId, Domain>,
) -> PropagationResult {
    let minimum_contribution = |weight: i32, domain: &Domain| -> Option<i64> {
        let bound = if weight >= 0 {
            domain.lower_bound()
        } else {
            domain.upper_bound()
        };
        bound.map(|bound| i64::from(weight) * i64::from(bound))
    };

    let mut minimum = 0;
    for &(weight, variable) in terms {
        minimum += minimum_contribution(weight, &domains[variable]).ok_or(Inconsistency)?;
    }
    if minimum > rhs {
        return Err(Inconsistency);
    }

    let mut changed = false;
    for &(weight, variable) in terms {
        if weight == 0 {
            continue;
        }
        let own = minimum_contribution(weight, &domains[variable]).ok_or(Inconsistency)?;
        let slack = rhs - (minimum - own);
        let weight = i64::from(weight);

        changed |= if weight > 0 {
            let upper_bound = slack.div_euclid(weight);
            domains[variable].retain(|value| i64::from(value) <= upper_bound)
        } else {
            let lower_bound = -slack.div_euclid(-weight);
            domains[variable].retain(|value| i64::from(value) >= lower_bound)
        };
    }
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domains(values: &[(i32, i32)]) -> (KeyedVec<VariableId, Domain>, Vec<VariableId>) {
        let mut domains = KeyedVec::default();
        let ids = values
            .iter()
            .map(|&(lower, upper)| domains.push(Domain::interval(lower, upper)))
            .collect();
        (domains, ids)
    }

    #[test]
    fn all_different_removes_fixed_values_from_the_others() {
        let (mut domains, ids) = domains(&[(1, 1), (0, 3), (0, 3)]);
        let constraint = Constraint::AllDifferent(vec![(ids[0], 0), (ids[1], 0), (ids[2], 1)]);

        assert_eq!(Ok(true), constraint.propagate(&mut domains));

        assert_eq!(&[0, 2, 3], domains[ids[1]].values());
        assert_eq!(&[1, 2, 3], domains[ids[2]].values());
    }

    #[test]
    fn all_different_fails_when_two_fixed_values_collide() {
        let (mut domains, ids) = domains(&[(2, 2), (2, 2)]);
        let constraint = Constraint::AllDifferent(vec![(ids[0], 0), (ids[1], 0)]);

        assert_eq!(Err(Inconsistency), constraint.propagate(&mut domains));
    }

    #[test]
    fn linear_less_or_equal_tightens_upper_bounds() {
        let (mut domains, ids) = domains(&[(0, 10), (2, 10)]);
        let constraint = Constraint::LinearLessOrEqual {
            terms: vec![(2, ids[0]), (1, ids[1])],
            rhs: 8,
        };

        assert_eq!(Ok(true), constraint.propagate(&mut domains));

        assert_eq!(Some(3), domains[ids[0]].upper_bound());
        assert_eq!(Some(8), domains[ids[1]].upper_bound());
    }

    #[test]
    fn negative_weights_tighten_lower_bounds() {
        let (mut domains, ids) = domains(&[(0, 10)]);
        let constraint = Constraint::LinearLessOrEqual {
            terms: vec![(-3, ids[0])],
            rhs: -7,
        };

        assert_eq!(Ok(true), constraint.propagate(&mut domains));

        assert_eq!(Some(3), domains[ids[0]].lower_bound());
    }

    #[test]
    fn linear_less_or_equal_fails_when_the_minimum_exceeds_the_bound() {
        let (mut domains, ids) = domains(&[(3, 5), (3, 5)]);
        let constraint = Constraint::LinearLessOrEqual {
            terms: vec![(1, ids[0]), (1, ids[1])],
            rhs: 5,
        };

        assert_eq!(Err(Inconsistency), constraint.propagate(&mut domains));
    }

    #[test]
    fn unary_constraints_filter_the_domain() {
        let (mut domains, ids) = domains(&[(0, 5)]);
        let constraint = Constraint::Unary {
            variable: ids[0],
            relation: Relation::GreaterThan,
            value: 3,
        };

        assert_eq!(Ok(true), constraint.propagate(&mut domains));
        assert_eq!(&[4, 5], domains[ids[0]].values());
    }
}
