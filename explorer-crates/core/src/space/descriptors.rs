use std::fmt::Display;
use std::sync::Arc;

/// The relation of a [`SpecialDescriptor`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Relation {
    Equal,
    NotEqual,
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
}

impl Relation {
    pub fn holds(self, lhs: i32, rhs: i32) -> bool {
        match self {
            Relation::Equal => lhs == rhs,
            Relation::NotEqual => lhs != rhs,
            Relation::LessThan => lhs < rhs,
            Relation::LessOrEqual => lhs <= rhs,
            Relation::GreaterThan => lhs > rhs,
            Relation::GreaterOrEqual => lhs >= rhs,
        }
    }
}

impl Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            Relation::Equal => "==",
            Relation::NotEqual => "!=",
            Relation::LessThan => "<",
            Relation::LessOrEqual => "<=",
            Relation::GreaterThan => ">",
            Relation::GreaterOrEqual => ">=",
        };
        write!(f, "{symbol}")
    }
}

/// A constraint `variable relation value` which the user asked to post at a node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SpecialDescriptor {
    pub variable: String,
    pub relation: Relation,
    pub value: i32,
}

impl SpecialDescriptor {
    pub fn new(variable: impl Into<String>, relation: Relation, value: i32) -> Self {
        SpecialDescriptor {
            variable: variable.into(),
            relation,
            value,
        }
    }
}

impl Display for SpecialDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.variable, self.relation, self.value)
    }
}

/// The decision stored at a determined node; shared by the node and all of its children.
#[derive(Debug)]
pub enum Decision<Branching> {
    Branching(Arc<Branching>),
    Special(Arc<SpecialDescriptor>),
}

impl<Branching> Clone for Decision<Branching> {
    fn clone(&self) -> Self {
        match self {
            Decision::Branching(branching) => Decision::Branching(Arc::clone(branching)),
            Decision::Special(special) => Decision::Special(Arc::clone(special)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relations_evaluate_as_their_symbol_suggests() {
        assert!(Relation::LessThan.holds(1, 2));
        assert!(!Relation::LessThan.holds(2, 2));
        assert!(Relation::GreaterOrEqual.holds(2, 2));
        assert!(Relation::NotEqual.holds(1, 2));
    }

    #[test]
    fn special_descriptors_display_as_constraints() {
        let special = SpecialDescriptor::new("x", Relation::LessOrEqual, 3);

        assert_eq!("x <= 3", special.to_string());
    }

    #[test]
    fn cloned_decisions_share_their_descriptor() {
        let decision: Decision<u8> = Decision::Branching(Arc::new(4));

        let Decision::Branching(original) = &decision else {
            panic!("expected a branching decision")
        };
        let Decision::Branching(copy) = decision.clone() else {
            panic!("expected a branching decision")
        };

        assert!(Arc::ptr_eq(original, &copy));
    }
}
