use std::fmt::Display;

use super::VariableId;

/// How [`super::IntegerSpace`] splits a state which is not yet solved. The variable to branch on
/// is always the unfixed variable with the smallest domain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum BranchingStrategy {
    /// Two alternatives: the variable takes its smallest value, or it does not.
    #[default]
    Split,
    /// One alternative per value in the domain of the variable.
    Enumerate,
}

/// The branching descriptor of [`super::IntegerSpace`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IntegerBranching {
    /// Alternative 0 is `variable == value`, alternative 1 is `variable != value`.
    Split { variable: VariableId, value: i32 },
    /// Alternative `i` is `variable == values[i]`.
    Enumerate {
        variable: VariableId,
        values: Vec<i32>,
    },
}

impl IntegerBranching {
    pub fn variable(&self) -> VariableId {
        match self {
            IntegerBranching::Split { variable, .. }
            | IntegerBranching::Enumerate { variable, .. } => *variable,
        }
    }

    pub fn alternatives(&self) -> usize {
        match self {
            IntegerBranching::Split { .. } => 2,
            IntegerBranching::Enumerate { values, .. } => values.len(),
        }
    }
}

impl Display for IntegerBranching {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntegerBranching::Split { variable, value } => {
                write!(f, "{variable} == {value} | {variable} != {value}")
            }
            IntegerBranching::Enumerate { variable, values } => {
                write!(f, "{variable} in {values:?}")
            }
        }
    }
}
