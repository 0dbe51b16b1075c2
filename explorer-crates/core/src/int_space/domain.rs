use std::fmt::Display;

use crate::basic_types::AllocationFailure;

/// The values an integer variable can still take, kept sorted and without duplicates.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Domain {
    values: Vec<i32>,
}

impl Domain {
    pub fn from_values(values: impl IntoIterator<Item = i32>) -> Self {
        let mut values: Vec<i32> = values.into_iter().collect();
        values.sort_unstable();
        values.dedup();
        Domain { values }
    }

    pub fn interval(lower_bound: i32, upper_bound: i32) -> Self {
        Domain::from_values(lower_bound..=upper_bound)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn size(&self) -> usize {
        self.values.len()
    }

    pub fn is_fixed(&self) -> bool {
        self.values.len() == 1
    }

    /// The value of a fixed domain.
    pub fn value(&self) -> Option<i32> {
        if self.is_fixed() {
            self.values.first().copied()
        } else {
            None
        }
    }

    pub fn lower_bound(&self) -> Option<i32> {
        self.values.first().copied()
    }

    pub fn upper_bound(&self) -> Option<i32> {
        self.values.last().copied()
    }

    pub fn contains(&self, value: i32) -> bool {
        self.values.binary_search(&value).is_ok()
    }

    pub fn values(&self) -> &[i32] {
        &self.values
    }

    /// Keep only the values satisfying `predicate`; returns whether a value was removed.
    pub fn retain(&mut self, predicate: impl Fn(i32) -> bool) -> bool {
        let size = self.values.len();
        self.values.retain(|&value| predicate(value));
        self.values.len() != size
    }

    pub fn remove(&mut self, value: i32) -> bool {
        match self.values.binary_search(&value) {
            Ok(index) => {
                let _ = self.values.remove(index);
                true
            }
            Err(_) => false,
        }
    }

    pub fn fix(&mut self, value: i32) -> bool {
        self.retain(|candidate| candidate == value)
    }

    pub(crate) fn try_clone(&self) -> Result<Self, AllocationFailure> {
        let mut values = Vec::new();
        values
            .try_reserve_exact(self.values.len())
            .map_err(|_| AllocationFailure)?;
        values.extend_from_slice(&self.values);
        Ok(Domain { values })
    }
}

impl Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.values.as_slice() {
            [] => write!(f, "{{}}"),
            [value] => write!(f, "{value}"),
            [first, .., last]
                if (i64::from(*last) - i64::from(*first)) as usize + 1 == self.values.len() =>
            {
                write!(f, "{first}..{last}")
            }
            values => {
                write!(f, "{{")?;
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}
