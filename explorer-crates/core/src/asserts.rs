//! Internal consistency checks of the search tree, graded by cost.
//!
//! Simple checks are always on. The expensive ones, which walk parts of the tree, run in tests and
//! with the `debug-checks` feature.

pub const EXPLORER_ASSERT_SIMPLE: u8 = 1;
pub const EXPLORER_ASSERT_MODERATE: u8 = 2;
pub const EXPLORER_ASSERT_ADVANCED: u8 = 3;

#[cfg(all(not(test), not(feature = "debug-checks")))]
pub const EXPLORER_ASSERT_LEVEL_DEFINITION: u8 = EXPLORER_ASSERT_SIMPLE;

#[cfg(any(test, feature = "debug-checks"))]
pub const EXPLORER_ASSERT_LEVEL_DEFINITION: u8 = EXPLORER_ASSERT_ADVANCED;

#[macro_export]
#[doc(hidden)]
macro_rules! explorer_assert_at {
    ($level:ident, $assertion:ident, $($arg:tt)*) => {
        if $crate::asserts::EXPLORER_ASSERT_LEVEL_DEFINITION >= $crate::asserts::$level {
            $assertion!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! explorer_assert_simple {
    ($($arg:tt)*) => { $crate::explorer_assert_at!(EXPLORER_ASSERT_SIMPLE, assert, $($arg)*) };
}

#[macro_export]
#[doc(hidden)]
macro_rules! explorer_assert_eq_simple {
    ($($arg:tt)*) => { $crate::explorer_assert_at!(EXPLORER_ASSERT_SIMPLE, assert_eq, $($arg)*) };
}

#[macro_export]
#[doc(hidden)]
macro_rules! explorer_assert_moderate {
    ($($arg:tt)*) => { $crate::explorer_assert_at!(EXPLORER_ASSERT_MODERATE, assert, $($arg)*) };
}

#[macro_export]
#[doc(hidden)]
macro_rules! explorer_assert_advanced {
    ($($arg:tt)*) => { $crate::explorer_assert_at!(EXPLORER_ASSERT_ADVANCED, assert, $($arg)*) };
}
