//! Statistic logging: counters are written as `{prefix} {name}={value}` lines once a sink has
//! been configured, and dropped otherwise.
mod sink;

use std::fmt::Display;

use itertools::Itertools;
pub use sink::configure_statistic_logging;
pub use sink::log_statistic;
pub use sink::log_statistic_postfix;
pub use sink::should_log_statistics;
pub use sink::StatisticOptions;

/// Something which can be written to the statistic sink under a name.
pub trait Statistic {
    fn log(&self, logger: StatisticLogger);
}

impl<Value: Display> Statistic for Value {
    fn log(&self, logger: StatisticLogger) {
        logger.log_statistic(self);
    }
}

/// The name under which a [`Statistic`] is logged; nested statistics extend it with their field
/// names, joined by underscores.
#[derive(Clone, Debug, Default)]
pub struct StatisticLogger {
    name: String,
}

impl StatisticLogger {
    pub fn new(name: impl IntoIterator<Item = impl Display>) -> Self {
        StatisticLogger {
            name: name.into_iter().join("_"),
        }
    }

    pub fn attach_to_prefix(&self, segment: impl Display) -> Self {
        StatisticLogger {
            name: format!("{}_{segment}", self.name),
        }
    }

    pub fn log_statistic(&self, value: impl Display) {
        log_statistic(&self.name, value);
    }
}

/// Declares a struct of counters which logs each field as its own statistic.
///
/// ```rust
/// # use explorer_core::create_statistics_struct;
/// create_statistics_struct!(
///     /// Work done while pruning.
///     PruningStatistics {
///         num_pruned: u64,
///     }
/// );
///
/// let statistics = PruningStatistics::default();
/// assert_eq!(0, statistics.num_pruned);
/// ```
#[macro_export]
macro_rules! create_statistics_struct {
    (
        $(#[$doc:meta])*
        $name:ident {
            $($(#[$field_doc:meta])* $field:ident : $type:ident),+ $(,)?
        }
    ) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
        pub struct $name {
            $($(#[$field_doc])* pub $field: $type),+
        }

        impl $crate::statistics::Statistic for $name {
            fn log(&self, logger: $crate::statistics::StatisticLogger) {
                $(
                    $crate::statistics::Statistic::log(
                        &self.$field,
                        logger.attach_to_prefix(stringify!($field)),
                    );
                )+
            }
        }
    };
}
