//! Contains the behaviour related to the statistic logging of the
//! [`crate::Solver`].

mod statistic_logging;

pub use statistic_logging::StatisticOptions;
pub use statistic_logging::configure_statistic_logging;
pub use statistic_logging::log_statistic;
pub use statistic_logging::log_statistic_postfix;
pub use statistic_logging::should_log_statistics;
