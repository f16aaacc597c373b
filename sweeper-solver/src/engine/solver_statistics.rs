use std::time::Duration;

use crate::statistics::log_statistic;

/// Structure responsible for storing several statistics of the solving
/// process. The counters are cumulative across calls and advisory only; the
/// caller owns them through the [`crate::Solver`] and may reset them by
/// replacing the solver.
#[derive(Debug, Default, Clone, Copy)]
pub struct SolverStatistics {
    /// The number of constraint revisions performed by the one-shot
    /// propagation pass.
    pub num_revisions: u64,
    /// The number of tuples killed across all constraint tables, by both the
    /// one-shot pass and search-time propagation.
    pub num_tuples_killed: u64,
    /// The number of nodes visited by the search (one per labelling attempt
    /// of a variable).
    pub num_nodes_visited: u64,
    /// The number of backtracks the search required.
    pub num_backtracks: u64,
    /// The time spent in the one-shot propagation pass.
    pub time_spent_propagating: Duration,
    /// The time spent searching and enumerating, consistency checks included.
    pub time_spent_searching: Duration,
}

impl SolverStatistics {
    pub(crate) fn log(&self) {
        log_statistic("revisions", self.num_revisions);
        log_statistic("tuplesKilled", self.num_tuples_killed);
        log_statistic("nodesVisited", self.num_nodes_visited);
        log_statistic("backtracks", self.num_backtracks);
        log_statistic("propagationTime", self.time_spent_propagating.as_secs_f64());
        log_statistic("searchTime", self.time_spent_searching.as_secs_f64());
    }
}
