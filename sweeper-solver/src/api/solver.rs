use crate::api::outputs::EnumerationOutcome;
use crate::api::outputs::PropagationOutcome;
use crate::engine::component::Component;
use crate::engine::search::SearchStrategy;
use crate::engine::search::solution_iterator::enumerate_component;
use crate::engine::solver_statistics::SolverStatistics;
use crate::engine::tabular_reduction;

/// The entry point of the engine.
///
/// The solver itself is stateless apart from the cumulative
/// [`SolverStatistics`]; the components it operates on are owned by the
/// caller and persist across calls (a board typically triggers one call per
/// revealed cell, against the same components).
#[derive(Debug, Default)]
pub struct Solver {
    statistics: SolverStatistics,
}

impl Solver {
    /// Runs the one-shot tabular-reduction pass over the component, enforcing
    /// generalized arc consistency. The pass commits its prunings: on success
    /// the domains are tightened in place, and on contradiction the offending
    /// neighbourhood is invalidated, which
    /// [`PropagationOutcome::consistent`] reports.
    pub fn propagate(&mut self, component: &mut Component) -> PropagationOutcome {
        let solved = tabular_reduction::run_to_fixpoint(component, &mut self.statistics);

        PropagationOutcome {
            solved,
            consistent: component.is_consistent(),
        }
    }

    /// Discovers every solution of the component with a backtracking search
    /// under the given consistency strategy, and intersects the solutions
    /// into their backbone. The backbone is committed into the component's
    /// domains; all other solving state is restored before returning.
    pub fn enumerate(
        &mut self,
        component: &mut Component,
        strategy: SearchStrategy,
    ) -> EnumerationOutcome {
        let enumerated = enumerate_component(component, strategy, &mut self.statistics);

        EnumerationOutcome {
            satisfiable: !enumerated.solutions.is_empty(),
            backbone: enumerated.backbone,
            solutions: enumerated.solutions,
        }
    }

    /// The cumulative diagnostics of all calls made through this solver.
    pub fn statistics(&self) -> &SolverStatistics {
        &self.statistics
    }

    /// Writes the diagnostics through the configured statistic logger (see
    /// [`crate::statistics::configure_statistic_logging`]).
    pub fn log_statistics(&self) {
        self.statistics.log();
    }
}
