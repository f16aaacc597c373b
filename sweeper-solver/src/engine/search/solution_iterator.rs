//! All-solutions enumeration and backbone extraction.

use std::time::Instant;

use log::debug;

use crate::basic_types::Assignment;
use crate::basic_types::Solution;
use crate::containers::KeyedVec;
use crate::engine::component::Component;
use crate::engine::domains::BoolDomain;
use crate::engine::search::Reduction;
use crate::engine::search::SearchEngine;
use crate::engine::search::SearchStrategy;
use crate::engine::solver_statistics::SolverStatistics;
use crate::engine::variables::VariableId;
use crate::engine::variables::VariableKey;
use crate::sweeper_assert_eq_simple;
use crate::sweeper_assert_moderate;

/// A struct which allows the retrieval of multiple solutions to a component.
///
/// After yielding a solution, the iterator walks the assignment stack from the
/// top, restoring fully exhausted levels through the same restore path as
/// UNLABEL, until it finds a level with an untried alternative; the used value
/// is excluded there and the next search resumes from that depth.
pub(crate) struct SolutionIterator<'a> {
    engine: SearchEngine<'a>,
    keys: &'a KeyedVec<VariableId, VariableKey>,
    exhausted: bool,
    has_solution: bool,
}

/// The status of a [`SolutionIterator::next_solution`] call.
pub(crate) enum IteratedSolution {
    /// A new solution was identified.
    Solution(Solution),
    /// No more solutions exist.
    Finished,
    /// There exists no solution.
    Unsatisfiable,
}

impl<'a> SolutionIterator<'a> {
    pub(crate) fn new(engine: SearchEngine<'a>, keys: &'a KeyedVec<VariableId, VariableKey>) -> Self {
        SolutionIterator {
            engine,
            keys,
            exhausted: false,
            has_solution: false,
        }
    }

    pub(crate) fn next_solution(&mut self, statistics: &mut SolverStatistics) -> IteratedSolution {
        if self.exhausted {
            return self.finished_status();
        }

        if !self.engine.search(statistics) {
            self.exhausted = true;
            return self.finished_status();
        }

        self.has_solution = true;
        let solution = Solution::new(
            self.engine
                .stack
                .iter()
                .map(|&(variable, value)| Assignment::new(self.keys[variable], value))
                .collect(),
        );
        self.move_to_next_alternative();

        IteratedSolution::Solution(solution)
    }

    fn finished_status(&self) -> IteratedSolution {
        if self.has_solution {
            IteratedSolution::Finished
        } else {
            IteratedSolution::Unsatisfiable
        }
    }

    /// Unwinds the just-found solution far enough that the search cannot find
    /// it again: exhausted levels are restored outright, and at the first
    /// level which still has an untried candidate the used value is refuted.
    fn move_to_next_alternative(&mut self) {
        loop {
            let Some((variable, value)) = self.engine.stack.pop() else {
                self.exhausted = true;
                return;
            };
            self.engine.undo_top_level();

            if self.engine.domains.domain(variable).size() > 1 {
                self.engine.refute(variable, value);
                return;
            }
        }
    }
}

/// The result of enumerating one component.
pub(crate) struct EnumeratedComponent {
    pub(crate) solutions: Vec<Solution>,
    pub(crate) backbone: Vec<Assignment>,
}

/// Discovers every solution of the component and intersects them into the
/// backbone of forced values.
///
/// The search works on a scratch copy of the stored domains, and every tuple
/// it kills is revived by the time this function returns; the component is
/// left at its pre-call state augmented only by the backbone values, which are
/// committed into the stored domains.
pub(crate) fn enumerate_component(
    component: &mut Component,
    strategy: SearchStrategy,
    statistics: &mut SolverStatistics,
) -> EnumeratedComponent {
    let start = Instant::now();

    let mut solutions = Vec::new();
    {
        let scratch = component.domains.clone();
        let engine = SearchEngine::new(
            &mut component.constraints,
            &component.adjacency,
            &component.assignment_order,
            scratch,
            strategy,
        );
        let mut iterator = SolutionIterator::new(engine, &component.keys);

        loop {
            match iterator.next_solution(statistics) {
                IteratedSolution::Solution(solution) => solutions.push(solution),
                IteratedSolution::Finished | IteratedSolution::Unsatisfiable => break,
            }
        }

        // exhaustion has unwound every level, so all tuple kills are undone
        // and only scratch-domain refutations remain on the trail
        sweeper_assert_eq_simple!(0, iterator.engine.trail.level());
        sweeper_assert_moderate!(
            iterator
                .engine
                .trail
                .entries_at_level(0)
                .iter()
                .all(|reduction| matches!(reduction, Reduction::DomainValue { .. }))
        );
    }

    let backbone = backbone_of(&solutions, &component.assignment_order, &component.keys);

    // commit the backbone into the stored domains; everything else is back at
    // its pre-call state
    for assignment in backbone.iter() {
        let variable = component.ids[&assignment.variable];
        let narrowed = component
            .domains
            .domain(variable)
            .intersect(BoolDomain::singleton(assignment.value));
        component.domains.shrink_to(variable, narrowed);
    }

    debug!(
        "enumeration finished: {} solution(s), backbone of {} value(s)",
        solutions.len(),
        backbone.len()
    );
    statistics.time_spent_searching += start.elapsed();

    EnumeratedComponent {
        solutions,
        backbone,
    }
}

/// A variable is part of the backbone iff its value is identical across every
/// discovered solution.
fn backbone_of(
    solutions: &[Solution],
    order: &[VariableId],
    keys: &KeyedVec<VariableId, VariableKey>,
) -> Vec<Assignment> {
    let Some(first) = solutions.first() else {
        return Vec::new();
    };

    order
        .iter()
        .enumerate()
        .filter_map(|(position, &variable)| {
            let value = first.assignments()[position].value;
            solutions
                .iter()
                .all(|solution| solution.assignments()[position].value == value)
                .then(|| Assignment::new(keys[variable], value))
        })
        .collect()
}
