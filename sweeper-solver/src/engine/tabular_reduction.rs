//! The one-shot tabular-reduction pass: enforces generalized arc consistency
//! over a component by revising constraint tables until a local fixpoint is
//! reached, then reports every variable whose domain collapsed to a single
//! candidate.
//!
//! The pass runs outside of search, once per external update, and commits its
//! result: prunings are not undone, and a contradiction invalidates every
//! constraint touching the offending variables rather than backtracking.

use std::collections::VecDeque;
use std::time::Instant;

use log::debug;
use log::trace;

use crate::basic_types::Assignment;
use crate::constraints::ConstraintId;
use crate::containers::StorageKey;
use crate::engine::component::Component;
use crate::engine::solver_statistics::SolverStatistics;
use crate::engine::variables::VariableId;

/// Runs the pass to fixpoint and returns the assignments of all variables
/// which are left with exactly one candidate value (including variables which
/// were already pinned before the call; committing them twice is harmless).
///
/// Whether the component survived the pass is visible through
/// [`Component::is_consistent`].
pub(crate) fn run_to_fixpoint(
    component: &mut Component,
    statistics: &mut SolverStatistics,
) -> Vec<Assignment> {
    let start = Instant::now();

    let mut queue: VecDeque<ConstraintId> = (0..component.constraints.len())
        .map(ConstraintId::create_from_index)
        .collect();
    let mut in_queue = vec![true; component.constraints.len()];

    let mut offenders: Option<Vec<VariableId>> = None;

    'fixpoint: while let Some(constraint_id) = queue.pop_front() {
        in_queue[constraint_id.index()] = false;
        statistics.num_revisions += 1;

        let killed = component.constraints[constraint_id.index()].kill_unsupported(&component.domains);
        statistics.num_tuples_killed += killed.len() as u64;
        trace!(
            "revised constraint {}: {} tuple(s) killed",
            constraint_id.index(),
            killed.len()
        );

        if !component.constraints[constraint_id.index()].is_satisfiable() {
            // a dead constraint incriminates its entire scope
            offenders = Some(component.constraints[constraint_id.index()].scope().to_vec());
            break 'fixpoint;
        }

        let supported = component.constraints[constraint_id.index()].supported_domains();
        let scope = component.constraints[constraint_id.index()].scope().to_vec();

        for (position, &variable) in scope.iter().enumerate() {
            let stored = component.domains.domain(variable);
            let narrowed = stored.intersect(supported[position]);
            if narrowed == stored {
                continue;
            }

            component.domains.shrink_to(variable, narrowed);
            if narrowed.is_empty() {
                offenders = Some(vec![variable]);
                break 'fixpoint;
            }

            for &other in component.adjacency[variable].iter() {
                if other != constraint_id && !in_queue[other.index()] {
                    queue.push_back(other);
                    in_queue[other.index()] = true;
                }
            }
        }
    }

    if let Some(offenders) = offenders {
        // Contradiction: this pass is not inside search, so instead of
        // backtracking the entire neighbourhood of the offending variables is
        // invalidated and left for the caller's consistency check.
        for &variable in offenders.iter() {
            for &constraint_id in component.adjacency[variable].iter() {
                component.constraints[constraint_id.index()].kill_all();
            }
        }
        debug!(
            "propagation found a contradiction; poisoned the constraints of {} variable(s)",
            offenders.len()
        );
    }

    let solved: Vec<Assignment> = component
        .domains
        .variables()
        .filter_map(|variable| {
            component
                .domains
                .domain(variable)
                .as_singleton()
                .map(|value| Assignment::new(component.key_of(variable), value))
        })
        .collect();

    debug!(
        "propagation finished after {} revision(s); {} variable(s) solved",
        statistics.num_revisions, solved.len()
    );
    statistics.time_spent_propagating += start.elapsed();

    solved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::ConstraintDefinition;
    use crate::engine::variables::VariableKey;

    fn keys(ids: impl IntoIterator<Item = u32>) -> Vec<VariableKey> {
        ids.into_iter().map(VariableKey::new).collect()
    }

    #[test]
    fn a_single_loose_constraint_forces_nothing() {
        // exactly 1 of {a, b, c}: every value of every variable keeps support
        let mut component = Component::new(
            keys([0, 1, 2]),
            vec![ConstraintDefinition::exactly(keys([0, 1, 2]), 1)],
            keys([0, 1, 2]),
        )
        .expect("well-formed");
        let mut statistics = SolverStatistics::default();

        let solved = run_to_fixpoint(&mut component, &mut statistics);

        assert!(solved.is_empty());
        assert!(component.is_consistent());
        assert_eq!(6, component.total_candidates());
    }

    #[test]
    fn chained_constraints_propagate_to_a_full_solution() {
        // exactly 1 of {a, b} and exactly 0 of {b, c}: b and c must be false,
        // which forces a to be true through the first constraint.
        let mut component = Component::new(
            keys([0, 1, 2]),
            vec![
                ConstraintDefinition::exactly(keys([0, 1]), 1),
                ConstraintDefinition::exactly(keys([1, 2]), 0),
            ],
            keys([0, 1, 2]),
        )
        .expect("well-formed");
        let mut statistics = SolverStatistics::default();

        let solved = run_to_fixpoint(&mut component, &mut statistics);

        assert!(component.is_consistent());
        let mut solved = solved;
        solved.sort_by_key(|assignment| assignment.variable);
        assert_eq!(
            vec![
                Assignment::new(VariableKey::new(0), true),
                Assignment::new(VariableKey::new(1), false),
                Assignment::new(VariableKey::new(2), false),
            ],
            solved
        );
    }

    #[test]
    fn contradicting_constraints_poison_their_neighbourhood() {
        // exactly 1 of {a, b} and exactly 0 of {a, b} cannot both hold
        let mut component = Component::new(
            keys([0, 1]),
            vec![
                ConstraintDefinition::exactly(keys([0, 1]), 1),
                ConstraintDefinition::exactly(keys([0, 1]), 0),
            ],
            keys([0, 1]),
        )
        .expect("well-formed");
        let mut statistics = SolverStatistics::default();

        let _ = run_to_fixpoint(&mut component, &mut statistics);

        assert!(!component.is_consistent());
        assert_eq!(0, component.alive_tuple_count());
    }

    #[test]
    fn externally_narrowed_domains_are_respected() {
        // exactly 1 of {a, b} with a committed to false: b must be true
        let mut component = Component::new(
            keys([0, 1]),
            vec![ConstraintDefinition::exactly(keys([0, 1]), 1)],
            keys([0, 1]),
        )
        .expect("well-formed");
        component
            .narrow_domain(VariableKey::new(0), false)
            .expect("known variable");
        let mut statistics = SolverStatistics::default();

        let solved = run_to_fixpoint(&mut component, &mut statistics);

        assert!(component.is_consistent());
        assert!(solved.contains(&Assignment::new(VariableKey::new(1), true)));
    }

    #[test]
    fn revisions_are_bounded_by_shrink_events() {
        let mut component = Component::new(
            keys([0, 1, 2]),
            vec![
                ConstraintDefinition::exactly(keys([0, 1]), 1),
                ConstraintDefinition::exactly(keys([1, 2]), 0),
            ],
            keys([0, 1, 2]),
        )
        .expect("well-formed");
        let mut statistics = SolverStatistics::default();

        let _ = run_to_fixpoint(&mut component, &mut statistics);
        let revisions_after_first_pass = statistics.num_revisions;

        // a second pass over the already-consistent component revises each
        // constraint once and shrinks nothing
        let _ = run_to_fixpoint(&mut component, &mut statistics);
        assert_eq!(
            revisions_after_first_pass + 2,
            statistics.num_revisions
        );
    }
}
