//! Exhaustive cross-checks of the search driver against brute-force
//! enumeration, for components small enough to enumerate all assignments.

use sweeper_solver::Component;
use sweeper_solver::ConstraintDefinition;
use sweeper_solver::SearchStrategy;
use sweeper_solver::Solver;
use sweeper_solver::VariableKey;

/// A test component described as minesweeper clues: per clue, the scope (as
/// raw variable ids) and how many of the scope variables are mines.
struct Case {
    name: &'static str,
    num_variables: u32,
    clues: &'static [(&'static [u32], u32)],
}

const CASES: &[Case] = &[
    Case {
        name: "single clue",
        num_variables: 3,
        clues: &[(&[0, 1, 2], 1)],
    },
    Case {
        name: "chained pair",
        num_variables: 3,
        clues: &[(&[0, 1], 1), (&[1, 2], 0)],
    },
    Case {
        name: "1-2-1 row",
        num_variables: 6,
        clues: &[(&[0, 1, 2], 1), (&[1, 2, 3, 4], 2), (&[3, 4, 5], 1)],
    },
    Case {
        name: "overlapping corner",
        num_variables: 5,
        clues: &[(&[0, 1], 1), (&[0, 1, 2, 3], 2), (&[2, 3, 4], 1), (&[3, 4], 1)],
    },
    Case {
        name: "unsatisfiable pair",
        num_variables: 2,
        clues: &[(&[0, 1], 1), (&[0, 1], 2)],
    },
    Case {
        name: "wide clue",
        num_variables: 9,
        clues: &[(&[0, 1, 2, 3, 4, 5, 6, 7, 8], 3), (&[0, 1, 2], 1), (&[3, 4, 5], 1)],
    },
];

fn keys(ids: impl IntoIterator<Item = u32>) -> Vec<VariableKey> {
    ids.into_iter().map(VariableKey::new).collect()
}

fn strategies() -> [SearchStrategy; 3] {
    [
        SearchStrategy::BackCheck,
        SearchStrategy::ForwardCheck,
        SearchStrategy::MaintainArcConsistency,
    ]
}

fn component_for(case: &Case) -> Component {
    let variables = keys(0..case.num_variables);
    let constraints = case
        .clues
        .iter()
        .map(|&(scope, target)| {
            ConstraintDefinition::exactly(keys(scope.iter().copied()), target)
        })
        .collect();

    Component::new(variables, constraints, keys(0..case.num_variables))
        .expect("cases are well-formed")
}

/// All satisfying assignments, indexed by variable id.
fn brute_force(case: &Case) -> Vec<Vec<bool>> {
    let num_variables = case.num_variables as usize;
    (0u32..1 << num_variables)
        .map(|bits| {
            (0..num_variables)
                .map(|variable| bits & (1 << variable) != 0)
                .collect::<Vec<bool>>()
        })
        .filter(|assignment| {
            case.clues.iter().all(|&(scope, target)| {
                let mines = scope
                    .iter()
                    .filter(|&&variable| assignment[variable as usize])
                    .count();
                mines as u32 == target
            })
        })
        .collect()
}

/// The solutions found by the search, in the same indexed form as
/// [`brute_force`]. The assignment order is the identity, so position i of a
/// solution is variable i.
fn search_solutions(case: &Case, strategy: SearchStrategy) -> (Vec<Vec<bool>>, Vec<Option<bool>>) {
    let mut component = component_for(case);
    let mut solver = Solver::default();

    let enumeration = solver.enumerate(&mut component, strategy);

    let solutions = enumeration
        .solutions
        .iter()
        .map(|solution| {
            solution
                .assignments()
                .iter()
                .map(|assignment| assignment.value)
                .collect()
        })
        .collect();

    let mut backbone = vec![None; case.num_variables as usize];
    for assignment in enumeration.backbone.iter() {
        backbone[assignment.variable.id as usize] = Some(assignment.value);
    }

    (solutions, backbone)
}

#[test]
fn every_strategy_finds_exactly_the_brute_force_solutions() {
    for case in CASES {
        let mut expected = brute_force(case);
        expected.sort();

        for strategy in strategies() {
            let (mut found, _) = search_solutions(case, strategy);
            found.sort();

            assert_eq!(
                expected, found,
                "case {:?} with strategy {strategy:?}",
                case.name
            );
        }
    }
}

#[test]
fn the_backbone_is_the_intersection_of_all_solutions() {
    for case in CASES {
        let solutions = brute_force(case);
        let expected: Vec<Option<bool>> = (0..case.num_variables as usize)
            .map(|variable| {
                let first = solutions.first()?;
                solutions
                    .iter()
                    .all(|solution| solution[variable] == first[variable])
                    .then(|| first[variable])
            })
            .collect();

        for strategy in strategies() {
            let (_, backbone) = search_solutions(case, strategy);
            assert_eq!(
                expected, backbone,
                "case {:?} with strategy {strategy:?}",
                case.name
            );
        }
    }
}

/// Everything the propagation pass reports solved must hold in every solution
/// of the component.
#[test]
fn propagation_is_sound() {
    for case in CASES {
        let solutions = brute_force(case);
        let mut component = component_for(case);
        let mut solver = Solver::default();

        let propagation = solver.propagate(&mut component);
        if !propagation.consistent {
            assert!(
                solutions.is_empty(),
                "case {:?} was declared inconsistent but has solutions",
                case.name
            );
            continue;
        }

        for assignment in propagation.solved.iter() {
            assert!(
                solutions
                    .iter()
                    .all(|solution| solution[assignment.variable.id as usize] == assignment.value),
                "case {:?} solved {} incorrectly",
                case.name,
                assignment.variable
            );
        }
    }
}

/// A search call leaves the component at its pre-call baseline, augmented only
/// by the backbone values it proved.
#[test]
fn enumeration_restores_the_component() {
    for case in CASES {
        for strategy in strategies() {
            let mut component = component_for(case);
            let mut solver = Solver::default();

            let candidates_before = component.total_candidates();
            let alive_before = component.alive_tuple_count();
            let widened: u64 = (0..case.num_variables)
                .filter(|&variable| {
                    component
                        .domain_of(VariableKey::new(variable))
                        .is_some_and(|domain| domain.size() > 1)
                })
                .count() as u64;

            let enumeration = solver.enumerate(&mut component, strategy);

            assert_eq!(
                alive_before,
                component.alive_tuple_count(),
                "case {:?} with strategy {strategy:?}",
                case.name
            );

            let committed = enumeration.backbone.len() as u64;
            assert!(committed <= widened);
            assert_eq!(
                candidates_before - committed,
                component.total_candidates(),
                "case {:?} with strategy {strategy:?}",
                case.name
            );
        }
    }
}

/// Enumerating twice in a row yields identical results: no state leaks from
/// the first call into the second.
#[test]
fn enumeration_is_repeatable() {
    for case in CASES {
        let mut component = component_for(case);
        let mut solver = Solver::default();

        let first = solver.enumerate(&mut component, SearchStrategy::MaintainArcConsistency);
        let second = solver.enumerate(&mut component, SearchStrategy::MaintainArcConsistency);

        assert_eq!(first.solutions, second.solutions, "case {:?}", case.name);
        assert_eq!(first.backbone, second.backbone, "case {:?}", case.name);
    }
}
