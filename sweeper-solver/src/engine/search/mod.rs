//! The backtracking search driver.
//!
//! Search alternates between two states. LABEL tentatively assigns the next
//! variable in the fixed assignment order its first remaining candidate and
//! runs the active consistency strategy; UNLABEL takes the most recent
//! decision back, restores every reduction recorded at that depth, and refutes
//! the undone value. Every domain shrink and tuple kill performed during
//! search is recorded on a depth-tagged [`Trail`], so that one level pop is
//! exactly one decision's worth of undo.
//!
//! Search never touches the component's stored domains; it works on a scratch
//! copy. Constraint tables are shared with the component and every kill is
//! undone by the time a search run has finished (see
//! [`solution_iterator::enumerate_component`]).

pub(crate) mod solution_iterator;

use std::collections::VecDeque;

use crate::basic_types::Trail;
use crate::constraints::ConstraintId;
use crate::constraints::TableConstraint;
use crate::constraints::TupleId;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;
use crate::engine::domains::DomainStore;
use crate::engine::solver_statistics::SolverStatistics;
use crate::engine::variables::VariableId;
use crate::sweeper_assert_eq_simple;
use crate::sweeper_assert_simple;

/// The consistency strategy the search driver runs after every tentative
/// assignment. The surrounding state machine and undo discipline are the same
/// for all three; only the amount of look-ahead differs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SearchStrategy {
    /// Validate the assignment against every constraint whose scope is fully
    /// assigned. No look-ahead, no reductions.
    BackCheck,
    /// Revise the constraints of the just-assigned variable once, pruning the
    /// domains of future variables. No fixpoint.
    ForwardCheck,
    /// Maintain arc consistency over the future part of the component: revise
    /// to a fixpoint, re-enqueueing the constraints of every future variable
    /// whose domain shrank.
    MaintainArcConsistency,
}

/// One recorded, undoable change to the shared solving state.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Reduction {
    /// `value` was removed from the domain of `variable`.
    DomainValue { variable: VariableId, value: bool },
    /// `tuple` of `constraint` was killed.
    KilledTuple {
        constraint: ConstraintId,
        tuple: TupleId,
    },
}

pub(crate) struct SearchEngine<'a> {
    constraints: &'a mut Vec<TableConstraint>,
    adjacency: &'a KeyedVec<VariableId, Vec<ConstraintId>>,
    order: &'a [VariableId],
    /// Position of every variable in the assignment order.
    order_index: KeyedVec<VariableId, usize>,
    /// Scratch domains; the component's stored domains are never touched.
    domains: DomainStore,
    stack: Vec<(VariableId, bool)>,
    trail: Trail<Reduction>,
    in_queue: Vec<bool>,
    strategy: SearchStrategy,
}

impl<'a> SearchEngine<'a> {
    pub(crate) fn new(
        constraints: &'a mut Vec<TableConstraint>,
        adjacency: &'a KeyedVec<VariableId, Vec<ConstraintId>>,
        order: &'a [VariableId],
        domains: DomainStore,
        strategy: SearchStrategy,
    ) -> Self {
        let mut order_index: KeyedVec<VariableId, usize> = KeyedVec::default();
        for _ in 0..domains.num_variables() {
            let _ = order_index.push(0);
        }
        for (position, &variable) in order.iter().enumerate() {
            order_index[variable] = position;
        }

        let num_constraints = constraints.len();
        SearchEngine {
            constraints,
            adjacency,
            order,
            order_index,
            domains,
            stack: Vec::new(),
            trail: Trail::default(),
            in_queue: vec![false; num_constraints],
            strategy,
        }
    }

    /// Searches the subspace below the current stack until the assignment is
    /// complete (true) or the space is exhausted (false).
    pub(crate) fn search(&mut self, statistics: &mut SolverStatistics) -> bool {
        let mut consistent = true;
        let mut depth = self.stack.len();

        while depth < self.order.len() {
            if consistent {
                let variable = self.order[depth];
                consistent = self.label(variable, statistics);
                statistics.num_nodes_visited += 1;
                if consistent {
                    depth += 1;
                }
            } else {
                if self.stack.is_empty() {
                    // exhausted the whole space without a complete assignment
                    return false;
                }
                consistent = self.unlabel();
                statistics.num_backtracks += 1;
                depth -= 1;
            }
        }

        sweeper_assert_eq_simple!(depth, self.stack.len());
        true
    }

    /// Tries the candidates of `variable` in order until one survives the
    /// consistency check. Failed candidates are refuted: removed from the
    /// domain for the remainder of this branch, recorded at the parent depth.
    fn label(&mut self, variable: VariableId, statistics: &mut SolverStatistics) -> bool {
        while let Some(value) = self.domains.domain(variable).first() {
            self.stack.push((variable, value));
            self.trail.new_level();
            self.narrow_to(variable, value);

            let consistent = match self.strategy {
                SearchStrategy::BackCheck => self.back_check(variable),
                SearchStrategy::ForwardCheck => self.forward_check(variable, statistics),
                SearchStrategy::MaintainArcConsistency => {
                    self.propagate_incremental(variable, statistics)
                }
            };
            if consistent {
                return true;
            }

            // roll the failed attempt back in full before refuting the value,
            // so that no partial pruning of the attempt is ever observable
            self.undo_top_level();
            let _ = self.stack.pop();
            self.refute(variable, value);
        }

        false
    }

    /// Takes back the most recent decision: restores the reductions recorded
    /// at its depth and refutes the undone value at the parent depth. Returns
    /// whether the variable has candidates left to retry at the same depth.
    fn unlabel(&mut self) -> bool {
        sweeper_assert_simple!(!self.stack.is_empty());
        let (variable, value) = self.stack.pop().expect("unlabel requires a decision");

        self.undo_top_level();
        self.refute(variable, value);

        !self.domains.domain(variable).is_empty()
    }

    /// Narrows the domain of the just-assigned variable to the chosen value,
    /// recording the removals at the current depth.
    fn narrow_to(&mut self, variable: VariableId, value: bool) {
        let domain = self.domains.domain(variable);
        sweeper_assert_simple!(domain.contains(value));

        for other in domain.iter().filter(|&other| other != value) {
            self.domains.remove(variable, other);
            self.trail.push(Reduction::DomainValue {
                variable,
                value: other,
            });
        }
    }

    /// Removes a refuted value from the domain so it is not retried on this
    /// branch. The removal belongs to the parent depth and is restored when
    /// that depth unwinds.
    fn refute(&mut self, variable: VariableId, value: bool) {
        self.domains.remove(variable, value);
        self.trail.push(Reduction::DomainValue { variable, value });
    }

    fn undo_top_level(&mut self) {
        for reduction in self.trail.pop_level() {
            match reduction {
                Reduction::DomainValue { variable, value } => {
                    self.domains.restore(variable, value);
                }
                Reduction::KilledTuple { constraint, tuple } => {
                    self.constraints[constraint.index()].revive(tuple);
                }
            }
        }
    }

    /// A variable is future when its position in the assignment order lies
    /// beyond the current stack, i.e. it is neither assigned nor the variable
    /// currently being labelled.
    fn is_future(&self, variable: VariableId) -> bool {
        self.order_index[variable] >= self.stack.len()
    }

    /// Plain validity check: every constraint of the variable whose scope is
    /// fully assigned must still have an alive tuple which agrees.
    fn back_check(&self, variable: VariableId) -> bool {
        self.adjacency[variable].iter().all(|&constraint_id| {
            let constraint = &self.constraints[constraint_id.index()];
            let fully_assigned = constraint
                .scope()
                .iter()
                .all(|&scoped| self.domains.domain(scoped).size() == 1);
            !fully_assigned || constraint.has_support(&self.domains)
        })
    }

    /// One revision pass over the constraints of the just-assigned variable,
    /// pruning future domains. Reports failure on any wipe-out.
    fn forward_check(
        &mut self,
        variable: VariableId,
        statistics: &mut SolverStatistics,
    ) -> bool {
        let mut no_queue = VecDeque::new();
        for position in 0..self.adjacency[variable].len() {
            let constraint_id = self.adjacency[variable][position];
            if !self.revise(constraint_id, statistics) {
                return false;
            }
            if !self.shrink_future_domains(constraint_id, false, &mut no_queue) {
                return false;
            }
        }

        true
    }

    /// Maintains arc consistency over the future variables and constraints:
    /// like forward checking, but shrink events re-enqueue the affected
    /// constraints until a fixpoint is reached.
    fn propagate_incremental(
        &mut self,
        variable: VariableId,
        statistics: &mut SolverStatistics,
    ) -> bool {
        self.in_queue.iter_mut().for_each(|flag| *flag = false);
        let mut queue: VecDeque<ConstraintId> = VecDeque::new();
        for &constraint_id in self.adjacency[variable].iter() {
            queue.push_back(constraint_id);
            self.in_queue[constraint_id.index()] = true;
        }

        while let Some(constraint_id) = queue.pop_front() {
            self.in_queue[constraint_id.index()] = false;
            if !self.revise(constraint_id, statistics) {
                return false;
            }
            if !self.shrink_future_domains(constraint_id, true, &mut queue) {
                return false;
            }
        }

        true
    }

    /// Kills the tuples of the constraint which lost their support, recording
    /// them on the trail. Returns whether the constraint is still satisfiable;
    /// a wipe-out counts as contradiction even when the constraint touches
    /// only past variables.
    fn revise(&mut self, constraint_id: ConstraintId, statistics: &mut SolverStatistics) -> bool {
        let killed = self.constraints[constraint_id.index()].kill_unsupported(&self.domains);
        statistics.num_tuples_killed += killed.len() as u64;
        for tuple in killed {
            self.trail.push(Reduction::KilledTuple {
                constraint: constraint_id,
                tuple,
            });
        }

        self.constraints[constraint_id.index()].is_satisfiable()
    }

    /// Intersects the domains of the constraint's future variables with its
    /// supported sets, recording every removal. With `enqueue`, a shrink
    /// re-enqueues the other constraints of the shrunken variable.
    fn shrink_future_domains(
        &mut self,
        constraint_id: ConstraintId,
        enqueue: bool,
        queue: &mut VecDeque<ConstraintId>,
    ) -> bool {
        let supported = self.constraints[constraint_id.index()].supported_domains();
        let scope = self.constraints[constraint_id.index()].scope().to_vec();

        for (position, &scoped) in scope.iter().enumerate() {
            if !self.is_future(scoped) {
                continue;
            }

            let stored = self.domains.domain(scoped);
            let narrowed = stored.intersect(supported[position]);
            if narrowed == stored {
                continue;
            }

            for value in stored.iter().filter(|&value| !narrowed.contains(value)) {
                self.domains.remove(scoped, value);
                self.trail.push(Reduction::DomainValue {
                    variable: scoped,
                    value,
                });
            }
            if narrowed.is_empty() {
                return false;
            }

            if enqueue {
                for &other in self.adjacency[scoped].iter() {
                    if other != constraint_id && !self.in_queue[other.index()] {
                        queue.push_back(other);
                        self.in_queue[other.index()] = true;
                    }
                }
            }
        }

        true
    }
}
