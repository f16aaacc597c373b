use thiserror::Error;

use crate::containers::HashMap;
use crate::containers::HashSet;
use crate::containers::KeyedVec;
use crate::constraints::CellOrigin;
use crate::constraints::ConstraintDefinition;
use crate::constraints::ConstraintId;
use crate::constraints::TableConstraint;
use crate::constraints::TableSource;
use crate::engine::domains::BoolDomain;
use crate::engine::domains::DomainStore;
use crate::engine::variables::VariableId;
use crate::engine::variables::VariableKey;
use crate::sweeper_assert_eq_simple;

/// An error which is raised when a component is constructed from ill-formed
/// input. The solving engine itself assumes well-formed components; these are
/// the translator-facing checks.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ComponentError {
    #[error("variable {0} occurs more than once in the component")]
    DuplicateVariable(VariableKey),
    #[error("reference to a variable {0} which is not part of the component")]
    UnknownVariable(VariableKey),
    #[error("constraint scopes cannot be empty")]
    EmptyScope,
    #[error("a tuple of width {width} does not fit a scope of {scope} variables")]
    TupleWidthMismatch { width: usize, scope: usize },
    #[error("the assignment order has to mention every variable exactly once")]
    IncompleteOrder,
}

/// One independent subproblem: a maximal set of variables transitively
/// connected through shared constraints, together with its constraints,
/// domains, and a fixed assignment order for search.
///
/// A component is owned by the caller and persists across solver calls; the
/// engine has exclusive access for the duration of a call and leaves the
/// component either fully advanced (propagation commits its prunings, the
/// enumerator commits the backbone) or fully restored.
#[derive(Clone, Debug)]
pub struct Component {
    pub(crate) domains: DomainStore,
    pub(crate) constraints: Vec<TableConstraint>,
    /// For every variable, the constraints whose scope contains it, in
    /// constraint construction order.
    pub(crate) adjacency: KeyedVec<VariableId, Vec<ConstraintId>>,
    pub(crate) assignment_order: Vec<VariableId>,
    pub(crate) keys: KeyedVec<VariableId, VariableKey>,
    pub(crate) ids: HashMap<VariableKey, VariableId>,
}

impl Component {
    /// Creates a component from external variable keys, constraint
    /// definitions, and the assignment order the search will follow. All
    /// domains start as `{false, true}`; use [`Component::narrow_domain`] to
    /// apply externally committed knowledge.
    pub fn new(
        variables: Vec<VariableKey>,
        constraints: Vec<ConstraintDefinition>,
        assignment_order: Vec<VariableKey>,
    ) -> Result<Self, ComponentError> {
        let mut domains = DomainStore::default();
        let mut keys: KeyedVec<VariableId, VariableKey> = KeyedVec::default();
        let mut ids: HashMap<VariableKey, VariableId> = HashMap::default();

        for &key in variables.iter() {
            if ids.contains_key(&key) {
                return Err(ComponentError::DuplicateVariable(key));
            }
            let id = domains.new_variable(BoolDomain::both());
            let key_slot = keys.push(key);
            sweeper_assert_eq_simple!(id, key_slot);
            let _ = ids.insert(key, id);
        }

        let mut adjacency: KeyedVec<VariableId, Vec<ConstraintId>> = KeyedVec::default();
        for _ in 0..variables.len() {
            let _ = adjacency.push(Vec::new());
        }

        let mut resolved: Vec<TableConstraint> = Vec::with_capacity(constraints.len());
        for definition in constraints {
            if definition.scope.is_empty() {
                return Err(ComponentError::EmptyScope);
            }

            let scope = definition
                .scope
                .iter()
                .map(|key| {
                    ids.get(key)
                        .copied()
                        .ok_or(ComponentError::UnknownVariable(*key))
                })
                .collect::<Result<Box<[VariableId]>, _>>()?;

            let constraint = match definition.table {
                TableSource::Exactly(target) => {
                    TableConstraint::exactly(scope, target, definition.origin)
                }
                TableSource::Tuples(tuples) => {
                    if let Some(tuple) = tuples.iter().find(|tuple| tuple.len() != scope.len()) {
                        return Err(ComponentError::TupleWidthMismatch {
                            width: tuple.len(),
                            scope: scope.len(),
                        });
                    }
                    TableConstraint::new(scope, tuples, definition.origin)
                }
            };

            let constraint_id = ConstraintId {
                id: resolved.len() as u32,
            };
            for &variable in constraint.scope().iter() {
                adjacency[variable].push(constraint_id);
            }
            resolved.push(constraint);
        }

        let order = assignment_order
            .iter()
            .map(|key| {
                ids.get(key)
                    .copied()
                    .ok_or(ComponentError::UnknownVariable(*key))
            })
            .collect::<Result<Vec<VariableId>, _>>()?;
        let distinct: HashSet<VariableKey> = assignment_order.iter().copied().collect();
        if order.len() != variables.len() || distinct.len() != variables.len() {
            return Err(ComponentError::IncompleteOrder);
        }

        Ok(Component {
            domains,
            constraints: resolved,
            adjacency,
            assignment_order: order,
            keys,
            ids,
        })
    }

    /// Commits externally established knowledge by narrowing a variable's
    /// domain to the given value. Narrowing to a value which is no longer in
    /// the domain empties it, which the next propagation pass will surface as
    /// an inconsistency.
    pub fn narrow_domain(&mut self, variable: VariableKey, value: bool) -> Result<(), ComponentError> {
        let id = self
            .ids
            .get(&variable)
            .copied()
            .ok_or(ComponentError::UnknownVariable(variable))?;
        let narrowed = self.domains.domain(id).intersect(BoolDomain::singleton(value));
        self.domains.shrink_to(id, narrowed);
        Ok(())
    }

    /// Reorders the assignment order by ascending current domain size. Useful
    /// before search: variables which are already pinned down are labelled
    /// first. The relative order of equal-sized domains is kept.
    pub fn order_by_ascending_domain(&mut self) {
        let domains = &self.domains;
        self.assignment_order
            .sort_by_key(|&variable| domains.domain(variable).size());
    }

    /// True unless some constraint has ended up fully dead, which proves the
    /// component unsatisfiable. This is the error-surface flag the caller is
    /// expected to check after propagation.
    pub fn is_consistent(&self) -> bool {
        self.constraints
            .iter()
            .all(|constraint| constraint.is_satisfiable())
    }

    pub fn num_variables(&self) -> usize {
        self.domains.num_variables()
    }

    pub fn variables(&self) -> impl Iterator<Item = VariableKey> + '_ {
        self.keys.iter().copied()
    }

    /// The current candidate set of the variable, or [`None`] for a key which
    /// is not part of this component.
    pub fn domain_of(&self, variable: VariableKey) -> Option<BoolDomain> {
        self.ids.get(&variable).map(|&id| self.domains.domain(id))
    }

    /// The total number of candidate values over all domains. Advisory; used
    /// to observe the restore-on-failure discipline from the outside.
    pub fn total_candidates(&self) -> u64 {
        self.domains.total_candidates()
    }

    /// Revives every tuple of every constraint, undoing all committed kills
    /// including a whole-neighbourhood invalidation. The next propagation
    /// pass re-derives the kills implied by the current domains.
    pub fn revive_all_tuples(&mut self) {
        for constraint in self.constraints.iter_mut() {
            constraint.revive_all();
        }
    }

    /// The origins of all constraints which have ended up fully dead, for the
    /// caller to present (e.g. by highlighting the offending clue cells).
    pub fn dead_constraint_origins(&self) -> impl Iterator<Item = CellOrigin> + '_ {
        self.constraints
            .iter()
            .filter(|constraint| !constraint.is_satisfiable())
            .filter_map(|constraint| constraint.origin())
    }

    /// The total number of alive tuples over all constraint tables. Advisory,
    /// like [`Component::total_candidates`].
    pub fn alive_tuple_count(&self) -> usize {
        self.constraints
            .iter()
            .map(|constraint| constraint.alive_count())
            .sum()
    }

    pub(crate) fn key_of(&self, variable: VariableId) -> VariableKey {
        self.keys[variable]
    }
}
