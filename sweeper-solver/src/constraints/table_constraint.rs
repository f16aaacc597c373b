use itertools::Itertools;

use crate::engine::domains::BoolDomain;
use crate::engine::domains::DomainStore;
use crate::engine::variables::VariableId;
use crate::engine::variables::VariableKey;
use crate::sweeper_assert_simple;

/// The grid cell a constraint originates from (the revealed clue cell).
///
/// Carried for the caller's presentation only; the engine never interprets it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellOrigin {
    pub row: u32,
    pub col: u32,
}

/// A caller-facing description of one table constraint, in external variable
/// keys. [`crate::Component`] resolves definitions into their internal dense
/// representation at construction time.
#[derive(Clone, Debug)]
pub struct ConstraintDefinition {
    pub(crate) scope: Vec<VariableKey>,
    pub(crate) table: TableSource,
    pub(crate) origin: Option<CellOrigin>,
}

#[derive(Clone, Debug)]
pub(crate) enum TableSource {
    /// All tuples over the scope whose number of `true` values equals the
    /// target. This is the minesweeper clue contract: exactly `target` of the
    /// scope variables are mines, net of any externally committed cells.
    Exactly(u32),
    /// A pre-built tuple table.
    Tuples(Vec<Vec<bool>>),
}

impl ConstraintDefinition {
    /// The constraint "exactly `target` of the scope variables are true".
    pub fn exactly(scope: Vec<VariableKey>, target: u32) -> Self {
        ConstraintDefinition {
            scope,
            table: TableSource::Exactly(target),
            origin: None,
        }
    }

    /// A constraint with an explicitly supplied valid-tuple table. Every tuple
    /// must have the same width as the scope.
    pub fn from_tuples(scope: Vec<VariableKey>, tuples: Vec<Vec<bool>>) -> Self {
        ConstraintDefinition {
            scope,
            table: TableSource::Tuples(tuples),
            origin: None,
        }
    }

    pub fn with_origin(mut self, row: u32, col: u32) -> Self {
        self.origin = Some(CellOrigin { row, col });
        self
    }

    pub fn scope(&self) -> &[VariableKey] {
        &self.scope
    }
}

#[derive(Clone, Debug)]
struct TableTuple {
    values: Box<[bool]>,
    is_alive: bool,
}

/// The index of a tuple within its constraint. Tuples are created once, at
/// constraint construction, and only ever toggled between alive and dead; ids
/// therefore stay valid for the constraint's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct TupleId {
    pub(crate) id: u32,
}

/// A table constraint over an ordered scope of boolean variables.
///
/// The alive tuples are the value combinations still considered valid under
/// the current domains. Solving kills tuples (and the search engine later
/// revives them); the table itself is immutable.
#[derive(Clone, Debug)]
pub(crate) struct TableConstraint {
    scope: Box<[VariableId]>,
    tuples: Vec<TableTuple>,
    num_alive: usize,
    origin: Option<CellOrigin>,
}

impl TableConstraint {
    pub(crate) fn new(
        scope: Box<[VariableId]>,
        tuples: Vec<Vec<bool>>,
        origin: Option<CellOrigin>,
    ) -> Self {
        let tuples: Vec<TableTuple> = tuples
            .into_iter()
            .map(|values| TableTuple {
                values: values.into_boxed_slice(),
                is_alive: true,
            })
            .collect();
        let num_alive = tuples.len();

        TableConstraint {
            scope,
            tuples,
            num_alive,
            origin,
        }
    }

    /// Builds the table of all value combinations over the scope with exactly
    /// `target` variables true. A target larger than the scope produces an
    /// empty table, i.e. an unsatisfiable constraint.
    pub(crate) fn exactly(
        scope: Box<[VariableId]>,
        target: u32,
        origin: Option<CellOrigin>,
    ) -> Self {
        let tuples = scope
            .iter()
            .map(|_| [false, true])
            .multi_cartesian_product()
            .filter(|values| values.iter().filter(|&&value| value).count() as u32 == target)
            .collect();

        Self::new(scope, tuples, origin)
    }

    pub(crate) fn scope(&self) -> &[VariableId] {
        &self.scope
    }

    pub(crate) fn origin(&self) -> Option<CellOrigin> {
        self.origin
    }

    pub(crate) fn alive_count(&self) -> usize {
        self.num_alive
    }

    /// Whether any valid tuple is left. A dead constraint signals that its
    /// component is unsatisfiable under the current domains.
    pub(crate) fn is_satisfiable(&self) -> bool {
        self.num_alive > 0
    }

    /// Kills every alive tuple that assigns some scope variable a value no
    /// longer in that variable's domain, and returns the ids of the newly
    /// killed tuples. Idempotent under unchanged domains.
    pub(crate) fn kill_unsupported(&mut self, domains: &DomainStore) -> Vec<TupleId> {
        let mut killed = Vec::new();

        for (index, tuple) in self.tuples.iter_mut().enumerate() {
            if !tuple.is_alive {
                continue;
            }

            let supported = self
                .scope
                .iter()
                .zip(tuple.values.iter())
                .all(|(&variable, &value)| domains.domain(variable).contains(value));

            if !supported {
                tuple.is_alive = false;
                self.num_alive -= 1;
                killed.push(TupleId { id: index as u32 });
            }
        }

        killed
    }

    /// DEAD → ALIVE. Reviving an unknown id, or a tuple which is already
    /// alive, means the reduction bookkeeping is broken and is a defect.
    pub(crate) fn revive(&mut self, id: TupleId) {
        sweeper_assert_simple!((id.id as usize) < self.tuples.len());
        let tuple = &mut self.tuples[id.id as usize];
        sweeper_assert_simple!(!tuple.is_alive);

        tuple.is_alive = true;
        self.num_alive += 1;
    }

    /// Whole-constraint invalidation: the "this neighbourhood is proven wrong"
    /// signal of the one-shot propagation pass.
    pub(crate) fn kill_all(&mut self) {
        for tuple in self.tuples.iter_mut() {
            tuple.is_alive = false;
        }
        self.num_alive = 0;
    }

    pub(crate) fn revive_all(&mut self) {
        for tuple in self.tuples.iter_mut() {
            tuple.is_alive = true;
        }
        self.num_alive = self.tuples.len();
    }

    /// For each scope variable, the set of values occurring in at least one
    /// alive tuple, aligned with the scope. All sets are empty when the
    /// constraint is dead.
    pub(crate) fn supported_domains(&self) -> Vec<BoolDomain> {
        let mut supported = vec![BoolDomain::empty(); self.scope.len()];

        for tuple in self.tuples.iter().filter(|tuple| tuple.is_alive) {
            for (position, &value) in tuple.values.iter().enumerate() {
                let _ = supported[position].insert(value);
            }
        }

        supported
    }

    /// Whether some alive tuple is consistent with the given domains. This is
    /// the read-only companion of [`Self::kill_unsupported`], used by the
    /// back-checking strategy on fully assigned constraints.
    pub(crate) fn has_support(&self, domains: &DomainStore) -> bool {
        self.tuples.iter().filter(|tuple| tuple.is_alive).any(|tuple| {
            self.scope
                .iter()
                .zip(tuple.values.iter())
                .all(|(&variable, &value)| domains.domain(variable).contains(value))
        })
    }

    #[cfg(test)]
    pub(crate) fn alive_tuples(&self) -> impl Iterator<Item = &[bool]> {
        self.tuples
            .iter()
            .filter(|tuple| tuple.is_alive)
            .map(|tuple| &*tuple.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::StorageKey;

    fn scope_of(len: usize) -> Box<[VariableId]> {
        (0..len).map(VariableId::create_from_index).collect()
    }

    fn store_of(len: usize) -> DomainStore {
        let mut store = DomainStore::default();
        for _ in 0..len {
            let _ = store.new_variable(BoolDomain::both());
        }
        store
    }

    #[test]
    fn exactly_one_of_three_has_the_three_unit_tuples() {
        let constraint = TableConstraint::exactly(scope_of(3), 1, None);

        let tuples: Vec<&[bool]> = constraint.alive_tuples().collect();
        assert_eq!(3, tuples.len());
        assert!(tuples.contains(&&[true, false, false][..]));
        assert!(tuples.contains(&&[false, true, false][..]));
        assert!(tuples.contains(&&[false, false, true][..]));
    }

    #[test]
    fn impossible_target_gives_a_dead_table() {
        let constraint = TableConstraint::exactly(scope_of(2), 3, None);
        assert!(!constraint.is_satisfiable());
    }

    #[test]
    fn kill_unsupported_is_idempotent() {
        let mut constraint = TableConstraint::exactly(scope_of(2), 1, None);
        let mut store = store_of(2);
        store.remove(VariableId::create_from_index(0), true);

        let killed = constraint.kill_unsupported(&store);
        assert_eq!(1, killed.len());
        assert_eq!(1, constraint.alive_count());

        let killed_again = constraint.kill_unsupported(&store);
        assert!(killed_again.is_empty());
        assert_eq!(1, constraint.alive_count());
    }

    #[test]
    fn supported_domains_reflect_the_alive_tuples() {
        let mut constraint = TableConstraint::exactly(scope_of(2), 1, None);
        let mut store = store_of(2);

        // with both tuples alive, both variables support both values
        assert_eq!(
            vec![BoolDomain::both(), BoolDomain::both()],
            constraint.supported_domains()
        );

        // forcing x0 = false leaves only (false, true)
        store.remove(VariableId::create_from_index(0), true);
        let _ = constraint.kill_unsupported(&store);
        assert_eq!(
            vec![BoolDomain::singleton(false), BoolDomain::singleton(true)],
            constraint.supported_domains()
        );
    }

    #[test]
    fn revive_undoes_a_kill() {
        let mut constraint = TableConstraint::exactly(scope_of(2), 1, None);
        let mut store = store_of(2);
        store.remove(VariableId::create_from_index(0), true);

        let killed = constraint.kill_unsupported(&store);
        for id in killed {
            constraint.revive(id);
        }
        assert_eq!(2, constraint.alive_count());
    }

    #[test]
    #[should_panic]
    fn reviving_an_alive_tuple_is_a_defect() {
        let mut constraint = TableConstraint::exactly(scope_of(2), 1, None);
        constraint.revive(TupleId { id: 0 });
    }

    #[test]
    fn kill_all_then_revive_all_round_trips() {
        let mut constraint = TableConstraint::exactly(scope_of(3), 1, None);
        constraint.kill_all();
        assert!(!constraint.is_satisfiable());
        assert_eq!(
            vec![BoolDomain::empty(); 3],
            constraint.supported_domains()
        );

        constraint.revive_all();
        assert_eq!(3, constraint.alive_count());
    }
}
