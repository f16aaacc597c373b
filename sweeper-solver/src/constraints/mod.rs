//! The table-constraint model: constraints are explicit tables of valid
//! tuples, tightened during solving by toggling tuples dead and alive rather
//! than by re-deriving validity from arithmetic.

mod table_constraint;

pub use table_constraint::CellOrigin;
pub use table_constraint::ConstraintDefinition;
pub(crate) use table_constraint::TableConstraint;
pub(crate) use table_constraint::TableSource;
pub(crate) use table_constraint::TupleId;

use crate::containers::StorageKey;

/// The dense per-component index of a constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct ConstraintId {
    pub(crate) id: u32,
}

impl StorageKey for ConstraintId {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        ConstraintId { id: index as u32 }
    }
}
