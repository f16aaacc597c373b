use std::fmt::Display;
use std::fmt::Formatter;

use crate::containers::StorageKey;

/// The caller's integer key for one unknown, e.g. the flattened index of a
/// grid cell. Keys are externally meaningful and may be sparse; all inputs and
/// outputs of the engine use them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableKey {
    pub id: u32,
}

impl VariableKey {
    pub fn new(id: u32) -> Self {
        VariableKey { id }
    }
}

impl Display for VariableKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.id)
    }
}

/// The dense per-component index of a variable. Domains, scopes, and the
/// assignment order address variables through this id; the component owns the
/// mapping back to [`VariableKey`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct VariableId {
    pub(crate) id: u32,
}

impl StorageKey for VariableId {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        VariableId { id: index as u32 }
    }
}

impl Display for VariableId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.id)
    }
}
