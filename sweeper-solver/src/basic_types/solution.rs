use crate::engine::variables::VariableKey;

/// A single variable/value pair: either one decision inside a solution, or one
/// value which has been proven forced (by propagation or by the backbone).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Assignment {
    pub variable: VariableKey,
    pub value: bool,
}

impl Assignment {
    pub fn new(variable: VariableKey, value: bool) -> Self {
        Assignment { variable, value }
    }
}

/// A complete, constraint-satisfying assignment for all variables of a
/// component, listed in the component's assignment order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution {
    assignments: Vec<Assignment>,
}

impl Solution {
    pub(crate) fn new(assignments: Vec<Assignment>) -> Self {
        Solution { assignments }
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    /// The value this solution assigns to the given variable, or [`None`] if
    /// the variable is not part of the component the solution belongs to.
    pub fn value_of(&self, variable: VariableKey) -> Option<bool> {
        self.assignments
            .iter()
            .find(|assignment| assignment.variable == variable)
            .map(|assignment| assignment.value)
    }

    pub fn num_variables(&self) -> usize {
        self.assignments.len()
    }
}
