use crate::basic_types::Assignment;
use crate::basic_types::Solution;

/// The result of one one-shot propagation pass over a component.
#[derive(Clone, Debug)]
pub struct PropagationOutcome {
    /// The variables which are proven to have a single possible value, for
    /// the caller to commit into its own model.
    pub solved: Vec<Assignment>,
    /// False when some constraint ended up fully dead, proving the component
    /// unsatisfiable; the caller is expected to surface this as an error
    /// state.
    pub consistent: bool,
}

/// The result of enumerating all solutions of a component.
#[derive(Clone, Debug)]
pub struct EnumerationOutcome {
    /// The variable/value pairs which are constant across every solution.
    pub backbone: Vec<Assignment>,
    /// Every discovered solution, in discovery order.
    pub solutions: Vec<Solution>,
    /// False when the search exhausted its space without finding a complete
    /// assignment.
    pub satisfiable: bool,
}

impl EnumerationOutcome {
    pub fn solution_count(&self) -> usize {
        self.solutions.len()
    }
}
