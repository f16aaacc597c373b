mod outputs;
mod solver;

pub use outputs::EnumerationOutcome;
pub use outputs::PropagationOutcome;
pub use solver::Solver;

pub use crate::basic_types::Assignment;
pub use crate::basic_types::Solution;
pub use crate::constraints::CellOrigin;
pub use crate::constraints::ConstraintDefinition;
pub use crate::engine::component::Component;
pub use crate::engine::component::ComponentError;
pub use crate::engine::domains::BoolDomain;
pub use crate::engine::search::SearchStrategy;
pub use crate::engine::solver_statistics::SolverStatistics;
pub use crate::engine::variables::VariableKey;
