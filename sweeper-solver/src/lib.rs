//! # Sweeper
//! Sweeper is a constraint engine which determines, from a partially known
//! boolean assignment problem, which unknowns are logically forced to a single
//! value. Its intended use is minesweeper-style deduction: given the clue
//! constraints over a neighbourhood of hidden cells, it proves which cells are
//! safe and which are mines.
//!
//! The engine consists of three cooperating parts:
//! * a tabular-reduction propagator which enforces generalized arc consistency
//!   over table constraints,
//! * a backtracking search driver with three interchangeable consistency
//!   strategies (back-checking, forward-checking, and maintained arc
//!   consistency),
//! * an all-solutions enumerator which intersects the discovered solutions
//!   into the "backbone" of forced values.
//!
//! Translating a board into variables and constraints, partitioning them into
//! independent components, and presenting the results are the caller's
//! responsibility; the engine operates on one [`Component`] at a time.
//!
//! # Using Sweeper
//! A component is built from variables, table constraints, and a fixed
//! assignment order:
//! ```rust
//! use sweeper_solver::Component;
//! use sweeper_solver::ConstraintDefinition;
//! use sweeper_solver::SearchStrategy;
//! use sweeper_solver::Solver;
//! use sweeper_solver::VariableKey;
//!
//! let a = VariableKey::new(0);
//! let b = VariableKey::new(1);
//! let c = VariableKey::new(2);
//!
//! // "exactly 1 of {a, b} is a mine" and "exactly 0 of {b, c} are mines"
//! let mut component = Component::new(
//!     vec![a, b, c],
//!     vec![
//!         ConstraintDefinition::exactly(vec![a, b], 1),
//!         ConstraintDefinition::exactly(vec![b, c], 0),
//!     ],
//!     vec![a, b, c],
//! )
//! .expect("the component is well-formed");
//!
//! let mut solver = Solver::default();
//!
//! // Propagation alone proves a is a mine and b and c are safe.
//! let outcome = solver.propagate(&mut component);
//! assert!(outcome.consistent);
//! assert_eq!(outcome.solved.len(), 3);
//!
//! // Full enumeration agrees: the backbone pins every variable.
//! let enumeration = solver.enumerate(&mut component, SearchStrategy::MaintainArcConsistency);
//! assert!(enumeration.satisfiable);
//! assert_eq!(enumeration.backbone.len(), 3);
//! ```

pub(crate) mod basic_types;
pub mod containers;
pub(crate) mod constraints;
pub(crate) mod engine;
pub mod statistics;
pub mod sweeper_asserts;

// We declare a private module with public use, so that all exports from API are exports directly
// from the crate.
//
// Example:
// `use sweeper_solver::Solver;`
// vs.
// `use sweeper_solver::api::Solver;`
mod api;

pub use api::*;
