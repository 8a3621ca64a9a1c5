//! Linear-system and stoichiometric balance solvers.
//!
//! Combustion equations are balanced by writing one linear equation per
//! chemical element (atoms in = atoms out) over the unknown molar
//! coefficients, then solving the resulting system with an SVD. The system
//! must have exactly one solution; anything else is reported as unsolvable.

pub mod error;
pub mod linear;
pub mod stoichiometry;

pub use error::{SolverError, SolverResult};
pub use linear::{LinearEquation, LinearSystem, Solution};
pub use stoichiometry::{
    CombustionBalance, CombustionCoefficients, ReactionSide, StoichiometryEngine, Term,
};
