//! Error types for solver operations.

use oc_fluids::FluidError;
use thiserror::Error;

/// Errors that can occur while solving a system.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// No solution, or more than one.
    #[error("Unsolvable system: {reason}")]
    Unsolvable { reason: String },

    #[error("Fluid error: {0}")]
    Fluid(#[from] FluidError),

    #[error("Numeric error: {what}")]
    Numeric { what: String },
}

pub type SolverResult<T> = Result<T, SolverError>;
