//! Cycle evaluation errors.

use crate::stage::StageVariable;
use oc_fluids::FluidError;
use thiserror::Error;

pub type CycleResult<T> = Result<T, CycleError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CycleError {
    /// A resolver (transitively) read the slot it is computing.
    #[error("Circular dependency resolving stage {stage} {variable}")]
    CircularDependency { stage: u8, variable: StageVariable },

    /// Unset slot with nothing to compute it from.
    #[error("No resolver for stage {stage} {variable}")]
    MissingResolver { stage: u8, variable: StageVariable },

    /// Slot was fixed or already resolved.
    #[error("Stage {stage} {variable} is already resolved")]
    AlreadyResolved { stage: u8, variable: StageVariable },

    #[error("Non-finite value for stage {stage} {variable}: {value}")]
    NonFinite {
        stage: u8,
        variable: StageVariable,
        value: f64,
    },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Property lookups on the working fluid.
    #[error("Fluid error: {0}")]
    Fluid(#[from] FluidError),
}
