//! Error types for the engine model.

use oc_core::CoreError;
use oc_cycle::CycleError;
use oc_fluids::FluidError;
use oc_project::{ConfigError, ProjectError};
use oc_solver::SolverError;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Loading failed for a reason other than the parameters themselves.
    #[error("Project error: {0}")]
    Project(#[source] ProjectError),

    #[error("Fluid error: {0}")]
    Fluid(#[from] FluidError),

    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),

    #[error("Cycle error: {0}")]
    Cycle(#[from] CycleError),

    #[error("Numeric error: {0}")]
    Core(#[from] CoreError),

    /// Failure attributed to the quantity that could not be computed.
    #[error("Cannot compute {quantity}: {source}")]
    Quantity {
        quantity: &'static str,
        source: Box<EngineError>,
    },
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Parameter problems found while loading are reported as
/// [`EngineError::Config`], the same as for in-memory parameters.
impl From<ProjectError> for EngineError {
    fn from(err: ProjectError) -> Self {
        match err {
            ProjectError::Config(config) => EngineError::Config(config),
            other => EngineError::Project(other),
        }
    }
}

impl EngineError {
    /// Attribute to `quantity` unless already attributed further down.
    pub fn attributed(self, quantity: &'static str) -> Self {
        match self {
            err @ EngineError::Quantity { .. } => err,
            err => EngineError::Quantity {
                quantity,
                source: Box::new(err),
            },
        }
    }

    /// Quantity the failure is attributed to, if any.
    pub fn quantity(&self) -> Option<&'static str> {
        match self {
            EngineError::Quantity { quantity, .. } => Some(*quantity),
            _ => None,
        }
    }

    /// The underlying error, without attribution.
    pub fn root(&self) -> &EngineError {
        match self {
            EngineError::Quantity { source, .. } => source.root(),
            err => err,
        }
    }
}
