//! oc-engine: four-stroke engine performance from parameters, combustion
//! chemistry and the ideal Otto cycle.
//!
//! [`EngineModel`] is a graph of memoized quantities. Each is computed on
//! first request from the quantities it depends on and then cached; a
//! failure anywhere is reported once, attributed to the innermost quantity
//! that could not be computed.

pub mod error;
pub mod model;
pub mod report;
pub mod service;

pub use error::{EngineError, EngineResult};
pub use model::EngineModel;
pub use report::{CombustionReport, EngineMetrics, EngineReport};
