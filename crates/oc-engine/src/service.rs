//! Loading parameters and evaluating engines, for front ends.

use crate::error::EngineResult;
use crate::model::EngineModel;
use crate::report::EngineReport;
use oc_fluids::SpeciesRegistry;
use oc_project::EngineParameters;
use oc_solver::CombustionCoefficients;
use std::path::Path;

/// Where engine parameters come from.
#[derive(Debug, Clone, Copy)]
pub enum ParameterSource<'a> {
    File(&'a Path),
    Environment,
}

pub fn load_parameters(source: ParameterSource<'_>) -> EngineResult<EngineParameters> {
    let params = match source {
        ParameterSource::File(path) => oc_project::load(path)?,
        ParameterSource::Environment => oc_project::load_env()?,
    };
    Ok(params)
}

pub fn build_model(source: ParameterSource<'_>) -> EngineResult<EngineModel> {
    Ok(EngineModel::new(
        load_parameters(source)?,
        SpeciesRegistry::standard(),
    ))
}

/// Full evaluation.
pub fn evaluate(source: ParameterSource<'_>) -> EngineResult<EngineReport> {
    build_model(source)?.report()
}

/// Only the combustion balance, without touching the cycle.
pub fn balance(source: ParameterSource<'_>) -> EngineResult<CombustionCoefficients> {
    build_model(source)?.coefficients()
}
