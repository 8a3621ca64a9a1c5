//! Parameter validation logic.

use crate::schema::{EngineParameters, Parameter, RawParameters};

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Missing parameter: {name}")]
    Missing { name: &'static str },

    #[error("Invalid value: {name} = {value} ({reason})")]
    Invalid {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Domain rule for a single parameter; `Err` carries the reason.
fn check(parameter: Parameter, value: f64) -> Result<(), &'static str> {
    if !value.is_finite() {
        return Err("must be finite");
    }
    match parameter {
        Parameter::EngineSpeed
        | Parameter::RevolutionsPerCycle
        | Parameter::IntakeTemperature
        | Parameter::IntakePressure
        | Parameter::Displacement
        | Parameter::FuelHeatingValue
        | Parameter::FuelDensity
            if value <= 0.0 =>
        {
            Err("must be positive")
        }
        Parameter::Cylinders if value <= 0.0 || value.fract() != 0.0 => {
            Err("must be a positive whole number")
        }
        Parameter::CompressionRatio if value <= 1.0 => Err("must be greater than 1"),
        Parameter::CombustionMassFraction if value <= 0.0 || value > 1.0 => {
            Err("must be in (0, 1]")
        }
        Parameter::ExternalWorkRate
        | Parameter::OctaneRatio
        | Parameter::AnhydrousRatio
        | Parameter::NitrogenOxygenRatio
            if value < 0.0 =>
        {
            Err("must be non-negative")
        }
        _ => Ok(()),
    }
}

/// Check every parameter in canonical order and convert to [`EngineParameters`].
///
/// The first absent parameter is reported as [`ConfigError::Missing`]; the
/// first present but out-of-domain one as [`ConfigError::Invalid`].
pub fn validate_parameters(raw: &RawParameters) -> ConfigResult<EngineParameters> {
    let mut values = [0.0; Parameter::ALL.len()];
    for (slot, parameter) in values.iter_mut().zip(Parameter::ALL) {
        *slot = raw.get(parameter).ok_or(ConfigError::Missing {
            name: parameter.name(),
        })?;
    }
    for (value, parameter) in values.iter().zip(Parameter::ALL) {
        check(parameter, *value).map_err(|reason| ConfigError::Invalid {
            name: parameter.name(),
            value: value.to_string(),
            reason,
        })?;
    }

    let [
        engine_speed_rpm,
        cylinders,
        revolutions_per_cycle,
        compression_ratio,
        intake_temperature_k,
        intake_pressure_pa,
        displacement_m3,
        fuel_heating_value_j_per_kg,
        fuel_density_kg_per_m3,
        external_work_rate_w,
        combustion_mass_fraction,
        octane_ratio,
        anhydrous_ratio,
        nitrogen_oxygen_ratio,
    ] = values;

    if octane_ratio + anhydrous_ratio <= 0.0 {
        return Err(ConfigError::Invalid {
            name: Parameter::OctaneRatio.name(),
            value: octane_ratio.to_string(),
            reason: "fuel blend must contain octane or anhydrous ethanol",
        });
    }

    Ok(EngineParameters {
        engine_speed_rpm,
        cylinders,
        revolutions_per_cycle,
        compression_ratio,
        intake_temperature_k,
        intake_pressure_pa,
        displacement_m3,
        fuel_heating_value_j_per_kg,
        fuel_density_kg_per_m3,
        external_work_rate_w,
        combustion_mass_fraction,
        octane_ratio,
        anhydrous_ratio,
        nitrogen_oxygen_ratio,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> RawParameters {
        RawParameters::default()
            .with(Parameter::EngineSpeed, 3000.0)
            .with(Parameter::Cylinders, 4.0)
            .with(Parameter::RevolutionsPerCycle, 2.0)
            .with(Parameter::CompressionRatio, 8.0)
            .with(Parameter::IntakeTemperature, 300.0)
            .with(Parameter::IntakePressure, 100_000.0)
            .with(Parameter::Displacement, 0.0005)
            .with(Parameter::FuelHeatingValue, 44.0e6)
            .with(Parameter::FuelDensity, 743.2)
            .with(Parameter::ExternalWorkRate, 15_000.0)
            .with(Parameter::CombustionMassFraction, 1.0)
            .with(Parameter::OctaneRatio, 1.0)
            .with(Parameter::AnhydrousRatio, 0.0)
            .with(Parameter::NitrogenOxygenRatio, 3.76)
    }

    #[test]
    fn complete_parameters_validate() {
        let params = validate_parameters(&complete()).unwrap();
        assert_eq!(params.compression_ratio, 8.0);
        assert_eq!(params.to_raw(), complete());
    }

    #[test]
    fn each_missing_parameter_is_named() {
        for parameter in Parameter::ALL {
            let mut raw = complete();
            raw.set(parameter, None);
            assert_eq!(
                validate_parameters(&raw),
                Err(ConfigError::Missing {
                    name: parameter.name()
                })
            );
        }
    }

    #[test]
    fn first_missing_in_canonical_order_wins() {
        let mut raw = complete();
        raw.set(Parameter::NitrogenOxygenRatio, None);
        raw.set(Parameter::CompressionRatio, None);
        assert_eq!(
            validate_parameters(&raw),
            Err(ConfigError::Missing {
                name: "compression_ratio"
            })
        );
    }

    #[test]
    fn missing_is_reported_before_invalid() {
        let mut raw = complete().with(Parameter::EngineSpeed, -1.0);
        raw.set(Parameter::FuelDensity, None);
        assert!(matches!(
            validate_parameters(&raw),
            Err(ConfigError::Missing { name: "fuel_density_kg_per_m3" })
        ));
    }

    #[test]
    fn domain_rules() {
        let cases = [
            (Parameter::EngineSpeed, 0.0),
            (Parameter::Cylinders, 3.5),
            (Parameter::CompressionRatio, 1.0),
            (Parameter::IntakePressure, -5.0),
            (Parameter::CombustionMassFraction, 1.2),
            (Parameter::CombustionMassFraction, 0.0),
            (Parameter::AnhydrousRatio, -0.1),
            (Parameter::ExternalWorkRate, f64::NAN),
        ];
        for (parameter, value) in cases {
            let raw = complete().with(parameter, value);
            match validate_parameters(&raw) {
                Err(ConfigError::Invalid { name, .. }) => assert_eq!(name, parameter.name()),
                other => panic!("{parameter:?} = {value}: {other:?}"),
            }
        }
    }

    #[test]
    fn zero_external_work_is_allowed() {
        let raw = complete().with(Parameter::ExternalWorkRate, 0.0);
        assert!(validate_parameters(&raw).is_ok());
    }

    #[test]
    fn empty_blend_is_invalid() {
        let raw = complete().with(Parameter::OctaneRatio, 0.0);
        assert!(matches!(
            validate_parameters(&raw),
            Err(ConfigError::Invalid { name: "octane_ratio", .. })
        ));
    }
}
