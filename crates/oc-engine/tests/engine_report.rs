use oc_engine::service::{ParameterSource, balance, evaluate};
use oc_engine::{EngineError, EngineModel};
use oc_fluids::SpeciesRegistry;
use oc_project::{ConfigError, EngineParameters, Parameter};
use proptest::prelude::*;
use std::path::{Path, PathBuf};

fn demo(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../demos")
        .join(name)
}

fn octane_engine() -> EngineParameters {
    oc_project::load(&demo("otto.yaml")).unwrap()
}

#[test]
fn octane_demo_report() {
    let report = evaluate(ParameterSource::File(&demo("otto.yaml"))).unwrap();

    assert!((report.combustion.air - 12.5).abs() < 1e-9);
    assert!((report.combustion.nitrogen - 47.0).abs() < 1e-9);
    assert_eq!(report.cycle.stages.len(), 4);
    assert_eq!(report.cycle.heat_input_j_per_kg, report.metrics.fuel_heat_rate);

    let k = report.cycle.k;
    let otto = 1.0 - 8f64.powf(1.0 - k);
    assert!((report.metrics.thermal_efficiency - otto).abs() < 1e-9);
}

#[test]
fn gasohol_demo_balances_with_ethanol() {
    let c = balance(ParameterSource::File(&demo("gasohol_short_names.json"))).unwrap();
    // 0.73 C8H18 + 0.27 C2H6O
    assert!((c.carbon_dioxide - (0.73 * 8.0 + 0.27 * 2.0)).abs() < 1e-9);
    assert!((c.water - (0.73 * 9.0 + 0.27 * 3.0)).abs() < 1e-9);
    assert!((c.nitrogen - 3.76 * c.air).abs() < 1e-9);
}

#[test]
fn report_serializes_to_json_and_yaml() {
    let report = evaluate(ParameterSource::File(&demo("otto.yaml"))).unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["parameters"]["cylinders"], 4.0);
    assert!(json["metrics"]["global_efficiency"].is_number());
    assert_eq!(json["cycle"]["stages"][0]["temperature_k"], 300.0);

    let yaml = serde_yaml::to_string(&report).unwrap();
    let back: oc_engine::EngineReport = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(back, report);
}

#[test]
fn text_report_lists_every_stage() {
    let report = evaluate(ParameterSource::File(&demo("otto.yaml"))).unwrap();
    let text = report.to_string();
    assert!(text.contains("CO2"));
    assert!(text.contains("thermal efficiency"));
    for ordinal in 1..=4 {
        assert!(text.contains(&format!("\n      {ordinal} ")), "stage {ordinal}");
    }
}

#[test]
fn every_missing_parameter_is_reported_by_name() {
    let complete = octane_engine().to_raw();
    for parameter in Parameter::ALL {
        let mut raw = complete.clone();
        raw.set(parameter, None);
        match EngineModel::from_raw(&raw, SpeciesRegistry::standard()) {
            Err(EngineError::Config(ConfigError::Missing { name })) => {
                assert_eq!(name, parameter.name())
            }
            other => panic!("{parameter:?}: {other:?}"),
        }
    }
}

#[test]
fn missing_parameter_in_file_is_a_config_error() {
    let mut raw = oc_project::load_raw(&demo("otto.yaml")).unwrap();
    raw.set(Parameter::CompressionRatio, None);

    let path = std::env::temp_dir().join("oc_engine_missing_compression_ratio.yaml");
    std::fs::write(&path, serde_yaml::to_string(&raw).unwrap()).unwrap();

    match evaluate(ParameterSource::File(&path)) {
        Err(EngineError::Config(ConfigError::Missing { name })) => {
            assert_eq!(name, "compression_ratio")
        }
        other => panic!("unexpected: {other:?}"),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn thermal_efficiency_follows_compression_ratio(rv in 4.0f64..14.0) {
        let params = EngineParameters { compression_ratio: rv, ..octane_engine() };
        let model = EngineModel::new(params, SpeciesRegistry::standard());
        let k = model.cycle().unwrap().k().unwrap();
        let otto = 1.0 - rv.powf(1.0 - k);
        prop_assert!((model.thermal_efficiency().unwrap() - otto).abs() < 1e-9);
    }

    #[test]
    fn blend_always_balances(octane in 0.0f64..1.0) {
        let params = EngineParameters {
            octane_ratio: octane,
            anhydrous_ratio: 1.0 - octane,
            ..octane_engine()
        };
        let model = EngineModel::new(params, SpeciesRegistry::standard());
        for (_, residual) in model.combustion().unwrap().residuals().unwrap() {
            prop_assert!(residual.abs() < 1e-9);
        }
        prop_assert!(model.fuel_volume_fraction().unwrap() > 0.0);
    }

    #[test]
    fn heat_release_rate_is_independent_of_blend_scale(
        octane in 0.0f64..1.0,
        scale in 0.1f64..20.0,
    ) {
        let model = |k: f64| {
            let params = EngineParameters {
                octane_ratio: k * octane,
                anhydrous_ratio: k * (1.0 - octane),
                ..octane_engine()
            };
            EngineModel::new(params, SpeciesRegistry::standard())
        };
        let base = model(1.0).heat_release_rate().unwrap();
        let scaled = model(scale).heat_release_rate().unwrap();
        prop_assert!((scaled - base).abs() <= 1e-9 * base.abs(), "{} vs {}", scaled, base);
    }
}
