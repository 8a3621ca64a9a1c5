//! Cross-module checks on substances built from explicit element maps.

use oc_fluids::{Element, Species, SpeciesRegistry, Substance, combine_linear};
use proptest::prelude::*;

proptest! {
    #[test]
    fn elemental_composition_returns_supplied_non_zero_entries(
        counts in prop::collection::vec(0u8..20, 4)
    ) {
        let input: Vec<(Element, f64)> = Element::ALL
            .iter()
            .zip(counts.iter())
            .map(|(e, c)| (*e, f64::from(*c)))
            .collect();
        let substance = Substance::from_elements(input.clone()).unwrap();

        let expected: Vec<(Element, f64)> =
            input.into_iter().filter(|(_, c)| *c != 0.0).collect();
        let actual: Vec<(Element, f64)> = substance.elemental_composition().iter().collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn combination_is_linear_in_coefficients(a in -5.0_f64..5.0, b in -5.0_f64..5.0) {
        let registry = SpeciesRegistry::standard();
        let co2 = registry.substance(Species::CO2).unwrap();
        let h2o = registry.substance(Species::H2O).unwrap();
        let mix = combine_linear(&[(a, &co2), (b, &h2o)]);

        for element in Element::ALL {
            let expected = a * co2.formula().count(element) + b * h2o.formula().count(element);
            prop_assert!((mix.formula().count(element) - expected).abs() < 1e-12);
        }
        prop_assert!(!mix.is_bound());
    }
}

#[test]
fn air_from_oxygen_and_nitrogen_answers_as_air() {
    let registry = SpeciesRegistry::standard();
    let o2 = registry.substance(Species::O2).unwrap();
    let n2 = registry.substance(Species::N2).unwrap();

    let mut air = combine_linear(&[(1.0, &o2), (3.76, &n2)]);
    assert!(air.specific_heat_cp().is_err());

    air.bind_to_species("ig.air", &registry).unwrap();
    let k = air.specific_heat_cp().unwrap() / air.specific_heat_cv().unwrap();
    assert!((k - 1.4).abs() < 0.01);

    // Formula still reflects the O2 + 3.76 N2 combination.
    assert_eq!(air.formula().count(Element::O), 2.0);
    assert!((air.formula().count(Element::N) - 7.52).abs() < 1e-12);
}
