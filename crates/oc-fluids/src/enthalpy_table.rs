//! Ideal-gas molar enthalpy table for combustion products.
//!
//! Molar enthalpy [kJ/kmol] of CO₂, H₂O, O₂ and N₂ against temperature [K],
//! zero at 0 K. Values between rows are linearly interpolated; temperatures
//! outside the table are rejected.

use crate::error::{FluidError, FluidResult};
use crate::species::Species;

/// Column order of `ROWS`.
const COLUMNS: [Species; 4] = [Species::CO2, Species::H2O, Species::O2, Species::N2];

/// (T [K], CO₂, H₂O, O₂, N₂)
#[rustfmt::skip]
const ROWS: [(f64, [f64; 4]); 34] = [
    (0.0,    [0.0,      0.0,      0.0,      0.0]),
    (220.0,  [6_601.0,  7_295.0,  6_404.0,  6_391.0]),
    (298.0,  [9_364.0,  9_904.0,  8_682.0,  8_669.0]),
    (300.0,  [9_431.0,  9_966.0,  8_736.0,  8_723.0]),
    (400.0,  [13_372.0, 13_356.0, 11_711.0, 11_640.0]),
    (500.0,  [17_678.0, 16_828.0, 14_770.0, 14_581.0]),
    (600.0,  [22_280.0, 20_402.0, 17_929.0, 17_563.0]),
    (700.0,  [27_125.0, 24_088.0, 21_184.0, 20_604.0]),
    (800.0,  [32_179.0, 27_896.0, 24_523.0, 23_714.0]),
    (900.0,  [37_405.0, 31_828.0, 27_928.0, 26_890.0]),
    (1000.0, [42_769.0, 35_882.0, 31_389.0, 30_129.0]),
    (1100.0, [48_258.0, 40_071.0, 34_899.0, 33_426.0]),
    (1200.0, [53_848.0, 44_380.0, 38_447.0, 36_777.0]),
    (1300.0, [59_522.0, 48_807.0, 42_033.0, 40_170.0]),
    (1400.0, [65_271.0, 53_351.0, 45_648.0, 43_605.0]),
    (1500.0, [71_078.0, 57_999.0, 49_292.0, 47_073.0]),
    (1600.0, [76_944.0, 62_748.0, 52_961.0, 50_571.0]),
    (1700.0, [82_856.0, 67_589.0, 56_652.0, 54_099.0]),
    (1800.0, [88_806.0, 72_513.0, 60_371.0, 57_651.0]),
    (1900.0, [94_793.0, 77_517.0, 64_116.0, 61_220.0]),
    (2000.0, [100_804.0, 82_593.0, 67_881.0, 64_810.0]),
    (2100.0, [106_864.0, 87_735.0, 71_668.0, 68_417.0]),
    (2200.0, [112_939.0, 92_940.0, 75_484.0, 72_040.0]),
    (2300.0, [119_035.0, 98_199.0, 79_316.0, 75_676.0]),
    (2400.0, [125_152.0, 103_508.0, 83_174.0, 79_320.0]),
    (2500.0, [131_290.0, 108_868.0, 87_057.0, 82_981.0]),
    (2600.0, [137_449.0, 114_273.0, 90_956.0, 86_650.0]),
    (2700.0, [143_620.0, 119_717.0, 94_881.0, 90_328.0]),
    (2800.0, [149_808.0, 125_198.0, 98_826.0, 94_014.0]),
    (2900.0, [156_009.0, 130_717.0, 102_793.0, 97_705.0]),
    (3000.0, [162_226.0, 136_264.0, 106_780.0, 101_407.0]),
    (3100.0, [168_456.0, 141_846.0, 110_784.0, 105_115.0]),
    (3200.0, [174_695.0, 147_457.0, 114_809.0, 108_830.0]),
    (3250.0, [177_822.0, 150_272.0, 116_827.0, 110_690.0]),
];

/// Enthalpy-vs-temperature table, loaded once and shared read-only.
#[derive(Debug, Clone)]
pub struct EnthalpyTable {
    temperatures: Vec<f64>,
    columns: Vec<(Species, Vec<f64>)>,
}

impl EnthalpyTable {
    /// The built-in ideal-gas table for combustion products.
    pub fn ideal_gas_products() -> Self {
        let temperatures: Vec<f64> = ROWS.iter().map(|(t, _)| *t).collect();
        let columns = COLUMNS
            .iter()
            .enumerate()
            .map(|(i, species)| {
                let values = ROWS.iter().map(|(_, h)| h[i]).collect();
                (*species, values)
            })
            .collect();
        Self {
            temperatures,
            columns,
        }
    }

    /// Build a table from explicit data. Temperatures must be strictly increasing
    /// and every column must have one value per temperature.
    pub fn from_columns(
        temperatures: Vec<f64>,
        columns: Vec<(Species, Vec<f64>)>,
    ) -> FluidResult<Self> {
        if temperatures.len() < 2 || temperatures.windows(2).any(|w| w[1] <= w[0]) {
            return Err(FluidError::NonPhysical {
                what: "table temperatures must be strictly increasing",
            });
        }
        if columns.iter().any(|(_, v)| v.len() != temperatures.len()) {
            return Err(FluidError::NonPhysical {
                what: "table column length mismatch",
            });
        }
        Ok(Self {
            temperatures,
            columns,
        })
    }

    pub fn has_species(&self, species: Species) -> bool {
        self.columns.iter().any(|(s, _)| *s == species)
    }

    /// Temperature range `(min, max)` covered by the table [K].
    pub fn range(&self) -> (f64, f64) {
        (
            self.temperatures[0],
            self.temperatures[self.temperatures.len() - 1],
        )
    }

    /// Interpolated molar enthalpy [kJ/kmol] of `species` at `t_k`.
    pub fn molar_enthalpy(&self, species: Species, t_k: f64) -> FluidResult<f64> {
        let values = self
            .columns
            .iter()
            .find(|(s, _)| *s == species)
            .map(|(_, v)| v)
            .ok_or_else(|| FluidError::lookup(species, "no tabulated enthalpy"))?;

        let (t_min, t_max) = self.range();
        if !t_k.is_finite() || t_k < t_min || t_k > t_max {
            return Err(FluidError::lookup(
                species,
                format!("temperature {t_k} K outside enthalpy table [{t_min}, {t_max}] K"),
            ));
        }

        // First index with T > t_k, clamped so that [hi-1, hi] is a valid segment.
        let hi = self
            .temperatures
            .partition_point(|t| *t <= t_k)
            .clamp(1, self.temperatures.len() - 1);
        let (t0, t1) = (self.temperatures[hi - 1], self.temperatures[hi]);
        let (h0, h1) = (values[hi - 1], values[hi]);
        Ok(h0 + (h1 - h0) * (t_k - t0) / (t1 - t0))
    }
}

impl Default for EnthalpyTable {
    fn default() -> Self {
        Self::ideal_gas_products()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_rows_are_returned() {
        let table = EnthalpyTable::ideal_gas_products();
        assert_eq!(table.molar_enthalpy(Species::CO2, 300.0).unwrap(), 9_431.0);
        assert_eq!(table.molar_enthalpy(Species::N2, 1000.0).unwrap(), 30_129.0);
        assert_eq!(table.molar_enthalpy(Species::O2, 0.0).unwrap(), 0.0);
        assert_eq!(table.molar_enthalpy(Species::H2O, 3250.0).unwrap(), 150_272.0);
    }

    #[test]
    fn interpolates_linearly() {
        let table = EnthalpyTable::ideal_gas_products();
        let h = table.molar_enthalpy(Species::H2O, 350.0).unwrap();
        assert!((h - (9_966.0 + 13_356.0) / 2.0).abs() < 1e-9);

        let h_ref = table.molar_enthalpy(Species::CO2, 298.15).unwrap();
        assert!(h_ref > 9_364.0 && h_ref < 9_431.0);
    }

    #[test]
    fn out_of_range_is_a_lookup_error() {
        let table = EnthalpyTable::ideal_gas_products();
        assert!(matches!(
            table.molar_enthalpy(Species::CO2, 4000.0),
            Err(FluidError::PropertyLookup { .. })
        ));
        assert!(table.molar_enthalpy(Species::CO2, -1.0).is_err());
    }

    #[test]
    fn missing_column_is_a_lookup_error() {
        let table = EnthalpyTable::ideal_gas_products();
        assert!(!table.has_species(Species::Octane));
        assert!(matches!(
            table.molar_enthalpy(Species::Octane, 500.0),
            Err(FluidError::PropertyLookup { .. })
        ));
    }

    #[test]
    fn from_columns_validates_shape() {
        assert!(EnthalpyTable::from_columns(vec![300.0, 200.0], vec![]).is_err());
        assert!(
            EnthalpyTable::from_columns(vec![200.0, 300.0], vec![(Species::N2, vec![1.0])])
                .is_err()
        );
        let table =
            EnthalpyTable::from_columns(vec![200.0, 300.0], vec![(Species::N2, vec![0.0, 10.0])])
                .unwrap();
        assert_eq!(table.molar_enthalpy(Species::N2, 250.0).unwrap(), 5.0);
    }
}
