//! Stoichiometric balancing of reaction equations.

use crate::error::{SolverError, SolverResult};
use crate::linear::{LinearEquation, LinearSystem, Solution};
use oc_fluids::{Element, Formula, Species, SpeciesRegistry, Substance};

/// One species term of a reaction side.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// Fixed molar coefficient.
    Known { coefficient: f64, formula: Formula },
    /// Molar coefficient to be solved for.
    Unknown { symbol: String, formula: Formula },
}

impl Term {
    fn formula(&self) -> &Formula {
        match self {
            Term::Known { formula, .. } | Term::Unknown { formula, .. } => formula,
        }
    }
}

/// One side of a reaction: a sum of known and unknown multiples of substances.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReactionSide {
    terms: Vec<Term>,
}

impl ReactionSide {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn known(mut self, coefficient: f64, substance: &Substance) -> Self {
        self.terms.push(Term::Known {
            coefficient,
            formula: substance.formula().clone(),
        });
        self
    }

    pub fn unknown(mut self, symbol: impl Into<String>, substance: &Substance) -> Self {
        self.terms.push(Term::Unknown {
            symbol: symbol.into(),
            formula: substance.formula().clone(),
        });
        self
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Whether any term carries `element`, whatever its coefficient.
    fn mentions(&self, element: Element) -> bool {
        self.terms.iter().any(|t| t.formula().count(element) != 0.0)
    }

    /// Atoms of `element` on this side, with unknowns substituted from `solution`.
    pub fn element_total(&self, element: Element, solution: &Solution) -> SolverResult<f64> {
        let mut total = 0.0;
        for term in &self.terms {
            let coefficient = match term {
                Term::Known { coefficient, .. } => *coefficient,
                Term::Unknown { symbol, .. } => solution.value(symbol)?,
            };
            total += coefficient * term.formula().count(element);
        }
        Ok(total)
    }

    /// Add this side's contribution for `element` to `equation`, scaled by `sign`.
    fn contribute(&self, element: Element, sign: f64, mut equation: LinearEquation) -> LinearEquation {
        for term in &self.terms {
            let count = term.formula().count(element);
            equation = match term {
                Term::Known { coefficient, .. } => equation.constant(sign * coefficient * count),
                Term::Unknown { symbol, .. } => equation.term(symbol.as_str(), sign * count),
            };
        }
        equation
    }
}

/// Balances `reagent = product` by conservation of each element.
pub struct StoichiometryEngine;

impl StoichiometryEngine {
    /// Build the element-balance system: one equation per element carried by
    /// any term on either side, `reagent(e) − product(e) = 0`.
    pub fn system(reagent: &ReactionSide, product: &ReactionSide) -> LinearSystem {
        let mut system = LinearSystem::new();
        for side in [reagent, product] {
            for term in side.terms() {
                if let Term::Unknown { symbol, .. } = term {
                    system.declare(symbol.as_str());
                }
            }
        }
        for element in Element::ALL {
            if !reagent.mentions(element) && !product.mentions(element) {
                continue;
            }
            let equation = reagent.contribute(element, 1.0, LinearEquation::new());
            let equation = product.contribute(element, -1.0, equation);
            system.push(equation);
        }
        system
    }

    /// Solve for the unknown coefficients.
    pub fn balance(reagent: &ReactionSide, product: &ReactionSide) -> SolverResult<Solution> {
        Self::system(reagent, product).solve()
    }

    /// `reagent(e) − product(e)` for every element, at `solution`.
    pub fn residuals(
        reagent: &ReactionSide,
        product: &ReactionSide,
        solution: &Solution,
    ) -> SolverResult<Vec<(Element, f64)>> {
        Element::ALL
            .iter()
            .map(|e| {
                Ok((
                    *e,
                    reagent.element_total(*e, solution)? - product.element_total(*e, solution)?,
                ))
            })
            .collect()
    }
}

/// Molar coefficients of `fuel + air·(air) = carbon_dioxide·CO2 + water·H2O + nitrogen·N2`,
/// per unit of fuel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombustionCoefficients {
    pub air: f64,
    pub carbon_dioxide: f64,
    pub water: f64,
    pub nitrogen: f64,
}

/// Complete combustion of a fuel with air to CO₂, H₂O and N₂.
#[derive(Debug, Clone)]
pub struct CombustionBalance {
    reagent: ReactionSide,
    product: ReactionSide,
    solution: Solution,
    coefficients: CombustionCoefficients,
}

impl CombustionBalance {
    pub const AIR: &'static str = "air";
    pub const CARBON_DIOXIDE: &'static str = "carbon_dioxide";
    pub const WATER: &'static str = "water";
    pub const NITROGEN: &'static str = "nitrogen";

    pub fn solve(
        fuel: &Substance,
        air: &Substance,
        registry: &SpeciesRegistry,
    ) -> SolverResult<Self> {
        let reagent = ReactionSide::new()
            .known(1.0, fuel)
            .unknown(Self::AIR, air);
        let product = ReactionSide::new()
            .unknown(Self::CARBON_DIOXIDE, &registry.substance(Species::CO2)?)
            .unknown(Self::WATER, &registry.substance(Species::H2O)?)
            .unknown(Self::NITROGEN, &registry.substance(Species::N2)?);

        let solution = StoichiometryEngine::balance(&reagent, &product)?;
        let coefficients = CombustionCoefficients {
            air: solution.value(Self::AIR)?,
            carbon_dioxide: solution.value(Self::CARBON_DIOXIDE)?,
            water: solution.value(Self::WATER)?,
            nitrogen: solution.value(Self::NITROGEN)?,
        };
        if [coefficients.air, coefficients.carbon_dioxide, coefficients.water, coefficients.nitrogen]
            .iter()
            .any(|c| *c < -1e-12)
        {
            return Err(SolverError::Unsolvable {
                reason: format!("negative molar coefficient in {coefficients:?}"),
            });
        }
        tracing::debug!(?coefficients, "combustion balanced");

        Ok(Self {
            reagent,
            product,
            solution,
            coefficients,
        })
    }

    pub fn coefficients(&self) -> CombustionCoefficients {
        self.coefficients
    }

    pub fn solution(&self) -> &Solution {
        &self.solution
    }

    pub fn reagent(&self) -> &ReactionSide {
        &self.reagent
    }

    pub fn product(&self) -> &ReactionSide {
        &self.product
    }

    /// Element imbalance at the solved coefficients (all ≈ 0).
    pub fn residuals(&self) -> SolverResult<Vec<(Element, f64)>> {
        StoichiometryEngine::residuals(&self.reagent, &self.product, &self.solution)
    }
}
