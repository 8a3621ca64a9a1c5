//! Linear systems in named unknowns.

use crate::error::{SolverError, SolverResult};
use nalgebra::{DMatrix, DVector};

/// Relative threshold below which a singular value counts as zero.
const RANK_EPS: f64 = 1e-10;

/// Relative residual above which the least-squares answer is rejected.
const RESIDUAL_TOL: f64 = 1e-9;

/// `Σ coefficient·unknown + constant = 0`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearEquation {
    terms: Vec<(String, f64)>,
    constant: f64,
}

impl LinearEquation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `coefficient × unknown`; repeated unknowns accumulate.
    pub fn term(mut self, unknown: impl Into<String>, coefficient: f64) -> Self {
        let unknown = unknown.into();
        match self.terms.iter_mut().find(|(name, _)| *name == unknown) {
            Some((_, c)) => *c += coefficient,
            None => self.terms.push((unknown, coefficient)),
        }
        self
    }

    /// Add to the constant part.
    pub fn constant(mut self, value: f64) -> Self {
        self.constant += value;
        self
    }

    pub fn coefficient(&self, unknown: &str) -> f64 {
        self.terms
            .iter()
            .find(|(name, _)| name == unknown)
            .map(|(_, c)| *c)
            .unwrap_or(0.0)
    }

    pub fn unknowns(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(|(name, _)| name.as_str())
    }

    /// Left-hand side evaluated at `solution` (zero when satisfied).
    pub fn evaluate(&self, solution: &Solution) -> SolverResult<f64> {
        let mut total = self.constant;
        for (name, coefficient) in &self.terms {
            total += coefficient * solution.value(name)?;
        }
        Ok(total)
    }
}

/// A set of linear equations over named unknowns.
#[derive(Debug, Clone, Default)]
pub struct LinearSystem {
    unknowns: Vec<String>,
    equations: Vec<LinearEquation>,
}

impl LinearSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an unknown even if no equation mentions it yet.
    pub fn declare(&mut self, unknown: impl Into<String>) {
        let unknown = unknown.into();
        if !self.unknowns.contains(&unknown) {
            self.unknowns.push(unknown);
        }
    }

    pub fn push(&mut self, equation: LinearEquation) {
        for name in equation.unknowns() {
            if !self.unknowns.iter().any(|u| u == name) {
                self.unknowns.push(name.to_string());
            }
        }
        self.equations.push(equation);
    }

    pub fn unknowns(&self) -> &[String] {
        &self.unknowns
    }

    pub fn equations(&self) -> &[LinearEquation] {
        &self.equations
    }

    /// Solve for the unique solution.
    ///
    /// Fails with [`SolverError::Unsolvable`] when the system is empty,
    /// underdetermined (rank below the number of unknowns) or inconsistent.
    pub fn solve(&self) -> SolverResult<Solution> {
        let n = self.unknowns.len();
        let m = self.equations.len();
        if n == 0 || m == 0 {
            return Err(SolverError::Unsolvable {
                reason: format!("{m} equations in {n} unknowns"),
            });
        }

        let a = DMatrix::from_fn(m, n, |i, j| self.equations[i].coefficient(&self.unknowns[j]));
        let b = DVector::from_fn(m, |i, _| -self.equations[i].constant);

        let svd = a.clone().svd(true, true);
        let eps = RANK_EPS * svd.singular_values.max().max(1.0);
        let rank = svd.rank(eps);
        if rank < n {
            return Err(SolverError::Unsolvable {
                reason: format!(
                    "underdetermined: rank {rank} for {n} unknowns ({})",
                    self.unknowns.join(", ")
                ),
            });
        }

        let x = svd.solve(&b, eps).map_err(|e| SolverError::Numeric {
            what: format!("SVD solve failed: {e}"),
        })?;

        let residual = (&a * &x - &b).norm();
        if residual > RESIDUAL_TOL * (1.0 + b.norm()) {
            return Err(SolverError::Unsolvable {
                reason: format!("inconsistent: residual {residual:e}"),
            });
        }

        tracing::trace!(unknowns = n, equations = m, residual, "linear system solved");
        Ok(Solution {
            values: self.unknowns.iter().cloned().zip(x.iter().copied()).collect(),
        })
    }
}

/// Unknown → value, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    values: Vec<(String, f64)>,
}

impl Solution {
    pub fn get(&self, unknown: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|(name, _)| name == unknown)
            .map(|(_, v)| *v)
    }

    /// Like [`Solution::get`], but a missing unknown is an error.
    pub fn value(&self, unknown: &str) -> SolverResult<f64> {
        self.get(unknown).ok_or_else(|| SolverError::Unsolvable {
            reason: format!("no value for unknown '{unknown}'"),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(name, v)| (name.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_by_two() {
        // x + y = 3, x - y = 1
        let mut system = LinearSystem::new();
        system.push(LinearEquation::new().term("x", 1.0).term("y", 1.0).constant(-3.0));
        system.push(LinearEquation::new().term("x", 1.0).term("y", -1.0).constant(-1.0));

        let solution = system.solve().unwrap();
        assert!((solution.value("x").unwrap() - 2.0).abs() < 1e-12);
        assert!((solution.value("y").unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn repeated_terms_accumulate() {
        let eq = LinearEquation::new().term("a", 2.0).term("a", 0.5).constant(1.0).constant(1.0);
        assert_eq!(eq.coefficient("a"), 2.5);
        assert_eq!(eq.coefficient("b"), 0.0);
    }

    #[test]
    fn consistent_overdetermined_system_is_solved() {
        let mut system = LinearSystem::new();
        system.push(LinearEquation::new().term("x", 1.0).constant(-4.0));
        system.push(LinearEquation::new().term("x", 2.0).constant(-8.0));
        let solution = system.solve().unwrap();
        assert!((solution.value("x").unwrap() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn underdetermined_is_unsolvable() {
        let mut system = LinearSystem::new();
        system.push(LinearEquation::new().term("x", 1.0).term("y", 1.0).constant(-3.0));
        assert!(matches!(
            system.solve(),
            Err(SolverError::Unsolvable { ref reason }) if reason.contains("underdetermined")
        ));
    }

    #[test]
    fn declared_but_unused_unknown_is_underdetermined() {
        let mut system = LinearSystem::new();
        system.declare("free");
        system.push(LinearEquation::new().term("x", 1.0).constant(-1.0));
        assert!(system.solve().is_err());
    }

    #[test]
    fn inconsistent_is_unsolvable() {
        let mut system = LinearSystem::new();
        system.push(LinearEquation::new().term("x", 1.0).constant(-1.0));
        system.push(LinearEquation::new().term("x", 1.0).constant(-2.0));
        assert!(matches!(
            system.solve(),
            Err(SolverError::Unsolvable { ref reason }) if reason.contains("inconsistent")
        ));
    }

    #[test]
    fn empty_is_unsolvable() {
        assert!(LinearSystem::new().solve().is_err());
    }

    #[test]
    fn evaluate_reports_residual() {
        let eq = LinearEquation::new().term("x", 2.0).constant(-4.0);
        let mut system = LinearSystem::new();
        system.push(eq.clone());
        let solution = system.solve().unwrap();
        assert!(eq.evaluate(&solution).unwrap().abs() < 1e-12);
    }
}
