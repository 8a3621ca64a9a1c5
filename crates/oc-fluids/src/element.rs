//! Chemical elements and elemental formulas.

use crate::error::{FluidError, FluidResult};
use std::collections::BTreeMap;
use std::fmt;

/// Chemical elements that take part in hydrocarbon/alcohol combustion with air.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Element {
    C,
    H,
    O,
    N,
}

impl Element {
    pub const ALL: [Element; 4] = [Element::C, Element::H, Element::O, Element::N];

    pub fn symbol(&self) -> &'static str {
        match self {
            Element::C => "C",
            Element::H => "H",
            Element::O => "O",
            Element::N => "N",
        }
    }
}

impl std::str::FromStr for Element {
    type Err = FluidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "C" => Ok(Element::C),
            "H" => Ok(Element::H),
            "O" => Ok(Element::O),
            "N" => Ok(Element::N),
            other => Err(FluidError::UnknownElement {
                symbol: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Elemental composition: atom count per element.
///
/// Counts are real numbers because formulas are scaled and subtracted when
/// substances are combined. A formula built for a real species only holds
/// non-negative counts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Formula {
    counts: BTreeMap<Element, f64>,
}

impl Formula {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a formula from (element, count) pairs; repeated elements accumulate.
    pub fn from_counts(counts: impl IntoIterator<Item = (Element, f64)>) -> Self {
        let mut formula = Self::new();
        for (element, count) in counts {
            *formula.counts.entry(element).or_insert(0.0) += count;
        }
        formula
    }

    /// Parse (symbol, count) pairs, rejecting unknown symbols and negative counts.
    pub fn from_symbols<'a>(
        counts: impl IntoIterator<Item = (&'a str, f64)>,
    ) -> FluidResult<Self> {
        let mut parsed = Vec::new();
        for (symbol, count) in counts {
            let element: Element = symbol.parse()?;
            if !count.is_finite() || count < 0.0 {
                return Err(FluidError::NonPhysical {
                    what: "element count must be finite and non-negative",
                });
            }
            parsed.push((element, count));
        }
        Ok(Self::from_counts(parsed))
    }

    /// Atom count of `element` (0.0 if absent).
    pub fn count(&self, element: Element) -> f64 {
        self.counts.get(&element).copied().unwrap_or(0.0)
    }

    /// True when every count is zero.
    pub fn is_empty(&self) -> bool {
        self.counts.values().all(|c| *c == 0.0)
    }

    /// Non-zero (element, count) pairs in element order.
    pub fn iter(&self) -> impl Iterator<Item = (Element, f64)> + '_ {
        self.counts
            .iter()
            .filter(|(_, c)| **c != 0.0)
            .map(|(e, c)| (*e, *c))
    }

    /// Copy of this formula without zero entries.
    pub fn non_zero(&self) -> Formula {
        Formula {
            counts: self.iter().collect(),
        }
    }

    /// `self × factor`.
    pub fn scaled(&self, factor: f64) -> Formula {
        Formula {
            counts: self.counts.iter().map(|(e, c)| (*e, c * factor)).collect(),
        }
    }

    /// `self + factor × other`, in place.
    pub fn accumulate(&mut self, factor: f64, other: &Formula) {
        for (element, count) in &other.counts {
            *self.counts.entry(*element).or_insert(0.0) += factor * count;
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (element, count) in self.iter() {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            write!(f, "{element}{count}")?;
        }
        if first {
            f.write_str("(empty)")?;
        }
        Ok(())
    }
}
