//! Cycle stages: three lazily resolved state variables per stage.

use crate::error::{CycleError, CycleResult};
use std::cell::Cell;
use std::fmt;

/// State variables held by every stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageVariable {
    /// Pressure [Pa]
    Pressure,
    /// Specific volume [m³/kg]
    Volume,
    /// Temperature [K]
    Temperature,
}

impl StageVariable {
    pub const ALL: [StageVariable; 3] = [
        StageVariable::Pressure,
        StageVariable::Volume,
        StageVariable::Temperature,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StageVariable::Pressure => "pressure",
            StageVariable::Volume => "volume",
            StageVariable::Temperature => "temperature",
        }
    }

    fn index(self) -> usize {
        match self {
            StageVariable::Pressure => 0,
            StageVariable::Volume => 1,
            StageVariable::Temperature => 2,
        }
    }
}

impl fmt::Display for StageVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lifecycle of one slot: `Unset → Resolving → Resolved`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SlotState {
    Unset,
    Resolving,
    Resolved(f64),
}

/// Computes a slot from its own stage and the owning context.
pub type Resolver<C> = Box<dyn Fn(&CycleStage<C>, &C) -> CycleResult<f64>>;

struct Slot<C> {
    state: Cell<SlotState>,
    resolver: Option<Resolver<C>>,
}

impl<C> Slot<C> {
    fn unset() -> Self {
        Self {
            state: Cell::new(SlotState::Unset),
            resolver: None,
        }
    }
}

/// One corner state of a thermodynamic cycle.
///
/// `C` is the context handed to resolvers, normally the cycle that owns the
/// stage, so that a resolver can read other stages.
pub struct CycleStage<C> {
    ordinal: u8,
    slots: [Slot<C>; 3],
}

impl<C> CycleStage<C> {
    pub fn new(ordinal: u8) -> Self {
        Self {
            ordinal,
            slots: [Slot::unset(), Slot::unset(), Slot::unset()],
        }
    }

    /// Fix `variable` to `value` (resolved from the start).
    pub fn with_fixed(self, variable: StageVariable, value: f64) -> CycleResult<Self> {
        if !value.is_finite() {
            return Err(CycleError::NonFinite {
                stage: self.ordinal,
                variable,
                value,
            });
        }
        self.slots[variable.index()]
            .state
            .set(SlotState::Resolved(value));
        Ok(self)
    }

    /// Register the function that computes `variable` on first read.
    pub fn set_resolver(
        &mut self,
        variable: StageVariable,
        resolver: impl Fn(&CycleStage<C>, &C) -> CycleResult<f64> + 'static,
    ) -> CycleResult<()> {
        let slot = &mut self.slots[variable.index()];
        if matches!(slot.state.get(), SlotState::Resolved(_)) {
            return Err(CycleError::AlreadyResolved {
                stage: self.ordinal,
                variable,
            });
        }
        slot.resolver = Some(Box::new(resolver));
        Ok(())
    }

    /// Builder form of [`CycleStage::set_resolver`].
    pub fn resolving(
        mut self,
        variable: StageVariable,
        resolver: impl Fn(&CycleStage<C>, &C) -> CycleResult<f64> + 'static,
    ) -> CycleResult<Self> {
        self.set_resolver(variable, resolver)?;
        Ok(self)
    }

    pub fn ordinal(&self) -> u8 {
        self.ordinal
    }

    pub fn state(&self, variable: StageVariable) -> SlotState {
        self.slots[variable.index()].state.get()
    }

    /// Read `variable`, resolving it (and whatever it depends on) on first access.
    pub fn get(&self, variable: StageVariable, ctx: &C) -> CycleResult<f64> {
        let slot = &self.slots[variable.index()];
        match slot.state.get() {
            SlotState::Resolved(value) => Ok(value),
            SlotState::Resolving => Err(CycleError::CircularDependency {
                stage: self.ordinal,
                variable,
            }),
            SlotState::Unset => {
                let resolver = slot.resolver.as_ref().ok_or(CycleError::MissingResolver {
                    stage: self.ordinal,
                    variable,
                })?;
                slot.state.set(SlotState::Resolving);
                let value = match resolver(self, ctx) {
                    Ok(value) if value.is_finite() => value,
                    Ok(value) => {
                        slot.state.set(SlotState::Unset);
                        return Err(CycleError::NonFinite {
                            stage: self.ordinal,
                            variable,
                            value,
                        });
                    }
                    Err(err) => {
                        slot.state.set(SlotState::Unset);
                        return Err(err);
                    }
                };
                slot.state.set(SlotState::Resolved(value));
                tracing::trace!(stage = self.ordinal, %variable, value, "stage variable resolved");
                Ok(value)
            }
        }
    }

    pub fn pressure(&self, ctx: &C) -> CycleResult<f64> {
        self.get(StageVariable::Pressure, ctx)
    }

    pub fn volume(&self, ctx: &C) -> CycleResult<f64> {
        self.get(StageVariable::Volume, ctx)
    }

    pub fn temperature(&self, ctx: &C) -> CycleResult<f64> {
        self.get(StageVariable::Temperature, ctx)
    }
}

impl<C> fmt::Debug for CycleStage<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CycleStage")
            .field("ordinal", &self.ordinal)
            .field("pressure", &self.state(StageVariable::Pressure))
            .field("volume", &self.state(StageVariable::Volume))
            .field("temperature", &self.state(StageVariable::Temperature))
            .finish()
    }
}
