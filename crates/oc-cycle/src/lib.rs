//! Air-standard Otto cycle with lazily resolved stage states.
//!
//! Each of the four corner states of the cycle holds pressure, specific volume
//! and temperature slots. A slot is either fixed at construction or filled on
//! first read by a resolver that may pull values from other stages. Resolved
//! values never change; a resolver that ends up reading its own unresolved
//! slot is reported as a circular dependency.

pub mod error;
pub mod ideal;
pub mod stage;

pub use error::{CycleError, CycleResult};
pub use ideal::{CycleSummary, IdealCycle, StageState};
pub use stage::{CycleStage, Resolver, SlotState, StageVariable};
