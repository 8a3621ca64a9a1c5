//! oc-core: stable foundation for the otto-cycle engine model.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (Real + tolerances + float helpers)
//! - memo (write-once cells for lazily derived quantities)
//! - error (shared error types)

pub mod error;
pub mod memo;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use memo::Memo;
pub use numeric::*;
pub use units::*;
