//! hy-core: stable foundation for the hydronics engine.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (tolerances, finiteness checks, table interpolation)
//! - ids (arena handles for topology objects)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

pub use error::{HyError, HyResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
