//! rh-core: shared foundation for rodheat.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (Real + float checks + quotient snapping)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

pub use error::{RhError, RhResult};
pub use numeric::*;
pub use units::*;
