//! tl-core: stable foundation for tanklab.
//!
//! Contains:
//! - units (uom SI aliases + constructors + operator-unit conversions)
//! - numeric (Real + tolerances + float helpers + unset-aware extremum)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{TlError, TlResult};
pub use numeric::*;
pub use units::*;
