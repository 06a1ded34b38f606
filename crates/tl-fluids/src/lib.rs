//! tl-fluids: liquid property calculations for tanklab.
//!
//! Provides:
//! - `LiquidModel` trait for bulk property calculations
//! - `PropertyPack` for batched property queries
//! - `SimpleWater`: correlation-based water model
//! - `LinearWater`: coarser linear density fit used by the trainer preset
//!
//! # Architecture
//!
//! This crate defines a stable API (`LiquidModel` trait) that isolates the
//! rest of tanklab from the concrete correlations. All inputs are bulk
//! temperatures in °C; implementations clamp to their valid range rather than
//! reject, so property evaluation is total.

pub mod model;
pub mod water;

// Re-exports for ergonomics
pub use model::{LiquidModel, PropertyPack};
pub use water::{LinearWater, SimpleWater};
