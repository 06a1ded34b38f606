//! Discrete-time simulation engine for the three-tank transfer network.
//!
//! Provides:
//! - `EngineConfig` with named presets and explicit policy selection
//! - `PlantSim`: per-tick orchestration (interlocks, bounded transfer,
//!   metering, drain, thermal losses, history recording)
//! - boundary accessors for a presentation layer
//!
//! # Concurrency contract
//!
//! The engine is single-threaded and synchronous: it advances strictly on
//! discrete `advance` calls and never blocks or suspends. There is exactly
//! one logical writer (the tick driver); accessor reads are only consistent
//! *between* ticks. Reads issued concurrently with a tick are undefined
//! unless ticks and reads are serialized on the same thread, which the
//! reference design assumes.

pub mod config;
pub mod engine;
pub mod error;
pub mod history;

// Re-exports for public API
pub use config::{
    DEFAULT_HYSTERESIS_BAND_L, EngineConfig, HistoryCapacity, InterlockPolicy, MixingPolicy,
    TankSetup,
};
pub use engine::{PathFlow, PlantSim, PumpId, PumpStatus, Snapshot, TankAlarms, TankId};
pub use error::{SimError, SimResult};
pub use history::{History, Sample};
