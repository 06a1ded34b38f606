//! Error types for engine operations.

use thiserror::Error;

/// Errors encountered while constructing or advancing the engine.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Backend error: {message}")]
    Backend { message: String },
}

pub type SimResult<T> = Result<T, SimError>;

impl From<tl_plant::PlantError> for SimError {
    fn from(e: tl_plant::PlantError) -> Self {
        SimError::Backend {
            message: e.to_string(),
        }
    }
}

impl From<tl_core::error::TlError> for SimError {
    fn from(e: tl_core::error::TlError) -> Self {
        SimError::Backend {
            message: e.to_string(),
        }
    }
}
