//! Error types for plant component operations.

use thiserror::Error;
use tl_core::error::TlError;

/// Errors that can occur during component construction and updates.
#[derive(Error, Debug, Clone)]
pub enum PlantError {
    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

pub type PlantResult<T> = Result<T, PlantError>;

impl From<PlantError> for TlError {
    fn from(e: PlantError) -> Self {
        match e {
            PlantError::NonPhysical { what } => TlError::InvalidArg { what },
            PlantError::InvalidArg { what } => TlError::InvalidArg { what },
        }
    }
}
