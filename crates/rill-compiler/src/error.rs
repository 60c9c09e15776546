//! Lowering errors
//!
//! Every variant is a compiler-internal fault: a malformed user tree or
//! inconsistent script metadata indicates a defect in an earlier phase (or in
//! the lowering pass itself) and aborts compilation of the current script.

use crate::location::Location;
use thiserror::Error;

pub type LowerResult<T> = Result<T, LowerError>;

#[derive(Debug, Error)]
pub enum LowerError {
    #[error("illegal tree structure at {location}: {message}")]
    IllegalTree { location: Location, message: String },

    #[error("missing or inconsistent signature for function {name} at {location}")]
    MissingSignature { location: Location, name: String },

    #[error("cannot derive a variable name from method {name} at {location}")]
    InvalidAccessorName { location: Location, name: String },

    #[error("duplicate entry point function {name} at {location}")]
    DuplicateEntryPoint { location: Location, name: String },
}

impl LowerError {
    /// Best-available source location for the fault
    pub fn location(&self) -> &Location {
        match self {
            LowerError::IllegalTree { location, .. }
            | LowerError::MissingSignature { location, .. }
            | LowerError::InvalidAccessorName { location, .. }
            | LowerError::DuplicateEntryPoint { location, .. } => location,
        }
    }
}
