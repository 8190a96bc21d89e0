//! Error types for the plasma solver.

use np_core::NpError;
use np_props::PropsError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlasmaError {
    #[error("Solver has no case: call set_case before solve")]
    NotInitialized,

    #[error("Setup error: {what}")]
    Setup { what: String },

    #[error("Numeric error: {what}")]
    Numeric { what: String },

    #[error("Core error: {0}")]
    Core(#[from] NpError),

    #[error("Property error: {0}")]
    Props(#[from] PropsError),
}

pub type PlasmaResult<T> = Result<T, PlasmaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singular_system_is_wrapped() {
        let err: PlasmaError = NpError::Singular { row: 3 }.into();
        assert!(err.to_string().contains("row 3"));
    }
}
