//! Property data errors.

use np_core::{LookupError, NpError};
use thiserror::Error;

/// Result type for property operations.
pub type PropsResult<T> = Result<T, PropsError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PropsError {
    /// Name does not match any known species.
    #[error("Unknown species: {name}")]
    UnknownSpecies { name: String },

    /// Species is known but the requested quantity is not tabulated for it.
    #[error("{what} not available for {species}")]
    NotAvailable {
        species: &'static str,
        what: &'static str,
    },

    /// Malformed property table.
    #[error("Invalid property table: {what}")]
    InvalidTable { what: String },

    /// Species tables do not share one temperature grid.
    #[error("Temperature grid of {species} differs from the reference grid")]
    GridMismatch { species: &'static str },

    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Core(#[from] NpError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = PropsError::UnknownSpecies { name: "Xe".into() };
        assert!(err.to_string().contains("Xe"));

        let err = PropsError::NotAvailable {
            species: "Ar",
            what: "melting point",
        };
        assert_eq!(err.to_string(), "melting point not available for Ar");
    }

    #[test]
    fn lookup_error_converts() {
        let err: PropsError = LookupError::NothingFound.into();
        assert_eq!(err.to_string(), "Nothing found");
    }
}
