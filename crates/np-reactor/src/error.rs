//! Error types for reactor transport.

use np_core::{LookupError, NpError};
use np_props::PropsError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReactorError {
    #[error("Reactor domain not set: call set_domain first")]
    DomainNotSet,

    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error("Numeric error: {what}")]
    Numeric { what: String },

    #[error("Invalid reference profile: {what}")]
    Profile { what: String },

    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    #[error("Core error: {0}")]
    Core(#[from] NpError),

    #[error("Property error: {0}")]
    Props(#[from] PropsError),

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

pub type ReactorResult<T> = Result<T, ReactorError>;
