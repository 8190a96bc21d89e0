use thiserror::Error;

pub type NpResult<T> = Result<T, NpError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NpError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Singular linear system: zero pivot at row {row}")]
    Singular { row: usize },
}

/// Failure of a name-based extraction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("Nothing found")]
    NothingFound,

    #[error("Not found: {}", names.join(", "))]
    Missing { names: Vec<String> },
}
