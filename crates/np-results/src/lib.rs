//! np-results: run cache, profile tables and time series storage.

pub mod hash;
pub mod store;
pub mod types;

pub use hash::compute_run_id;
pub use store::RunStore;
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Run not found: {run_id}")]
    RunNotFound { run_id: String },

    #[error("Table '{name}' not found in run {run_id}")]
    TableNotFound { run_id: String, name: String },

    #[error("Malformed table {path}: {message}")]
    MalformedTable { path: String, message: String },

    #[error("Invalid path: {message}")]
    InvalidPath { message: String },
}
