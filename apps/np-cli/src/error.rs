//! CLI error type.

use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Case error: {0}")]
    Project(#[from] np_project::ProjectError),

    #[error("Results error: {0}")]
    Results(#[from] np_results::ResultsError),

    #[error("Property error: {0}")]
    Props(#[from] np_props::PropsError),

    #[error("Plasma solver error: {0}")]
    Plasma(#[from] np_plasma::PlasmaError),

    #[error("Reactor error: {0}")]
    Reactor(#[from] np_reactor::ReactorError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Case '{case}' has no {section} section")]
    MissingSection { case: String, section: &'static str },

    #[error("{failed} of {total} cases failed")]
    BatchFailed { failed: usize, total: usize },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },
}
