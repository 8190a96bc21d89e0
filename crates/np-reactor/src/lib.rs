//! np-reactor: precursor vapour transport through a chain of reactor cells.

pub mod coupling;
pub mod error;
pub mod profiles;
pub mod solver;

pub use coupling::{
    CellState, CoupledReactor, ParticleStage, ReactorRecord, ReactorSetup,
    precursor_inlet_fraction,
};
pub use error::{ReactorError, ReactorResult};
pub use profiles::ReferenceProfiles;
pub use solver::{SpeciesTransportSolver, TransportStep};
