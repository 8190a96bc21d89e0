//! np-plasma: steady radial transport solver for a thermal plasma jet.
//!
//! The energy equation is solved with the axial electric field calibrated to
//! the coupled torch power; the momentum equation follows with the pressure
//! gradient calibrated to the requested gas flow. Post-processing turns the
//! mixture tables into the property tables consumed downstream.

pub mod batch;
pub mod error;
pub mod grid;
pub mod output;
pub mod post;
pub mod settings;
pub mod solver;
pub mod turbulence;

mod energy;
mod momentum;

pub use batch::solve_batch;
pub use error::{PlasmaError, PlasmaResult};
pub use grid::RadialGrid;
pub use output::PlasmaOutputs;
pub use post::{ProfileProperties, PropertyReport, ThermophysicalPostProcessor};
pub use settings::{PlasmaCase, PlasmaSettings};
pub use solver::{MomentumReport, PlasmaSolution, PlasmaTransportSolver, PowerReport, SolverStage};
pub use turbulence::TurbulenceProfile;
