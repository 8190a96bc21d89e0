//! np-core: shared numerics for nanoplasma.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (Real + tolerances + float helpers)
//! - interp (clamped linear curves)
//! - calculus (finite-difference derivative, cumulative trapezoid)
//! - linalg (tridiagonal direct solve)
//! - iteration (tagged outcome of bounded fixed-point loops)
//! - lookup (name -> value tables with explicit not-found results)
//! - error (shared error types)

pub mod calculus;
pub mod error;
pub mod interp;
pub mod iteration;
pub mod linalg;
pub mod lookup;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use calculus::{cumulative_trapezoid, derivative};
pub use error::{LookupError, NpError, NpResult};
pub use interp::Curve;
pub use iteration::IterationOutcome;
pub use linalg::solve_tridiagonal;
pub use lookup::NamedValues;
pub use numeric::*;
pub use units::*;
