//! np-props: plasma gas property data for nanoplasma.
//!
//! Per-species thermophysical tables, radiative-loss curves, mole-fraction
//! compositions and the weighted mixture builder, plus reference data for
//! the precursor metals.

pub mod composition;
pub mod error;
pub mod library;
pub mod mixture;
pub mod radiation;
pub mod species;
pub mod table;

pub use composition::Composition;
pub use error::{PropsError, PropsResult};
pub use library::PropertyLibrary;
pub use mixture::MixtureBuilder;
pub use radiation::RadiationCurves;
pub use species::{
    Species, bulk_density_liquid, bulk_density_solid, melting_point, molar_mass, particle_mass,
};
pub use table::{PROPERTY_DOMAIN, PropertyColumn, PropertyTable};
