//! Named two-column tables handed to the downstream CFD and particle models.

use np_core::NamedValues;

use crate::post::PropertyReport;
use crate::solver::PlasmaSolution;

/// A table of `(x, y)` rows.
pub type Table2 = Vec<(f64, f64)>;

/// Export bundle of one plasma solve.
///
/// Table names are the file names used by the consumers: `VR`, `TR`, `kR`,
/// `epsR`, `radiation.rad`, `rho`, `Cp`, `enthalpy`, `mu`, `kappa`,
/// `sigmaE`, `entropy`, `dCpdT`, `dHdT`, `dSdT`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlasmaOutputs {
    pub tables: NamedValues<Table2>,
    /// `(T_ref, ρ(T_ref))`
    pub reference_density: (f64, f64),
}

fn zip(x: &[f64], y: &[f64]) -> Table2 {
    x.iter().copied().zip(y.iter().copied()).collect()
}

impl PlasmaOutputs {
    pub fn assemble(solution: &PlasmaSolution, report: &PropertyReport) -> Self {
        let turb = &solution.turbulence;
        let t = &report.temperature;
        let mut tables = NamedValues::new();
        tables.insert("VR", zip(&solution.radius, &solution.velocity));
        tables.insert("TR", zip(&solution.radius, &solution.temperature));
        tables.insert("epsR", zip(&turb.radius, &turb.dissipation));
        tables.insert("kR", zip(&turb.radius, &turb.kinetic_energy));
        tables.insert(
            "radiation.rad",
            zip(&report.radiation_temperature, &report.radiation),
        );
        tables.insert("rho", zip(t, &report.density));
        tables.insert("Cp", zip(t, &report.heat_capacity));
        tables.insert("enthalpy", zip(t, &report.enthalpy));
        tables.insert("mu", zip(t, &report.viscosity));
        tables.insert("kappa", zip(t, &report.thermal_conductivity));
        tables.insert("sigmaE", zip(t, &report.electrical_conductivity));
        tables.insert("entropy", zip(t, &report.entropy));
        tables.insert("dCpdT", zip(t, &report.d_heat_capacity_dt));
        tables.insert("dHdT", zip(t, &report.d_enthalpy_dt));
        tables.insert("dSdT", zip(t, &report.d_entropy_dt));
        Self {
            tables,
            reference_density: (solution.reference_temperature, solution.reference_density),
        }
    }

    pub fn table(&self, name: &str) -> Option<&Table2> {
        self.tables.get(name)
    }
}
