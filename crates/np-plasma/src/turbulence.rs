//! Inlet turbulence estimates from the converged velocity profile.

use np_props::{PropertyColumn, PropertyTable};

use crate::error::{PlasmaError, PlasmaResult};

/// Cμ of the standard k-ε model.
const C_MU: f64 = 0.09;

/// Turbulence quantities on every radial node except the wall.
#[derive(Debug, Clone, PartialEq)]
pub struct TurbulenceProfile {
    pub radius: Vec<f64>,
    /// Turbulence intensity `0.16·Re^(-1/8)`
    pub intensity: Vec<f64>,
    /// Mixing length `0.07·D/Cμ^(3/4)` [m]
    pub length_scale: f64,
    /// Turbulent kinetic energy `1.5·(I·V)²` [m²/s²]
    pub kinetic_energy: Vec<f64>,
    /// Dissipation rate `Cμ^(3/4)·k^(3/2)/L` [m²/s³]
    pub dissipation: Vec<f64>,
}

impl TurbulenceProfile {
    /// `Re = D·V/μ(T)` with `D = 2R`. Nodes at rest get zero intensity.
    ///
    /// All three profiles must share the grid of `radius`.
    pub fn estimate(
        radius: &[f64],
        temperature: &[f64],
        velocity: &[f64],
        mixture: &PropertyTable,
    ) -> PlasmaResult<Self> {
        if temperature.len() != radius.len() || velocity.len() != radius.len() {
            return Err(PlasmaError::Setup {
                what: format!(
                    "turbulence profiles need {} nodes, got {} temperatures and {} velocities",
                    radius.len(),
                    temperature.len(),
                    velocity.len()
                ),
            });
        }
        let n = radius.len().saturating_sub(1);
        let diameter = 2.0 * radius.last().copied().unwrap_or(0.0);
        let mu = mixture.interpolate_many(&temperature[..n], PropertyColumn::Viscosity);
        let length_scale = 0.07 * diameter / C_MU.powf(0.75);

        let mut intensity = Vec::with_capacity(n);
        let mut kinetic_energy = Vec::with_capacity(n);
        let mut dissipation = Vec::with_capacity(n);
        for (v, mu) in velocity[..n].iter().zip(&mu) {
            let re = diameter * v / mu;
            let i_t = if re > 0.0 { 0.16 * re.powf(-0.125) } else { 0.0 };
            let k = 1.5 * (i_t * v).powi(2);
            intensity.push(i_t);
            kinetic_energy.push(k);
            dissipation.push(C_MU.powf(0.75) * k.powf(1.5) / length_scale);
        }

        Ok(Self {
            radius: radius[..n].to_vec(),
            intensity,
            length_scale,
            kinetic_energy,
            dissipation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use np_props::PropertyTable;

    fn constant_viscosity(mu: f64) -> PropertyTable {
        PropertyTable::from_rows(&[
            [1.0, 300.0, 1.0, mu, 1.0, 1.0, 1.0, 1.0],
            [2.0, 30_000.0, 1.0, mu, 1.0, 1.0, 1.0, 1.0],
        ])
        .unwrap()
    }

    #[test]
    fn drops_the_wall_node() {
        let t = TurbulenceProfile::estimate(
            &[0.0, 0.5, 1.0],
            &[1000.0; 3],
            &[2.0, 1.0, 0.0],
            &constant_viscosity(1e-4),
        )
        .unwrap();
        assert_eq!(t.radius, vec![0.0, 0.5]);
        assert_eq!(t.kinetic_energy.len(), 2);
    }

    #[test]
    fn matches_closed_form() {
        let mu = 2e-4;
        let r = 0.01;
        let v = 100.0;
        let t = TurbulenceProfile::estimate(
            &[0.0, r],
            &[5000.0, 500.0],
            &[v, 0.0],
            &constant_viscosity(mu),
        )
        .unwrap();
        let re: f64 = 2.0 * r * v / mu;
        let i_t = 0.16 * re.powf(-1.0 / 8.0);
        let k = 1.5 * (i_t * v).powi(2);
        let l = 0.07 * 2.0 * r / 0.09f64.powf(0.75);
        assert!((t.intensity[0] - i_t).abs() < 1e-12);
        assert!((t.kinetic_energy[0] - k).abs() < 1e-9 * k);
        assert!((t.length_scale - l).abs() < 1e-15);
        let eps = 0.09f64.powf(0.75) * k.powf(1.5) / l;
        assert!((t.dissipation[0] - eps).abs() < 1e-9 * eps);
    }

    #[test]
    fn mismatched_profiles_are_rejected() {
        let mixture = constant_viscosity(1e-4);
        let short_velocity =
            TurbulenceProfile::estimate(&[0.0, 0.5, 1.0], &[1000.0; 3], &[1.0], &mixture);
        assert!(matches!(short_velocity, Err(PlasmaError::Setup { .. })));
        let short_temperature =
            TurbulenceProfile::estimate(&[0.0, 0.5, 1.0], &[1000.0], &[1.0; 3], &mixture);
        assert!(matches!(short_temperature, Err(PlasmaError::Setup { .. })));
        let empty = TurbulenceProfile::estimate(&[], &[], &[], &mixture).unwrap();
        assert!(empty.radius.is_empty());
    }

    #[test]
    fn fluid_at_rest_has_no_turbulence() {
        let t = TurbulenceProfile::estimate(
            &[0.0, 0.5, 1.0],
            &[1000.0; 3],
            &[0.0; 3],
            &constant_viscosity(1e-4),
        )
        .unwrap();
        assert!(t.kinetic_energy.iter().all(|k| *k == 0.0));
        assert!(t.dissipation.iter().all(|e| *e == 0.0));
    }
}
