//! Axial momentum equation with the pressure gradient tuned to the flow rate.

use np_core::relative_change;
use np_core::units::constants::LPM_PER_M3PS;
use np_props::{PropertyColumn, PropertyTable};

use crate::error::{PlasmaError, PlasmaResult};
use crate::grid::{RadialGrid, relax};
use crate::settings::PlasmaSettings;

pub(crate) struct MomentumModel<'a> {
    pub grid: &'a RadialGrid,
    pub mixture: &'a PropertyTable,
    pub settings: &'a PlasmaSettings,
}

pub(crate) struct MomentumSweep {
    pub iterations: usize,
    pub converged: bool,
    pub pressure_gradient: f64,
    pub mass_flow: f64,
    pub flow_rate_slpm: f64,
}

impl MomentumModel<'_> {
    /// Relax the velocity profile for a frozen temperature field. The
    /// pressure gradient is nudged towards `target_slpm` on every iteration.
    pub fn sweep(
        &self,
        temperature: &[f64],
        velocity: &mut Vec<f64>,
        mut pressure_gradient: f64,
        target_slpm: f64,
    ) -> PlasmaResult<MomentumSweep> {
        let s = self.settings;
        let dr = self.grid.spacing();
        let mu = self
            .mixture
            .interpolate_many(temperature, PropertyColumn::Viscosity);
        let rho = self
            .mixture
            .interpolate_many(temperature, PropertyColumn::Density);
        let rho_ref = self
            .mixture
            .interpolate(s.reference_temperature, PropertyColumn::Density);

        let mut err = f64::INFINITY;
        let mut iterations = 0;
        let mut mass_flow = 0.0;
        let mut flow_rate = 0.0;

        while err >= s.field_tolerance && iterations < s.max_momentum_iterations {
            let source: Vec<f64> = self
                .grid
                .radii()
                .iter()
                .map(|r| -dr * r * pressure_gradient)
                .collect();
            let solved = self.grid.solve_diffusion(&mu, source, 0.0)?;
            let next = relax(&solved, velocity, s.momentum_relaxation);

            let flux: Vec<f64> = rho.iter().zip(&next).map(|(d, v)| d * v).collect();
            mass_flow = self.grid.integrate_disc(&flux);
            flow_rate = LPM_PER_M3PS * mass_flow / rho_ref;
            if !(flow_rate.is_finite() && flow_rate > 0.0) {
                return Err(PlasmaError::Numeric {
                    what: format!("flow rate is {flow_rate} at momentum iteration {iterations}"),
                });
            }
            pressure_gradient *= 0.95 + 0.05 * target_slpm / flow_rate;

            if iterations > s.residual_check_after {
                err = relative_change(&next, velocity);
            }
            *velocity = next;
            iterations += 1;
        }

        Ok(MomentumSweep {
            iterations,
            converged: err < s.field_tolerance,
            pressure_gradient,
            mass_flow,
            flow_rate_slpm: flow_rate,
        })
    }
}
