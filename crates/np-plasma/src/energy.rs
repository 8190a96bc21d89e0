//! Temperature equation with the field rescaled to a target current.

use np_core::relative_change;
use np_props::{Composition, PropertyColumn, PropertyTable, RadiationCurves};

use crate::error::{PlasmaError, PlasmaResult};
use crate::grid::{RadialGrid, relax};
use crate::settings::PlasmaSettings;

pub(crate) struct EnergyModel<'a> {
    pub grid: &'a RadialGrid,
    pub mixture: &'a PropertyTable,
    pub radiation: &'a RadiationCurves,
    pub composition: &'a Composition,
    pub settings: &'a PlasmaSettings,
}

/// Result of one relaxed temperature solve.
pub(crate) struct EnergySweep {
    pub iterations: usize,
    pub converged: bool,
    /// Arc current evaluated with the field before its last rescale [A]
    pub current: f64,
}

fn ensure_finite(profile: &[f64], stage: &str, iteration: usize) -> PlasmaResult<()> {
    match profile.iter().position(|t| !t.is_finite()) {
        None => Ok(()),
        Some(node) => Err(PlasmaError::Numeric {
            what: format!(
                "{stage} temperature is {} at node {node}, inner iteration {iteration}",
                profile[node]
            ),
        }),
    }
}

impl EnergyModel<'_> {
    /// Arc current `Σ 2π·dr·r·σ(T)·E`.
    pub fn current(&self, temperature: &[f64], field: f64) -> f64 {
        let sigma = self
            .mixture
            .interpolate_many(temperature, PropertyColumn::ElectricalConductivity);
        self.grid.integrate_disc(&sigma) * field
    }

    /// Relax the temperature profile towards the Elenbaas-Heller balance
    /// between Joule heating, conduction and radiation. After every solve the
    /// field is scaled so the current equals `target_current`.
    pub fn sweep(
        &self,
        temperature: &mut Vec<f64>,
        field: &mut f64,
        target_current: f64,
    ) -> PlasmaResult<EnergySweep> {
        let s = self.settings;
        let dr = self.grid.spacing();
        let mut err = f64::INFINITY;
        let mut iterations = 0;
        let mut current = 0.0;

        while err >= s.field_tolerance && iterations < s.max_inner_iterations {
            ensure_finite(temperature, "input", iterations)?;
            let kappa = self
                .mixture
                .interpolate_many(temperature, PropertyColumn::ThermalConductivity);
            let sigma = self
                .mixture
                .interpolate_many(temperature, PropertyColumn::ElectricalConductivity);
            let e2 = *field * *field;
            let source: Vec<f64> = self
                .grid
                .radii()
                .iter()
                .zip(temperature.iter())
                .zip(&sigma)
                .map(|((r, &t), sig)| {
                    let loss = self.radiation.mixture_loss(self.composition, t);
                    -dr * r * (sig * e2 - loss)
                })
                .collect();

            let solved = self
                .grid
                .solve_diffusion(&kappa, source, s.wall_temperature)?;
            let next = relax(&solved, temperature, s.energy_relaxation);
            ensure_finite(&next, "solved", iterations)?;

            current = self.current(&next, *field);
            if !(current.is_finite() && current > 0.0) {
                return Err(PlasmaError::Numeric {
                    what: format!("arc current is {current} at inner iteration {iterations}"),
                });
            }
            *field *= target_current / current;

            if iterations > s.residual_check_after {
                err = relative_change(&next, temperature);
            }
            *temperature = next;
            iterations += 1;
        }

        Ok(EnergySweep {
            iterations,
            converged: err < s.field_tolerance,
            current,
        })
    }
}
