//! Plasma transport solver: power calibration followed by momentum calibration.

use std::sync::Arc;

use np_core::IterationOutcome;
use np_props::{Composition, MixtureBuilder, PropertyColumn, PropertyLibrary, PropertyTable};
use tracing::{debug, info, warn};

use crate::energy::EnergyModel;
use crate::error::{PlasmaError, PlasmaResult};
use crate::grid::RadialGrid;
use crate::momentum::MomentumModel;
use crate::settings::{PlasmaCase, PlasmaSettings};
use crate::turbulence::TurbulenceProfile;

/// Where the solver is in its life cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverStage {
    Uninitialized,
    /// Case set, nothing solved yet
    Ready,
    PowerCalibration,
    MomentumCalibration,
    /// Both loops met their tolerances
    Converged,
    /// Finished with at least one loop stopped by its cap
    CapReached,
}

/// Final state of the power calibration loop.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerReport {
    /// Axial electric field [V/m]
    pub field: f64,
    /// Arc current [A]
    pub current: f64,
    /// Power dissipated in the arc column `PL·E·I` [W]
    pub computed_power: f64,
    /// Coupled power the loop aimed for [W]
    pub target_power: f64,
    /// `(target − computed)/target`
    pub relative_error: f64,
    /// Inner temperature solves that stopped on their cap
    pub capped_inner_solves: usize,
}

/// Final state of the momentum loop.
#[derive(Debug, Clone, PartialEq)]
pub struct MomentumReport {
    /// Axial pressure gradient [Pa/m]
    pub pressure_gradient: f64,
    /// [kg/s]
    pub mass_flow: f64,
    /// Flow expressed at the reference temperature [slpm]
    pub flow_rate_slpm: f64,
}

/// Everything one solve produces.
#[derive(Debug, Clone, PartialEq)]
pub struct PlasmaSolution {
    pub radius: Vec<f64>,
    pub temperature: Vec<f64>,
    pub velocity: Vec<f64>,
    pub power: IterationOutcome<PowerReport>,
    pub momentum: IterationOutcome<MomentumReport>,
    pub turbulence: TurbulenceProfile,
    pub reference_temperature: f64,
    /// Mixture density at the reference temperature [kg/m³]
    pub reference_density: f64,
    pub composition: Composition,
    /// Mixture table the solve used
    pub mixture: PropertyTable,
}

impl PlasmaSolution {
    pub fn is_converged(&self) -> bool {
        self.power.is_converged() && self.momentum.is_converged()
    }
}

struct Prepared {
    case: PlasmaCase,
    mixture: PropertyTable,
    library: Arc<PropertyLibrary>,
}

/// Radial solver for one torch case.
///
/// Created empty; [`set_case`](Self::set_case) must run before
/// [`solve`](Self::solve). Every solve restarts from the initial guesses.
pub struct PlasmaTransportSolver {
    settings: PlasmaSettings,
    prepared: Option<Prepared>,
    stage: SolverStage,
}

impl PlasmaTransportSolver {
    pub fn new(settings: PlasmaSettings) -> PlasmaResult<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            prepared: None,
            stage: SolverStage::Uninitialized,
        })
    }

    pub fn settings(&self) -> &PlasmaSettings {
        &self.settings
    }

    pub fn stage(&self) -> SolverStage {
        self.stage
    }

    /// Mixture table of the current case.
    pub fn mixture(&self) -> Option<&PropertyTable> {
        self.prepared.as_ref().map(|p| &p.mixture)
    }

    /// Validate `case` and build its mixture table from `library`.
    pub fn set_case(&mut self, case: PlasmaCase, library: Arc<PropertyLibrary>) -> PlasmaResult<()> {
        case.validate()?;
        let mixture = MixtureBuilder::new(&library).build(&case.composition)?;
        self.prepared = Some(Prepared {
            case,
            mixture,
            library,
        });
        self.stage = SolverStage::Ready;
        Ok(())
    }

    pub fn solve(&mut self) -> PlasmaResult<PlasmaSolution> {
        let prepared = self.prepared.as_ref().ok_or(PlasmaError::NotInitialized)?;
        let s = &self.settings;
        let case = &prepared.case;
        let radius = case.radius_m();
        let grid = RadialGrid::new(radius, s.nodes)?;

        let target_power = case.power_w() * s.coupling_efficiency;
        let arc_length = s.torch_length_factor * radius;

        let mut temperature = vec![s.initial_temperature; s.nodes];
        let mut velocity = vec![0.0; s.nodes];
        let mut field = s.initial_field;
        let mut target_current = target_power / s.initial_current_divisor;

        self.stage = SolverStage::PowerCalibration;
        info!(target_power, radius, "power calibration started");
        let energy = EnergyModel {
            grid: &grid,
            mixture: &prepared.mixture,
            radiation: prepared.library.radiation(),
            composition: &case.composition,
            settings: s,
        };

        let mut power_err = f64::INFINITY;
        let mut outer = 0;
        let mut capped_inner_solves = 0;
        let mut current = 0.0;
        let mut computed_power = 0.0;
        while power_err.abs() >= s.power_tolerance && outer < s.max_power_iterations {
            let sweep = energy.sweep(&mut temperature, &mut field, target_current)?;
            if !sweep.converged {
                capped_inner_solves += 1;
                warn!(
                    outer,
                    iterations = sweep.iterations,
                    "temperature solve stopped at its iteration cap"
                );
            }
            current = sweep.current;
            computed_power = arc_length * field * current;
            power_err = (target_power - computed_power) / target_power;
            target_current *= 1.0 + power_err;
            outer += 1;
            debug!(
                outer,
                inner = sweep.iterations,
                field,
                current,
                power_err,
                "power iteration"
            );
        }
        let power_converged = power_err.abs() < s.power_tolerance;
        if !power_converged {
            warn!(outer, power_err, "power calibration stopped at its iteration cap");
        }
        let power = IterationOutcome::from_flag(
            power_converged,
            PowerReport {
                field,
                current,
                computed_power,
                target_power,
                relative_error: power_err,
                capped_inner_solves,
            },
            outer,
        );

        self.stage = SolverStage::MomentumCalibration;
        info!(
            field,
            axis_temperature = temperature[0],
            "momentum calibration started"
        );
        let momentum_model = MomentumModel {
            grid: &grid,
            mixture: &prepared.mixture,
            settings: s,
        };
        let sweep = momentum_model.sweep(
            &temperature,
            &mut velocity,
            s.initial_pressure_gradient,
            case.flow_rate_slpm,
        )?;
        if !sweep.converged {
            warn!(
                iterations = sweep.iterations,
                "momentum calibration stopped at its iteration cap"
            );
        }
        let momentum = IterationOutcome::from_flag(
            sweep.converged,
            MomentumReport {
                pressure_gradient: sweep.pressure_gradient,
                mass_flow: sweep.mass_flow,
                flow_rate_slpm: sweep.flow_rate_slpm,
            },
            sweep.iterations,
        );

        let turbulence = TurbulenceProfile::estimate(
            grid.radii(),
            &temperature,
            &velocity,
            &prepared.mixture,
        )?;
        let reference_density = prepared
            .mixture
            .interpolate(s.reference_temperature, PropertyColumn::Density);

        let solution = PlasmaSolution {
            radius: grid.radii().to_vec(),
            temperature,
            velocity,
            power,
            momentum,
            turbulence,
            reference_temperature: s.reference_temperature,
            reference_density,
            composition: case.composition,
            mixture: prepared.mixture.clone(),
        };
        self.stage = if solution.is_converged() {
            SolverStage::Converged
        } else {
            SolverStage::CapReached
        };
        info!(stage = ?self.stage, "plasma solve finished");
        Ok(solution)
    }
}
