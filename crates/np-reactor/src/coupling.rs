//! Time stepping of the reactor cells with an optional particle model.

use std::sync::Arc;

use np_core::{IterationOutcome, NamedValues};
use np_props::{Composition, Species};
use tracing::{debug, info};

use crate::error::{ReactorError, ReactorResult};
use crate::profiles::ReferenceProfiles;
use crate::solver::SpeciesTransportSolver;

/// Mole fraction of precursor vapour at the inlet.
///
/// `feed_rate` is in kg/s and `molar_mass` in g/mol, giving a molar feed
/// `n = feed_rate / molar_mass / 1e-3` that is mixed with `carrier_total`.
pub fn precursor_inlet_fraction(
    feed_rate: f64,
    molar_mass: f64,
    carrier_total: f64,
) -> ReactorResult<f64> {
    if !(molar_mass.is_finite() && molar_mass > 0.0) {
        return Err(ReactorError::InvalidArg {
            what: format!("molar mass must be positive, got {molar_mass}"),
        });
    }
    if !(feed_rate.is_finite() && feed_rate >= 0.0) {
        return Err(ReactorError::InvalidArg {
            what: format!("feed rate must be non-negative, got {feed_rate}"),
        });
    }
    let molar_feed = feed_rate / molar_mass / 1e-3;
    let total = molar_feed + carrier_total;
    if !(total.is_finite() && total > 0.0) {
        return Err(ReactorError::InvalidArg {
            what: "inlet gas is empty".to_string(),
        });
    }
    Ok(molar_feed / total)
}

/// Reactor operating point.
#[derive(Debug, Clone, PartialEq)]
pub struct ReactorSetup {
    pub n_cells: usize,
    /// Reactor length [m]
    pub length: f64,
    pub precursor: Species,
    /// Precursor feed [kg/s]
    pub feed_rate: f64,
    /// Carrier gas entering with the precursor
    pub carrier: Composition,
}

/// Flow state and gas composition of one reactor cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CellState {
    pub index: usize,
    pub velocity: f64,
    pub temperature: f64,
    pub pressure: f64,
    /// Mole fractions keyed by species name
    pub composition: NamedValues<f64>,
}

impl CellState {
    pub fn mole_fraction(&self, species: Species) -> ReactorResult<f64> {
        Ok(self.composition.extract_one(species.key())?)
    }

    /// Scale the mole fractions so they sum to one.
    pub fn renormalise(&mut self) {
        let sum: f64 = self.composition.iter().map(|(_, x)| x).sum();
        if sum > 0.0 && sum.is_finite() {
            for x in self.composition.values_mut() {
                *x /= sum;
            }
        }
    }
}

/// Hook for a particle model advanced after every transport step.
pub trait ParticleStage: Send {
    /// Advance from `time - dt` to `time`; may change the cell compositions.
    fn advance(&mut self, time: f64, dt: f64, cells: &mut [CellState]) -> ReactorResult<()>;
}

/// Per-cell values after one coupled step.
#[derive(Debug, Clone, PartialEq)]
pub struct ReactorRecord {
    pub time: f64,
    /// Suggested step after this one [s]
    pub dt: f64,
    pub precursor_fraction: Vec<f64>,
    pub velocity: Vec<f64>,
    pub temperature: Vec<f64>,
    pub pressure: Vec<f64>,
}

/// Transport solver and cell states advanced together.
pub struct CoupledReactor {
    solver: SpeciesTransportSolver,
    precursor: Species,
    inlet_fraction: f64,
    cells: Vec<CellState>,
    particles: Option<Box<dyn ParticleStage>>,
    time: f64,
    steps: usize,
    record_interval: usize,
    records: Vec<ReactorRecord>,
}

impl CoupledReactor {
    pub fn new(setup: &ReactorSetup, profiles: Arc<ReferenceProfiles>) -> ReactorResult<Self> {
        if setup.precursor.is_carrier() {
            return Err(ReactorError::InvalidArg {
                what: format!("{} is a carrier gas, not a precursor", setup.precursor),
            });
        }
        let carrier: Vec<(Species, f64)> =
            setup.carrier.iter().filter(|(_, x)| *x > 0.0).collect();
        let carrier_total: f64 = carrier.iter().map(|(_, x)| x).sum();
        let inlet_fraction = precursor_inlet_fraction(
            setup.feed_rate,
            setup.precursor.molar_mass(),
            carrier_total,
        )?;
        let molar_feed = setup.feed_rate / setup.precursor.molar_mass() / 1e-3;

        let mut solver = SpeciesTransportSolver::with_profiles(profiles);
        solver.set_domain(setup.n_cells, setup.length, inlet_fraction)?;

        let velocity = solver.cell_velocity()?;
        let temperature = solver.cell_temperature()?;
        let pressure = solver.cell_pressure()?;
        let mut cells = Vec::with_capacity(setup.n_cells);
        for index in 0..setup.n_cells {
            let mut composition: NamedValues<f64> =
                carrier.iter().map(|(s, x)| (s.key(), *x)).collect();
            composition.insert(setup.precursor.key(), 0.0);
            if index == 0 {
                for x in composition.values_mut() {
                    *x /= molar_feed + carrier_total;
                }
                composition.insert(setup.precursor.key(), inlet_fraction);
            }
            cells.push(CellState {
                index,
                velocity: velocity[index],
                temperature: temperature[index],
                pressure: pressure[index],
                composition,
            });
        }
        info!(
            precursor = %setup.precursor,
            inlet_fraction,
            n_cells = setup.n_cells,
            "coupled reactor initialised"
        );

        Ok(Self {
            solver,
            precursor: setup.precursor,
            inlet_fraction,
            cells,
            particles: None,
            time: 0.0,
            steps: 0,
            record_interval: 1,
            records: Vec::new(),
        })
    }

    pub fn with_particle_stage(mut self, stage: Box<dyn ParticleStage>) -> Self {
        self.particles = Some(stage);
        self
    }

    /// Keep every `every`-th step in [`records`](Self::records); `run_until`
    /// also keeps its final step. Zero is treated as one.
    pub fn with_record_interval(mut self, every: usize) -> Self {
        self.record_interval = every.max(1);
        self
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn inlet_fraction(&self) -> f64 {
        self.inlet_fraction
    }

    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    pub fn records(&self) -> &[ReactorRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ReactorRecord> {
        self.records
    }

    pub fn solver(&self) -> &SpeciesTransportSolver {
        &self.solver
    }

    /// One transport step to time `t`, then the particle stage.
    pub fn advance(&mut self, t: f64) -> ReactorResult<ReactorRecord> {
        let cs = self
            .cells
            .iter()
            .map(|c| c.mole_fraction(self.precursor))
            .collect::<ReactorResult<Vec<f64>>>()?;
        let step = self.solver.run(t, &cs)?;

        for (i, cell) in self.cells.iter_mut().enumerate() {
            cell.velocity = step.velocity[i];
            cell.temperature = step.temperature[i];
            cell.pressure = step.pressure[i];
            cell.composition
                .insert(self.precursor.key(), step.concentrations[i]);
            cell.renormalise();
        }

        let dt = t - self.time;
        if let Some(stage) = self.particles.as_mut() {
            stage.advance(t, dt, &mut self.cells)?;
        }
        self.time = t;

        let precursor_fraction = self
            .cells
            .iter()
            .map(|c| c.mole_fraction(self.precursor))
            .collect::<ReactorResult<Vec<f64>>>()?;
        debug!(time = t, dt, outlet = precursor_fraction.last().copied(), "reactor step");
        let record = ReactorRecord {
            time: t,
            dt: step.dt,
            precursor_fraction,
            velocity: step.velocity,
            temperature: step.temperature,
            pressure: step.pressure,
        };
        self.steps += 1;
        if self.steps % self.record_interval == 0 {
            self.records.push(record.clone());
        }
        Ok(record)
    }

    /// Step with the suggested time step until `t_end` or `max_steps`.
    ///
    /// The final step is shortened to land on `t_end`. The outcome carries the
    /// time reached.
    pub fn run_until(&mut self, t_end: f64, max_steps: usize) -> ReactorResult<IterationOutcome<f64>> {
        let mut steps = 0;
        let mut last = None;
        while self.time < t_end && steps < max_steps {
            let dt = self.solver.dt()?;
            let t = (self.time + dt).min(t_end);
            last = Some(self.advance(t)?);
            steps += 1;
        }
        if let Some(record) = last
            && self.records.last().map(|r| r.time) != Some(record.time)
        {
            self.records.push(record);
        }
        Ok(IterationOutcome::from_flag(
            self.time >= t_end,
            self.time,
            steps,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> ReactorSetup {
        ReactorSetup {
            n_cells: 10,
            length: 1.0,
            precursor: Species::Si,
            feed_rate: 1e-6,
            carrier: Composition::new_mole_fractions(vec![(Species::Ar, 0.9), (Species::H2, 0.1)])
                .unwrap(),
        }
    }

    fn reactor() -> CoupledReactor {
        CoupledReactor::new(&setup(), Arc::new(ReferenceProfiles::builtin().unwrap())).unwrap()
    }

    #[test]
    fn inlet_fraction_formula() {
        let f = precursor_inlet_fraction(1e-3, 28.085, 1.0).unwrap();
        let n = 1e-3 / 28.085 / 1e-3;
        assert!((f - n / (n + 1.0)).abs() < 1e-15);
        assert_eq!(precursor_inlet_fraction(0.0, 28.085, 1.0).unwrap(), 0.0);
        assert!(precursor_inlet_fraction(1e-3, 0.0, 1.0).is_err());
    }

    #[test]
    fn first_cell_holds_inlet_mixture() {
        let r = reactor();
        let first = &r.cells()[0];
        assert_eq!(first.mole_fraction(Species::Si).unwrap(), r.inlet_fraction());
        let sum: f64 = first.composition.iter().map(|(_, x)| x).sum();
        assert!((sum - 1.0).abs() < 1e-12);
        assert_eq!(r.cells()[1].mole_fraction(Species::Si).unwrap(), 0.0);
    }

    #[test]
    fn carrier_precursor_is_rejected() {
        let bad = ReactorSetup {
            precursor: Species::N2,
            ..setup()
        };
        let profiles = Arc::new(ReferenceProfiles::builtin().unwrap());
        assert!(CoupledReactor::new(&bad, profiles).is_err());
    }

    #[test]
    fn compositions_stay_normalised() {
        let mut r = reactor();
        let outcome = r.run_until(1e-3, 10_000).unwrap();
        assert!(outcome.is_converged());
        assert_eq!(*outcome.state(), 1e-3);
        for cell in r.cells() {
            let sum: f64 = cell.composition.iter().map(|(_, x)| x).sum();
            assert!((sum - 1.0).abs() < 1e-12, "cell {}", cell.index);
        }
        assert_eq!(r.records().len(), outcome.iterations());
    }

    #[test]
    fn step_cap_is_reported() {
        let mut r = reactor();
        let outcome = r.run_until(10.0, 3).unwrap();
        assert!(!outcome.is_converged());
        assert_eq!(outcome.iterations(), 3);
        assert_eq!(r.records().len(), 3);
    }

    #[test]
    fn record_interval_thins_history_and_keeps_last_step() {
        let mut r = reactor().with_record_interval(4);
        let outcome = r.run_until(10.0, 10).unwrap();
        assert_eq!(outcome.iterations(), 10);
        let times: Vec<f64> = r.records().iter().map(|rec| rec.time).collect();
        assert_eq!(times.len(), 3);
        assert_eq!(times[2], r.time());
        assert!(times.windows(2).all(|w| w[1] > w[0]));
    }

    struct Consume {
        calls: usize,
    }

    impl ParticleStage for Consume {
        fn advance(&mut self, _time: f64, dt: f64, cells: &mut [CellState]) -> ReactorResult<()> {
            assert!(dt > 0.0);
            self.calls += 1;
            for cell in cells {
                cell.composition.insert("Si", 0.0);
                cell.renormalise();
            }
            Ok(())
        }
    }

    #[test]
    fn particle_stage_runs_after_transport() {
        let mut r = reactor().with_particle_stage(Box::new(Consume { calls: 0 }));
        let t = r.solver().dt().unwrap();
        let record = r.advance(t).unwrap();
        assert!(record.precursor_fraction.iter().all(|x| *x == 0.0));
    }
}
