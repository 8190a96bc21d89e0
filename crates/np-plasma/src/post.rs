//! Thermophysical post-processing of the mixture tables.

use np_core::{cumulative_trapezoid, derivative, linspace};
use np_props::{PropertyColumn, RadiationCurves};

use crate::error::PlasmaResult;
use crate::solver::PlasmaSolution;

/// Temperatures of the exported radiation table [K].
const RADIATION_TABLE_START: f64 = 3_000.0;
const RADIATION_TABLE_END: f64 = 30_000.0;
/// Radiation rows below the tabulated loss data, written as zero.
const RADIATION_ZERO_ROWS: usize = 2;

/// Mixture properties on the table grid, with derived quantities.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyReport {
    pub temperature: Vec<f64>,
    pub density: Vec<f64>,
    pub heat_capacity: Vec<f64>,
    pub enthalpy: Vec<f64>,
    pub viscosity: Vec<f64>,
    pub thermal_conductivity: Vec<f64>,
    pub electrical_conductivity: Vec<f64>,
    /// `∫ Cp/T dT` from the first table temperature
    pub entropy: Vec<f64>,
    pub d_heat_capacity_dt: Vec<f64>,
    pub d_enthalpy_dt: Vec<f64>,
    pub d_entropy_dt: Vec<f64>,
    pub radiation_temperature: Vec<f64>,
    pub radiation: Vec<f64>,
}

/// Mixture properties at the temperatures reached on the radial grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileProperties {
    pub radius: Vec<f64>,
    pub temperature: Vec<f64>,
    pub density: Vec<f64>,
    pub viscosity: Vec<f64>,
    pub thermal_conductivity: Vec<f64>,
    pub electrical_conductivity: Vec<f64>,
    pub enthalpy: Vec<f64>,
    pub heat_capacity: Vec<f64>,
    pub radiative_loss: Vec<f64>,
}

pub struct ThermophysicalPostProcessor<'a> {
    radiation: &'a RadiationCurves,
}

fn pairs(x: &[f64], y: &[f64]) -> Vec<(f64, f64)> {
    x.iter().copied().zip(y.iter().copied()).collect()
}

impl<'a> ThermophysicalPostProcessor<'a> {
    pub fn new(radiation: &'a RadiationCurves) -> Self {
        Self { radiation }
    }

    pub fn report(&self, solution: &PlasmaSolution) -> PlasmaResult<PropertyReport> {
        let table = &solution.mixture;
        let t = table.temperatures().to_vec();
        let col = |c| table.column(c).to_vec();
        let heat_capacity = col(PropertyColumn::HeatCapacity);
        let enthalpy = col(PropertyColumn::Enthalpy);

        let cp_over_t: Vec<f64> = heat_capacity.iter().zip(&t).map(|(cp, t)| cp / t).collect();
        let entropy = cumulative_trapezoid(&cp_over_t, &t)?;

        let d_heat_capacity_dt = derivative(&pairs(&t, &heat_capacity))?;
        let d_enthalpy_dt = derivative(&pairs(&t, &enthalpy))?;
        let d_entropy_dt = derivative(&pairs(&t, &entropy))?;

        let rows = ((RADIATION_TABLE_END - RADIATION_TABLE_START) / 1000.0) as usize + 1;
        let radiation_temperature = linspace(RADIATION_TABLE_START, RADIATION_TABLE_END, rows);
        let radiation = radiation_temperature
            .iter()
            .enumerate()
            .map(|(i, &t)| {
                if i < RADIATION_ZERO_ROWS {
                    0.0
                } else {
                    self.radiation.mixture_loss(&solution.composition, t)
                }
            })
            .collect();

        Ok(PropertyReport {
            density: col(PropertyColumn::Density),
            viscosity: col(PropertyColumn::Viscosity),
            thermal_conductivity: col(PropertyColumn::ThermalConductivity),
            electrical_conductivity: col(PropertyColumn::ElectricalConductivity),
            temperature: t,
            heat_capacity,
            enthalpy,
            entropy,
            d_heat_capacity_dt,
            d_enthalpy_dt,
            d_entropy_dt,
            radiation_temperature,
            radiation,
        })
    }

    pub fn profile_properties(&self, solution: &PlasmaSolution) -> ProfileProperties {
        let table = &solution.mixture;
        let t = &solution.temperature;
        ProfileProperties {
            radius: solution.radius.clone(),
            temperature: t.clone(),
            density: table.interpolate_many(t, PropertyColumn::Density),
            viscosity: table.interpolate_many(t, PropertyColumn::Viscosity),
            thermal_conductivity: table.interpolate_many(t, PropertyColumn::ThermalConductivity),
            electrical_conductivity: table
                .interpolate_many(t, PropertyColumn::ElectricalConductivity),
            enthalpy: table.interpolate_many(t, PropertyColumn::Enthalpy),
            heat_capacity: table.interpolate_many(t, PropertyColumn::HeatCapacity),
            radiative_loss: self
                .radiation
                .mixture_loss_many(&solution.composition, t),
        }
    }
}
