//! Solver settings and the operating case.

use np_core::units::{Length, Power};
use np_props::Composition;
use uom::si::length::meter;
use uom::si::power::watt;

use crate::error::{PlasmaError, PlasmaResult};

/// Numerical and model constants of the radial solver.
#[derive(Debug, Clone, PartialEq)]
pub struct PlasmaSettings {
    /// Radial nodes, axis and wall included
    pub nodes: usize,
    /// Wall temperature [K]
    pub wall_temperature: f64,
    /// Fraction of the input power coupled into the plasma
    pub coupling_efficiency: f64,
    /// Arc length per unit inlet radius
    pub torch_length_factor: f64,
    /// Initial axial electric field [V/m]
    pub initial_field: f64,
    /// Initial axial pressure gradient [Pa/m]
    pub initial_pressure_gradient: f64,
    /// Uniform initial temperature [K]
    pub initial_temperature: f64,
    /// Temperature at which the volumetric flow is referenced [K]
    pub reference_temperature: f64,
    /// Initial arc current is coupled power divided by this [V]
    pub initial_current_divisor: f64,
    /// Weight of the new temperature solve in the relaxed update
    pub energy_relaxation: f64,
    /// Weight of the new velocity solve in the relaxed update
    pub momentum_relaxation: f64,
    /// Relative change below which the temperature and velocity loops stop
    pub field_tolerance: f64,
    /// Relative power mismatch below which the power loop stops
    pub power_tolerance: f64,
    pub max_inner_iterations: usize,
    pub max_momentum_iterations: usize,
    pub max_power_iterations: usize,
    /// Residuals are only measured once the iteration counter exceeds this
    pub residual_check_after: usize,
}

impl Default for PlasmaSettings {
    fn default() -> Self {
        Self {
            nodes: 201,
            wall_temperature: 500.0,
            coupling_efficiency: 0.35,
            torch_length_factor: 6.5714,
            initial_field: 800.0,
            initial_pressure_gradient: 500.0,
            initial_temperature: 18_000.0,
            reference_temperature: 300.0,
            initial_current_divisor: 40.0,
            energy_relaxation: 0.025,
            momentum_relaxation: 0.05,
            field_tolerance: 1e-6,
            power_tolerance: 1e-4,
            max_inner_iterations: 500,
            max_momentum_iterations: 500,
            max_power_iterations: 400,
            residual_check_after: 1,
        }
    }
}

fn setup(what: &str) -> PlasmaError {
    PlasmaError::Setup {
        what: what.to_string(),
    }
}

impl PlasmaSettings {
    pub fn validate(&self) -> PlasmaResult<()> {
        if self.nodes < 3 {
            return Err(setup("at least three radial nodes are required"));
        }
        let positive = [
            (self.wall_temperature, "wall temperature must be positive"),
            (self.coupling_efficiency, "coupling efficiency must be positive"),
            (self.torch_length_factor, "torch length factor must be positive"),
            (self.initial_field, "initial field must be positive"),
            (self.initial_pressure_gradient, "initial pressure gradient must be positive"),
            (self.initial_temperature, "initial temperature must be positive"),
            (self.reference_temperature, "reference temperature must be positive"),
            (self.initial_current_divisor, "initial current divisor must be positive"),
            (self.field_tolerance, "field tolerance must be positive"),
            (self.power_tolerance, "power tolerance must be positive"),
        ];
        for (value, what) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(setup(what));
            }
        }
        if self.coupling_efficiency > 1.0 {
            return Err(setup("coupling efficiency cannot exceed 1"));
        }
        for (w, what) in [
            (self.energy_relaxation, "energy relaxation must lie in (0, 1]"),
            (self.momentum_relaxation, "momentum relaxation must lie in (0, 1]"),
        ] {
            if !(w > 0.0 && w <= 1.0) {
                return Err(setup(what));
            }
        }
        if self.max_inner_iterations == 0
            || self.max_momentum_iterations == 0
            || self.max_power_iterations == 0
        {
            return Err(setup("iteration caps must be at least 1"));
        }
        Ok(())
    }
}

/// Operating point of the torch.
#[derive(Debug, Clone, PartialEq)]
pub struct PlasmaCase {
    pub composition: Composition,
    pub input_power: Power,
    /// Carrier flow [standard litres per minute]
    pub flow_rate_slpm: f64,
    pub inlet_radius: Length,
}

impl PlasmaCase {
    pub fn power_w(&self) -> f64 {
        self.input_power.get::<watt>()
    }

    pub fn radius_m(&self) -> f64 {
        self.inlet_radius.get::<meter>()
    }

    pub fn validate(&self) -> PlasmaResult<()> {
        let p = self.power_w();
        if !(p.is_finite() && p > 0.0) {
            return Err(setup("input power must be positive"));
        }
        if !(self.flow_rate_slpm.is_finite() && self.flow_rate_slpm > 0.0) {
            return Err(setup("flow rate must be positive"));
        }
        let r = self.radius_m();
        if !(r.is_finite() && r > 0.0) {
            return Err(setup("inlet radius must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use np_core::units::{mm, w};
    use np_props::Species;

    fn argon_case() -> PlasmaCase {
        PlasmaCase {
            composition: Composition::pure(Species::Ar).unwrap(),
            input_power: w(15_000.0),
            flow_rate_slpm: 60.0,
            inlet_radius: mm(6.5),
        }
    }

    #[test]
    fn defaults_are_valid() {
        let s = PlasmaSettings::default();
        s.validate().unwrap();
        assert_eq!(s.nodes, 201);
        assert_eq!(s.coupling_efficiency, 0.35);
        assert_eq!(s.max_power_iterations, 400);
    }

    #[test]
    fn rejects_bad_relaxation() {
        let s = PlasmaSettings {
            energy_relaxation: 0.0,
            ..Default::default()
        };
        assert!(matches!(s.validate(), Err(PlasmaError::Setup { .. })));
    }

    #[test]
    fn rejects_two_nodes() {
        let s = PlasmaSettings {
            nodes: 2,
            ..Default::default()
        };
        assert!(s.validate().is_err());
    }

    #[test]
    fn case_unit_conversion() {
        let case = argon_case();
        case.validate().unwrap();
        assert!((case.radius_m() - 6.5e-3).abs() < 1e-15);
        assert_eq!(case.power_w(), 15_000.0);
    }

    #[test]
    fn rejects_zero_flow() {
        let case = PlasmaCase {
            flow_rate_slpm: 0.0,
            ..argon_case()
        };
        assert!(case.validate().is_err());
    }
}
