//! Conversion of validated case sections into solver inputs.

use np_core::lookup::NamedValues;
use np_core::units::{m, w};
use np_plasma::{PlasmaCase, PlasmaSettings};
use np_props::{Composition, Species};
use np_reactor::ReactorSetup;

use crate::schema::{CompositionDef, PlasmaDef, ReactorDef, SettingsDef};
use crate::ProjectResult;

/// Name-keyed mole fractions of a composition section.
pub fn named_fractions(def: &CompositionDef) -> NamedValues<f64> {
    let mut values = NamedValues::new();
    match def {
        CompositionDef::Pure { species } => values.insert(species.as_str(), 1.0),
        CompositionDef::Mixture { fractions } => {
            for (name, x) in fractions {
                values.insert(name.as_str(), *x);
            }
        }
    }
    values
}

pub fn composition(def: &CompositionDef) -> ProjectResult<Composition> {
    Ok(Composition::from_named(&named_fractions(def))?)
}

pub fn plasma_case(def: &PlasmaDef) -> ProjectResult<PlasmaCase> {
    let case = PlasmaCase {
        composition: composition(&def.composition)?,
        input_power: w(def.input_power_w),
        flow_rate_slpm: def.flow_rate_slpm,
        inlet_radius: m(def.inlet_radius_m),
    };
    case.validate()?;
    Ok(case)
}

/// Solver defaults with the overrides of `def` applied.
pub fn plasma_settings(def: Option<&SettingsDef>) -> ProjectResult<PlasmaSettings> {
    let mut settings = PlasmaSettings::default();
    if let Some(def) = def {
        if let Some(v) = def.nodes {
            settings.nodes = v;
        }
        if let Some(v) = def.wall_temperature_k {
            settings.wall_temperature = v;
        }
        if let Some(v) = def.coupling_efficiency {
            settings.coupling_efficiency = v;
        }
        if let Some(v) = def.torch_length_factor {
            settings.torch_length_factor = v;
        }
        if let Some(v) = def.initial_field_v_m {
            settings.initial_field = v;
        }
        if let Some(v) = def.initial_pressure_gradient_pa_m {
            settings.initial_pressure_gradient = v;
        }
        if let Some(v) = def.initial_temperature_k {
            settings.initial_temperature = v;
        }
        if let Some(v) = def.energy_relaxation {
            settings.energy_relaxation = v;
        }
        if let Some(v) = def.momentum_relaxation {
            settings.momentum_relaxation = v;
        }
        if let Some(v) = def.field_tolerance {
            settings.field_tolerance = v;
        }
        if let Some(v) = def.power_tolerance {
            settings.power_tolerance = v;
        }
        if let Some(v) = def.max_inner_iterations {
            settings.max_inner_iterations = v;
        }
        if let Some(v) = def.max_momentum_iterations {
            settings.max_momentum_iterations = v;
        }
        if let Some(v) = def.max_power_iterations {
            settings.max_power_iterations = v;
        }
    }
    settings.validate()?;
    Ok(settings)
}

pub fn reactor_setup(def: &ReactorDef) -> ProjectResult<ReactorSetup> {
    let precursor: Species = def.precursor.parse()?;
    Ok(ReactorSetup {
        n_cells: def.n_cells,
        length: def.length_m,
        precursor,
        feed_rate: def.feed_rate_kg_s,
        carrier: composition(&def.carrier)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argon() -> CompositionDef {
        CompositionDef::Pure {
            species: "Ar".to_string(),
        }
    }

    #[test]
    fn pure_composition_is_unit_fraction() {
        let c = composition(&argon()).unwrap();
        assert_eq!(c.mole_fraction(Species::Ar), 1.0);
        assert_eq!(c.mole_fraction(Species::N2), 0.0);
    }

    #[test]
    fn mixture_composition_uses_names() {
        let def = CompositionDef::Mixture {
            fractions: vec![("argon".to_string(), 0.75), ("H2".to_string(), 0.25)],
        };
        let c = composition(&def).unwrap();
        assert!((c.mole_fraction(Species::Ar) - 0.75).abs() < 1e-12);
        assert!((c.mole_fraction(Species::H2) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn settings_overrides_apply_over_defaults() {
        let def = SettingsDef {
            nodes: Some(51),
            power_tolerance: Some(1e-3),
            ..SettingsDef::default()
        };
        let s = plasma_settings(Some(&def)).unwrap();
        assert_eq!(s.nodes, 51);
        assert_eq!(s.power_tolerance, 1e-3);
        assert_eq!(s.wall_temperature, PlasmaSettings::default().wall_temperature);
    }

    #[test]
    fn invalid_override_is_rejected() {
        let def = SettingsDef {
            nodes: Some(2),
            ..SettingsDef::default()
        };
        assert!(plasma_settings(Some(&def)).is_err());
    }

    #[test]
    fn plasma_case_carries_si_values() {
        let def = PlasmaDef {
            composition: argon(),
            input_power_w: 15_000.0,
            flow_rate_slpm: 60.0,
            inlet_radius_m: 0.0065,
        };
        let case = plasma_case(&def).unwrap();
        assert!((case.power_w() - 15_000.0).abs() < 1e-9);
        assert!((case.radius_m() - 0.0065).abs() < 1e-15);
    }

    #[test]
    fn reactor_setup_parses_precursor() {
        let def = ReactorDef {
            n_cells: 20,
            length_m: 0.5,
            precursor: "silicon".to_string(),
            feed_rate_kg_s: 1e-5,
            carrier: argon(),
            t_end_s: None,
            max_steps: None,
            profiles: None,
        };
        let setup = reactor_setup(&def).unwrap();
        assert_eq!(setup.precursor, Species::Si);
        assert_eq!(setup.n_cells, 20);
    }
}
