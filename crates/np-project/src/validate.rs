//! Case file validation.

use np_props::Species;

use crate::convert::plasma_settings;
use crate::schema::{CaseFile, CompositionDef, LATEST_VERSION, PlasmaDef, ReactorDef};

const FRACTION_SUM_TOLERANCE: f64 = 1e-6;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Unsupported case file version: {version}")]
    UnsupportedVersion { version: u32 },

    #[error("Case '{name}' has neither a plasma nor a reactor section")]
    EmptyCase { name: String },

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown species '{name}' in {field}")]
    UnknownSpecies { field: String, name: String },

    #[error("Duplicate species '{name}' in {field}")]
    DuplicateSpecies { field: String, name: String },

    #[error("Mole fractions in {field} sum to {sum}, expected 1")]
    CompositionSum { field: String, sum: f64 },
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn positive(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must be positive and finite"))
    }
}

pub fn validate_case(case: &CaseFile) -> Result<(), ValidationError> {
    if case.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: case.version,
        });
    }
    if case.plasma.is_none() && case.reactor.is_none() {
        return Err(ValidationError::EmptyCase {
            name: case.name.clone(),
        });
    }
    if let Some(plasma) = &case.plasma {
        validate_plasma(plasma)?;
    }
    if let Some(reactor) = &case.reactor {
        validate_reactor(reactor)?;
    }
    if case.settings.is_some() {
        plasma_settings(case.settings.as_ref())
            .map_err(|e| invalid("settings", "override", &e.to_string()))?;
    }
    Ok(())
}

fn validate_plasma(def: &PlasmaDef) -> Result<(), ValidationError> {
    validate_carrier("plasma.composition", &def.composition)?;
    positive("plasma.input_power_w", def.input_power_w)?;
    positive("plasma.flow_rate_slpm", def.flow_rate_slpm)?;
    positive("plasma.inlet_radius_m", def.inlet_radius_m)
}

fn validate_reactor(def: &ReactorDef) -> Result<(), ValidationError> {
    if def.n_cells == 0 {
        return Err(invalid("reactor.n_cells", def.n_cells, "must be at least 1"));
    }
    positive("reactor.length_m", def.length_m)?;
    let precursor = parse_species("reactor.precursor", &def.precursor)?;
    if precursor.is_carrier() {
        return Err(invalid(
            "reactor.precursor",
            &def.precursor,
            "carrier gases cannot be fed as precursor",
        ));
    }
    if !(def.feed_rate_kg_s.is_finite() && def.feed_rate_kg_s >= 0.0) {
        return Err(invalid(
            "reactor.feed_rate_kg_s",
            def.feed_rate_kg_s,
            "must be non-negative and finite",
        ));
    }
    validate_carrier("reactor.carrier", &def.carrier)?;
    if let Some(t_end) = def.t_end_s {
        positive("reactor.t_end_s", t_end)?;
    }
    if def.max_steps == Some(0) {
        return Err(invalid("reactor.max_steps", 0, "must be at least 1"));
    }
    Ok(())
}

fn parse_species(field: &str, name: &str) -> Result<Species, ValidationError> {
    name.parse().map_err(|_| ValidationError::UnknownSpecies {
        field: field.to_string(),
        name: name.to_string(),
    })
}

fn validate_carrier(field: &str, def: &CompositionDef) -> Result<(), ValidationError> {
    let entries: Vec<(&str, f64)> = match def {
        CompositionDef::Pure { species } => vec![(species.as_str(), 1.0)],
        CompositionDef::Mixture { fractions } => {
            fractions.iter().map(|(n, x)| (n.as_str(), *x)).collect()
        }
    };
    if entries.is_empty() {
        return Err(invalid(field, "[]", "at least one species is required"));
    }
    let mut seen: Vec<Species> = Vec::with_capacity(entries.len());
    let mut sum = 0.0;
    for (name, x) in entries {
        let species = parse_species(field, name)?;
        if !species.is_carrier() {
            return Err(invalid(field, name, "only carrier gases have property tables"));
        }
        if seen.contains(&species) {
            return Err(ValidationError::DuplicateSpecies {
                field: field.to_string(),
                name: name.to_string(),
            });
        }
        seen.push(species);
        if !(x.is_finite() && x >= 0.0) {
            return Err(invalid(field, x, "mole fractions must be non-negative"));
        }
        sum += x;
    }
    if (sum - 1.0).abs() > FRACTION_SUM_TOLERANCE {
        return Err(ValidationError::CompositionSum {
            field: field.to_string(),
            sum,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SettingsDef;

    fn plasma_only() -> CaseFile {
        CaseFile {
            version: LATEST_VERSION,
            name: "argon torch".to_string(),
            property_dir: None,
            plasma: Some(PlasmaDef {
                composition: CompositionDef::Pure {
                    species: "Ar".to_string(),
                },
                input_power_w: 15_000.0,
                flow_rate_slpm: 60.0,
                inlet_radius_m: 0.0065,
            }),
            reactor: None,
            settings: None,
        }
    }

    #[test]
    fn valid_case_passes() {
        assert_eq!(validate_case(&plasma_only()), Ok(()));
    }

    #[test]
    fn future_version_rejected() {
        let mut case = plasma_only();
        case.version = LATEST_VERSION + 1;
        assert!(matches!(
            validate_case(&case),
            Err(ValidationError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn empty_case_rejected() {
        let mut case = plasma_only();
        case.plasma = None;
        assert!(matches!(validate_case(&case), Err(ValidationError::EmptyCase { .. })));
    }

    #[test]
    fn non_positive_power_rejected() {
        let mut case = plasma_only();
        if let Some(p) = case.plasma.as_mut() {
            p.input_power_w = 0.0;
        }
        match validate_case(&case) {
            Err(ValidationError::InvalidValue { field, .. }) => {
                assert_eq!(field, "plasma.input_power_w")
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn fractions_must_sum_to_one() {
        let mut case = plasma_only();
        if let Some(p) = case.plasma.as_mut() {
            p.composition = CompositionDef::Mixture {
                fractions: vec![("Ar".to_string(), 0.5), ("N2".to_string(), 0.4)],
            };
        }
        assert!(matches!(
            validate_case(&case),
            Err(ValidationError::CompositionSum { .. })
        ));
    }

    #[test]
    fn unknown_and_duplicate_species_rejected() {
        let mut case = plasma_only();
        if let Some(p) = case.plasma.as_mut() {
            p.composition = CompositionDef::Pure {
                species: "Xe".to_string(),
            };
        }
        assert!(matches!(
            validate_case(&case),
            Err(ValidationError::UnknownSpecies { .. })
        ));

        if let Some(p) = case.plasma.as_mut() {
            p.composition = CompositionDef::Mixture {
                fractions: vec![("Ar".to_string(), 0.5), ("argon".to_string(), 0.5)],
            };
        }
        assert!(matches!(
            validate_case(&case),
            Err(ValidationError::DuplicateSpecies { .. })
        ));
    }

    #[test]
    fn carrier_precursor_rejected() {
        let mut case = plasma_only();
        case.reactor = Some(ReactorDef {
            n_cells: 10,
            length_m: 1.0,
            precursor: "N2".to_string(),
            feed_rate_kg_s: 1e-5,
            carrier: CompositionDef::Pure {
                species: "Ar".to_string(),
            },
            t_end_s: None,
            max_steps: None,
            profiles: None,
        });
        assert!(matches!(
            validate_case(&case),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn bad_settings_override_rejected() {
        let mut case = plasma_only();
        case.settings = Some(SettingsDef {
            energy_relaxation: Some(1.5),
            ..SettingsDef::default()
        });
        assert!(validate_case(&case).is_err());
    }
}
