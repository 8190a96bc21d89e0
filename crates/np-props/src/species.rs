//! Species definitions and reference data.
//!
//! Carrier gases (Ar, H₂, N₂, O₂) have property tables and radiative-loss
//! curves; precursor metals carry bulk data used by the particle models.

use crate::error::{PropsError, PropsResult};
use np_core::units::constants::AMU_KG;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Species {
    /// Argon
    Ar,
    /// Hydrogen (H₂)
    H2,
    /// Nitrogen (N₂)
    N2,
    /// Oxygen (O₂)
    O2,
    /// Silicon
    Si,
    /// Iron
    Fe,
    /// Copper
    Cu,
    /// Titanium
    Ti,
    /// Aluminium
    Al,
    /// Silver
    Ag,
}

impl Species {
    pub const ALL: [Species; 10] = [
        Species::Ar,
        Species::H2,
        Species::N2,
        Species::O2,
        Species::Si,
        Species::Fe,
        Species::Cu,
        Species::Ti,
        Species::Al,
        Species::Ag,
    ];

    /// Plasma-forming gases, in property-library order (argon is the reference).
    pub const CARRIERS: [Species; 4] = [Species::Ar, Species::H2, Species::N2, Species::O2];

    pub const PRECURSORS: [Species; 6] = [
        Species::Si,
        Species::Fe,
        Species::Cu,
        Species::Ti,
        Species::Al,
        Species::Ag,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Species::Ar => "Ar",
            Species::H2 => "H2",
            Species::N2 => "N2",
            Species::O2 => "O2",
            Species::Si => "Si",
            Species::Fe => "Fe",
            Species::Cu => "Cu",
            Species::Ti => "Ti",
            Species::Al => "Al",
            Species::Ag => "Ag",
        }
    }

    pub fn is_carrier(&self) -> bool {
        self.carrier_index().is_some()
    }

    /// Position in [`Species::CARRIERS`], if this is a carrier gas.
    pub fn carrier_index(&self) -> Option<usize> {
        Self::CARRIERS.iter().position(|s| s == self)
    }

    /// Molar mass [g/mol].
    pub fn molar_mass(&self) -> f64 {
        match self {
            Species::Ar => 39.948,
            Species::H2 => 2.014,
            Species::N2 => 28.014,
            Species::O2 => 31.998,
            Species::Si => 28.085,
            Species::Fe => 55.845,
            Species::Cu => 63.546,
            Species::Ti => 47.867,
            Species::Al => 26.981,
            Species::Ag => 107.8682,
        }
    }

    /// Mass of one atom or molecule [kg].
    pub fn particle_mass(&self) -> f64 {
        self.molar_mass() * AMU_KG
    }

    /// Solid bulk density [kg/m³]; precursors only.
    pub fn bulk_density_solid(&self) -> Option<f64> {
        match self {
            Species::Si => Some(2329.0),
            Species::Fe => Some(7874.0),
            Species::Cu => Some(8960.0),
            Species::Ti => Some(4507.0),
            Species::Al => Some(2300.0),
            Species::Ag => Some(10490.0),
            _ => None,
        }
    }

    /// Liquid bulk density [kg/m³]; precursors only.
    pub fn bulk_density_liquid(&self) -> Option<f64> {
        match self {
            Species::Si => Some(2570.0),
            Species::Fe => Some(6980.0),
            Species::Cu => Some(8020.0),
            Species::Ti => Some(4110.0),
            Species::Al => Some(2700.0),
            Species::Ag => Some(9320.0),
            _ => None,
        }
    }

    /// Melting point [K]; precursors only.
    pub fn melting_point(&self) -> Option<f64> {
        match self {
            Species::Si => Some(1687.0),
            Species::Fe => Some(1811.0),
            Species::Cu => Some(1357.77),
            Species::Ti => Some(1941.0),
            Species::Al => Some(933.47),
            Species::Ag => Some(1234.96),
            _ => None,
        }
    }
}

impl std::fmt::Display for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for Species {
    type Err = PropsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "AR" | "ARGON" => Ok(Species::Ar),
            "H2" | "HYDROGEN" => Ok(Species::H2),
            "N2" | "NITROGEN" => Ok(Species::N2),
            "O2" | "OXYGEN" => Ok(Species::O2),
            "SI" | "SILICON" => Ok(Species::Si),
            "FE" | "IRON" => Ok(Species::Fe),
            "CU" | "COPPER" => Ok(Species::Cu),
            "TI" | "TITANIUM" => Ok(Species::Ti),
            "AL" | "ALUMINIUM" | "ALUMINUM" => Ok(Species::Al),
            "AG" | "SILVER" => Ok(Species::Ag),
            _ => Err(PropsError::UnknownSpecies {
                name: s.to_string(),
            }),
        }
    }
}

fn precursor_value(
    name: &str,
    what: &'static str,
    pick: impl Fn(&Species) -> Option<f64>,
) -> PropsResult<f64> {
    let species: Species = name.parse()?;
    pick(&species).ok_or(PropsError::NotAvailable {
        species: species.key(),
        what,
    })
}

/// Molar mass [g/mol] by species name.
pub fn molar_mass(name: &str) -> PropsResult<f64> {
    Ok(name.parse::<Species>()?.molar_mass())
}

/// Atom or molecule mass [kg] by species name.
pub fn particle_mass(name: &str) -> PropsResult<f64> {
    Ok(name.parse::<Species>()?.particle_mass())
}

pub fn bulk_density_solid(name: &str) -> PropsResult<f64> {
    precursor_value(name, "solid bulk density", Species::bulk_density_solid)
}

pub fn bulk_density_liquid(name: &str) -> PropsResult<f64> {
    precursor_value(name, "liquid bulk density", Species::bulk_density_liquid)
}

pub fn melting_point(name: &str) -> PropsResult<f64> {
    precursor_value(name, "melting point", Species::melting_point)
}
