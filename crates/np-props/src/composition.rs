//! Carrier-gas composition as Ar/H₂/N₂/O₂ mole fractions.

use np_core::NamedValues;
use np_core::numeric::{Tolerances, nearly_equal};

use crate::error::{PropsError, PropsResult};
use crate::species::Species;

/// Allowed deviation of the mole-fraction sum from one.
pub const SUM_TOLERANCE: f64 = 1e-6;

/// Mole fractions of the four carrier gases, stored in
/// [`Species::CARRIERS`] order.
///
/// [`Composition::from_fractions`] takes the values as given; the mixture
/// builder never inspects the sum. [`Composition::new_mole_fractions`] is the
/// validating constructor used for user input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Composition {
    fractions: [f64; 4],
}

impl Composition {
    /// Single carrier gas.
    pub fn pure(species: Species) -> PropsResult<Self> {
        Self::new_mole_fractions(vec![(species, 1.0)])
    }

    /// Unchecked fractions `[x_Ar, x_H2, x_N2, x_O2]`.
    pub fn from_fractions(fractions: [f64; 4]) -> Self {
        Self { fractions }
    }

    /// Validated composition: every species is a carrier, appears once,
    /// has a finite non-negative fraction, and the fractions sum to one.
    pub fn new_mole_fractions(fractions: Vec<(Species, f64)>) -> PropsResult<Self> {
        if fractions.is_empty() {
            return Err(PropsError::NonPhysical {
                what: "empty composition",
            });
        }

        let mut out = [0.0; 4];
        let mut seen = [false; 4];
        for (species, frac) in fractions {
            let slot = species.carrier_index().ok_or(PropsError::NotAvailable {
                species: species.key(),
                what: "carrier gas properties",
            })?;
            if seen[slot] {
                return Err(PropsError::NonPhysical {
                    what: "species listed twice in composition",
                });
            }
            if !frac.is_finite() {
                return Err(PropsError::NonPhysical {
                    what: "non-finite mole fraction",
                });
            }
            if frac < 0.0 {
                return Err(PropsError::NonPhysical {
                    what: "negative mole fraction",
                });
            }
            seen[slot] = true;
            out[slot] = frac;
        }

        let sum: f64 = out.iter().sum();
        let tol = Tolerances {
            abs: SUM_TOLERANCE,
            rel: 0.0,
        };
        if !nearly_equal(sum, 1.0, tol) {
            return Err(PropsError::NonPhysical {
                what: "mole fractions must sum to 1",
            });
        }
        Ok(Self { fractions: out })
    }

    /// Validated composition from species names.
    pub fn from_named(values: &NamedValues<f64>) -> PropsResult<Self> {
        let mut fractions = Vec::with_capacity(values.len());
        for name in values.names() {
            let species: Species = name.parse()?;
            fractions.push((species, values.extract_one(name)?));
        }
        Self::new_mole_fractions(fractions)
    }

    /// Mole fraction of `species` (0.0 for non-carriers).
    pub fn mole_fraction(&self, species: Species) -> f64 {
        species
            .carrier_index()
            .map(|i| self.fractions[i])
            .unwrap_or(0.0)
    }

    pub fn fractions(&self) -> [f64; 4] {
        self.fractions
    }

    /// All four carriers with their fractions, zeros included.
    pub fn iter(&self) -> impl Iterator<Item = (Species, f64)> + '_ {
        Species::CARRIERS.into_iter().zip(self.fractions)
    }

    pub fn sum(&self) -> f64 {
        self.fractions.iter().sum()
    }

    /// Mixture molar mass [g/mol].
    pub fn molar_mass(&self) -> f64 {
        self.iter().map(|(s, x)| s.molar_mass() * x).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pure_argon() {
        let c = Composition::pure(Species::Ar).unwrap();
        assert_eq!(c.fractions(), [1.0, 0.0, 0.0, 0.0]);
        assert_eq!(c.molar_mass(), 39.948);
    }

    #[test]
    fn unchecked_keeps_values() {
        let c = Composition::from_fractions([0.5, 0.5, 0.5, 0.0]);
        assert_eq!(c.sum(), 1.5);
    }

    #[test]
    fn rejects_bad_sum() {
        let err = Composition::new_mole_fractions(vec![(Species::Ar, 0.7), (Species::H2, 0.2)])
            .unwrap_err();
        assert!(matches!(err, PropsError::NonPhysical { .. }));
    }

    #[test]
    fn accepts_sum_within_tolerance() {
        let c = Composition::new_mole_fractions(vec![
            (Species::Ar, 0.6),
            (Species::N2, 0.4 + 5e-7),
        ])
        .unwrap();
        assert_eq!(c.mole_fraction(Species::N2), 0.4 + 5e-7);
    }

    #[test]
    fn rejects_negative_and_non_finite() {
        assert!(
            Composition::new_mole_fractions(vec![(Species::Ar, 1.5), (Species::H2, -0.5)]).is_err()
        );
        assert!(Composition::new_mole_fractions(vec![(Species::Ar, f64::NAN)]).is_err());
    }

    #[test]
    fn rejects_precursor() {
        let err = Composition::new_mole_fractions(vec![(Species::Si, 1.0)]).unwrap_err();
        assert!(matches!(err, PropsError::NotAvailable { .. }));
    }

    #[test]
    fn rejects_duplicates() {
        assert!(
            Composition::new_mole_fractions(vec![(Species::Ar, 0.5), (Species::Ar, 0.5)]).is_err()
        );
    }

    #[test]
    fn from_named_parses_keys() {
        let values: NamedValues<f64> = [("Ar", 0.8), ("H2", 0.2)].into_iter().collect();
        let c = Composition::from_named(&values).unwrap();
        assert_eq!(c.mole_fraction(Species::H2), 0.2);
        assert_eq!(c.mole_fraction(Species::O2), 0.0);
    }

    #[test]
    fn from_named_rejects_unknown() {
        let values: NamedValues<f64> = [("Ar", 0.8), ("He", 0.2)].into_iter().collect();
        let err = Composition::from_named(&values).unwrap_err();
        assert_eq!(err, PropsError::UnknownSpecies { name: "He".into() });
    }
}
