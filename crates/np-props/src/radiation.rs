//! Net radiative-loss curves of the carrier gases.
//!
//! Tabulated from 5000 K to 30000 K in 1000 K steps; temperatures outside
//! that range are clamped to it.

use np_core::{Curve, linspace};

use crate::composition::Composition;
use crate::error::{PropsError, PropsResult};
use crate::species::Species;

/// Temperature range [K] of the radiative-loss data.
pub const RADIATION_DOMAIN: (f64, f64) = (5_000.0, 30_000.0);

const POINTS: usize = 26;

// Values in units of 1e6 W/m³; argon is stored per steradian.
const H2: [f64; POINTS] = [
    8e-5, 1e-3, 2.84e-2, 0.39, 3.03, 13.1, 53.4, 136.0, 343.0, 545.0, 864.0, 1000.0, 1110.0,
    1160.0, 1160.0, 1020.0, 845.0, 778.0, 672.0, 638.0, 611.0, 586.0, 501.0, 476.0, 445.0, 416.0,
];
const N2: [f64; POINTS] = [
    3.692e-6, 4.647e-4, 2.443e-2, 0.4154, 3.111, 74.40, 572.7, 994.9, 1922.0, 3021.0, 4156.0,
    5151.0, 6024.0, 6554.0, 6924.0, 7509.0, 8488.0, 9712.0, 10860.0, 12130.0, 13640.0, 15070.0,
    16070.0, 17250.0, 18830.0, 20080.0,
];
const O2: [f64; POINTS] = [
    1.670e-4, 1e-2, 0.249, 2.26, 15.2, 62.7, 194.0, 412.0, 774.0, 1410.0, 1940.0, 2350.0, 2430.0,
    2150.0, 2120.0, 2120.0, 2150.0, 2430.0, 2980.0, 4120.0, 4640.0, 6200.0, 8360.0, 11900.0,
    17900.0, 25100.0,
];
const AR: [f64; POINTS] = [
    1.494e-6, 1.539e-4, 4.425e-3, 6.063e-2, 0.8133, 10.38, 54.69, 170.5, 387.7, 697.9, 963.7,
    1076.0, 1098.0, 1074.0, 1038.0, 1046.0, 1116.0, 1279.0, 1594.0, 2125.0, 2938.0, 4134.0,
    5750.0, 7822.0, 10500.0, 13940.0,
];

/// Radiative-loss curves [W/m³] for the four carrier gases.
#[derive(Debug, Clone, PartialEq)]
pub struct RadiationCurves {
    curves: [Curve; 4],
}

impl RadiationCurves {
    /// Curves baked into the crate.
    pub fn baked() -> PropsResult<Self> {
        let ts = linspace(RADIATION_DOMAIN.0, RADIATION_DOMAIN.1, POINTS);
        let scaled = |data: &[f64; POINTS], factor: f64| -> Vec<f64> {
            data.iter().map(|v| v * factor).collect()
        };
        let ar_factor = 4.0 * std::f64::consts::PI * 1e6;
        Ok(Self {
            curves: [
                Curve::with_domain(ts.clone(), scaled(&AR, ar_factor), RADIATION_DOMAIN)?,
                Curve::with_domain(ts.clone(), scaled(&H2, 1e6), RADIATION_DOMAIN)?,
                Curve::with_domain(ts.clone(), scaled(&N2, 1e6), RADIATION_DOMAIN)?,
                Curve::with_domain(ts, scaled(&O2, 1e6), RADIATION_DOMAIN)?,
            ],
        })
    }

    fn curve(&self, species: Species) -> PropsResult<&Curve> {
        species
            .carrier_index()
            .map(|i| &self.curves[i])
            .ok_or(PropsError::NotAvailable {
                species: species.key(),
                what: "radiative loss",
            })
    }

    /// Loss of a pure carrier gas at temperature `t` [K].
    pub fn loss(&self, species: Species, t: f64) -> PropsResult<f64> {
        Ok(self.curve(species)?.eval(t))
    }

    pub fn loss_many(&self, species: Species, ts: &[f64]) -> PropsResult<Vec<f64>> {
        Ok(self.curve(species)?.eval_many(ts))
    }

    /// Mole-fraction weighted loss `Σ xᵢ·lossᵢ(t)` of a mixture.
    pub fn mixture_loss(&self, composition: &Composition, t: f64) -> f64 {
        composition
            .iter()
            .zip(&self.curves)
            .map(|((_, x), curve)| x * curve.eval(t))
            .sum()
    }

    pub fn mixture_loss_many(&self, composition: &Composition, ts: &[f64]) -> Vec<f64> {
        ts.iter().map(|&t| self.mixture_loss(composition, t)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curves() -> RadiationCurves {
        RadiationCurves::baked().unwrap()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * b.abs().max(1.0)
    }

    #[test]
    fn low_temperature_clamps_to_first_point() {
        let c = curves();
        assert!(close(c.loss(Species::H2, 800.0).unwrap(), 80.0));
        assert!(close(c.loss(Species::N2, 800.0).unwrap(), 3.692));
        assert!(close(c.loss(Species::O2, 800.0).unwrap(), 167.0));
        // 1.494e-6 · 4π · 1e6
        assert!((c.loss(Species::Ar, 800.0).unwrap() - 18.774).abs() < 1e-3);
    }

    #[test]
    fn high_temperature_clamps_to_last_point() {
        let c = curves();
        assert!(close(c.loss(Species::N2, 1e5).unwrap(), 20080.0e6));
    }

    #[test]
    fn interpolates_midway() {
        let c = curves();
        let v = c.loss(Species::H2, 10_500.0).unwrap();
        assert!(close(v, 0.5 * (13.1e6 + 53.4e6)));
    }

    #[test]
    fn mixture_weights_each_gas() {
        let c = curves();
        let comp = Composition::from_fractions([0.1, 0.2, 0.3, 0.4]);
        let t = 12_000.0;
        let expected = 0.1 * c.loss(Species::Ar, t).unwrap()
            + 0.2 * c.loss(Species::H2, t).unwrap()
            + 0.3 * c.loss(Species::N2, t).unwrap()
            + 0.4 * c.loss(Species::O2, t).unwrap();
        assert!(close(c.mixture_loss(&comp, t), expected));
    }

    #[test]
    fn precursor_has_no_curve() {
        let err = curves().loss(Species::Si, 9000.0).unwrap_err();
        assert!(matches!(err, PropsError::NotAvailable { .. }));
    }
}
