//! Clamped piecewise-linear curves.

use crate::error::{NpError, NpResult};

/// A piecewise-linear curve `y(x)` over strictly increasing abscissae.
///
/// Inputs are first clamped to `domain` and then interpolated; inputs beyond the
/// tabulated range take the end values. Nothing is ever extrapolated.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    xs: Vec<f64>,
    ys: Vec<f64>,
    domain: (f64, f64),
}

impl Curve {
    /// Build a curve whose domain is the tabulated range.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> NpResult<Self> {
        let domain = match (xs.first(), xs.last()) {
            (Some(&lo), Some(&hi)) => (lo, hi),
            _ => {
                return Err(NpError::InvalidArg {
                    what: "curve needs at least two points",
                });
            }
        };
        Self::with_domain(xs, ys, domain)
    }

    /// Build a curve with an explicit clamping domain.
    pub fn with_domain(xs: Vec<f64>, ys: Vec<f64>, domain: (f64, f64)) -> NpResult<Self> {
        if xs.len() != ys.len() {
            return Err(NpError::InvalidArg {
                what: "curve abscissae and ordinates differ in length",
            });
        }
        if xs.len() < 2 {
            return Err(NpError::InvalidArg {
                what: "curve needs at least two points",
            });
        }
        for (&x, &y) in xs.iter().zip(&ys) {
            if !x.is_finite() {
                return Err(NpError::NonFinite {
                    what: "curve abscissa",
                    value: x,
                });
            }
            if !y.is_finite() {
                return Err(NpError::NonFinite {
                    what: "curve ordinate",
                    value: y,
                });
            }
        }
        if xs.windows(2).any(|w| w[1] <= w[0]) {
            return Err(NpError::InvalidArg {
                what: "curve abscissae must be strictly increasing",
            });
        }
        if !(domain.0 <= domain.1) {
            return Err(NpError::InvalidArg {
                what: "curve domain bounds are reversed",
            });
        }
        Ok(Self { xs, ys, domain })
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    /// Evaluate at a single point. NaN in gives NaN out; infinities clamp to
    /// the end values.
    pub fn eval(&self, x: f64) -> f64 {
        if x.is_nan() {
            return f64::NAN;
        }
        let x = x.clamp(self.domain.0, self.domain.1);
        let n = self.xs.len();
        if x <= self.xs[0] {
            return self.ys[0];
        }
        if x >= self.xs[n - 1] {
            return self.ys[n - 1];
        }
        // first index with xs[i] > x; always in 1..n here
        let hi = self.xs.partition_point(|&xi| xi <= x);
        let lo = hi - 1;
        let t = (x - self.xs[lo]) / (self.xs[hi] - self.xs[lo]);
        self.ys[lo] + t * (self.ys[hi] - self.ys[lo])
    }

    /// Evaluate at every point of `xs`, preserving length and order.
    pub fn eval_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.eval(x)).collect()
    }
}
