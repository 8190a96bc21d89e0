//! Axial reference profiles of velocity, temperature and pressure.
//!
//! The reactor model samples flow conditions from a precomputed axisymmetric
//! simulation rather than solving for them.

use std::path::Path;

use np_core::Curve;

use crate::error::{ReactorError, ReactorResult};

const BUILTIN: &str = include_str!("../data/reference_profiles.csv");

/// `U(x)`, `T(x)` and `p(x)` along the reactor axis, clamped at both ends.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceProfiles {
    velocity: Curve,
    temperature: Curve,
    pressure: Curve,
}

impl ReferenceProfiles {
    /// Profiles shipped with the crate.
    pub fn builtin() -> ReactorResult<Self> {
        Self::from_csv_str(BUILTIN)
    }

    /// Parse `x,U,T,p` rows; a non-numeric first line is a header.
    pub fn from_csv_str(text: &str) -> ReactorResult<Self> {
        let (mut x, mut u, mut t, mut p) = (Vec::new(), Vec::new(), Vec::new(), Vec::new());
        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let values: Result<Vec<f64>, _> = line.split(',').map(|f| f.trim().parse()).collect();
            let values = match values {
                Ok(v) => v,
                Err(_) if lineno == 0 => continue,
                Err(e) => {
                    return Err(ReactorError::Profile {
                        what: format!("line {}: {e}", lineno + 1),
                    });
                }
            };
            let &[xi, ui, ti, pi] = values.as_slice() else {
                return Err(ReactorError::Profile {
                    what: format!("line {}: expected 4 columns", lineno + 1),
                });
            };
            x.push(xi);
            u.push(ui);
            t.push(ti);
            p.push(pi);
        }
        Ok(Self {
            velocity: Curve::new(x.clone(), u)?,
            temperature: Curve::new(x.clone(), t)?,
            pressure: Curve::new(x, p)?,
        })
    }

    pub fn from_csv_path(path: &Path) -> ReactorResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| ReactorError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_csv_str(&text)
    }

    /// Axial velocity [m/s].
    pub fn velocity(&self, x: f64) -> f64 {
        self.velocity.eval(x)
    }

    /// Gas temperature [K].
    pub fn temperature(&self, x: f64) -> f64 {
        self.temperature.eval(x)
    }

    /// Pressure [Pa].
    pub fn pressure(&self, x: f64) -> f64 {
        self.pressure.eval(x)
    }

    /// Tabulated `[x, U, T, p]` rows.
    pub fn rows(&self) -> Vec<[f64; 4]> {
        let x = self.velocity.xs();
        (0..x.len())
            .map(|i| {
                [
                    x[i],
                    self.velocity.ys()[i],
                    self.temperature.ys()[i],
                    self.pressure.ys()[i],
                ]
            })
            .collect()
    }

    /// Axial extent of the tabulated data [m].
    pub fn span(&self) -> (f64, f64) {
        self.velocity.domain()
    }
}
