//! Uniform radial grid and the axisymmetric diffusion operator.

use std::f64::consts::PI;

use np_core::{linspace, solve_tridiagonal};

use crate::error::{PlasmaError, PlasmaResult};

/// `nodes` points from the axis (`r = 0`) to the wall (`r = R`).
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGrid {
    radii: Vec<f64>,
    spacing: f64,
}

impl RadialGrid {
    pub fn new(radius: f64, nodes: usize) -> PlasmaResult<Self> {
        if nodes < 3 {
            return Err(PlasmaError::Setup {
                what: format!("radial grid needs at least 3 nodes, got {nodes}"),
            });
        }
        if !(radius.is_finite() && radius > 0.0) {
            return Err(PlasmaError::Setup {
                what: format!("radial grid radius must be positive, got {radius}"),
            });
        }
        Ok(Self {
            radii: linspace(0.0, radius, nodes),
            spacing: radius / (nodes - 1) as f64,
        })
    }

    pub fn radii(&self) -> &[f64] {
        &self.radii
    }

    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    pub fn len(&self) -> usize {
        self.radii.len()
    }

    pub fn is_empty(&self) -> bool {
        self.radii.is_empty()
    }

    pub fn radius(&self) -> f64 {
        self.radii[self.radii.len() - 1]
    }

    /// Solve `div(c grad u) = -q` with zero flux on the axis and `u = wall`
    /// at the wall.
    ///
    /// `coefficient` holds `c` at the nodes; face values use the mean of the
    /// two neighbours weighted by the face radius. `source` holds `q·r·dr`
    /// with the sign convention of the right-hand side (`-dr·r·q`); the axis
    /// entry is halved here.
    pub fn solve_diffusion(
        &self,
        coefficient: &[f64],
        mut source: Vec<f64>,
        wall: f64,
    ) -> PlasmaResult<Vec<f64>> {
        let n = self.len();
        if coefficient.len() != n || source.len() != n {
            return Err(PlasmaError::Numeric {
                what: "diffusion inputs do not match the grid".to_string(),
            });
        }
        let r = &self.radii;
        let dr = self.spacing;
        let face: Vec<f64> = (0..n - 1)
            .map(|j| 0.25 * (r[j] + r[j + 1]) * (coefficient[j] + coefficient[j + 1]) / dr)
            .collect();

        let mut diag = Vec::with_capacity(n);
        diag.push(-face[0]);
        for j in 1..n - 1 {
            diag.push(-(face[j - 1] + face[j]));
        }
        // wall row: Dirichlet
        diag.push(1.0);

        let mut lower = face.clone();
        lower[n - 2] = 0.0;
        let upper = face;

        source[0] /= 2.0;
        source[n - 1] = wall;

        Ok(solve_tridiagonal(&lower, &diag, &upper, &source)?)
    }

    /// `Σ 2π·r·dr·f(r)` over the cross-section.
    pub fn integrate_disc(&self, values: &[f64]) -> f64 {
        self.radii
            .iter()
            .zip(values)
            .map(|(r, v)| 2.0 * PI * r * self.spacing * v)
            .sum()
    }
}

/// `weight·new + (1 − weight)·old`.
pub(crate) fn relax(new: &[f64], old: &[f64], weight: f64) -> Vec<f64> {
    new.iter()
        .zip(old)
        .map(|(n, o)| weight * n + (1.0 - weight) * o)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_spacing_and_ends() {
        let g = RadialGrid::new(2.0, 5).unwrap();
        assert_eq!(g.radii(), &[0.0, 0.5, 1.0, 1.5, 2.0]);
        assert_eq!(g.spacing(), 0.5);
        assert_eq!(g.radius(), 2.0);
    }

    #[test]
    fn rejects_degenerate_grid() {
        assert!(RadialGrid::new(1.0, 2).is_err());
        assert!(RadialGrid::new(0.0, 10).is_err());
    }

    #[test]
    fn no_source_gives_wall_value() {
        let g = RadialGrid::new(1.0, 11).unwrap();
        let c = vec![1.0; 11];
        let u = g.solve_diffusion(&c, vec![0.0; 11], 500.0).unwrap();
        for v in u {
            assert!((v - 500.0).abs() < 1e-9);
        }
    }

    #[test]
    fn uniform_source_is_parabolic() {
        // div(grad u) = -q  =>  u = wall + q (R² - r²) / 4
        let n = 201;
        let g = RadialGrid::new(1.0, n).unwrap();
        let dr = g.spacing();
        let q = 4.0;
        let source: Vec<f64> = g.radii().iter().map(|r| -dr * r * q).collect();
        let u = g.solve_diffusion(&vec![1.0; n], source, 0.0).unwrap();
        assert!((u[0] - 1.0).abs() < 1e-2, "axis value {}", u[0]);
        assert!(u.windows(2).all(|w| w[1] <= w[0]));
        assert_eq!(u[n - 1], 0.0);
    }

    #[test]
    fn disc_integral_of_one_is_area() {
        let g = RadialGrid::new(1.0, 2001).unwrap();
        let area = g.integrate_disc(&vec![1.0; 2001]);
        // rectangle rule with full end weights overshoots slightly
        assert!((area - PI).abs() < 1e-2);
    }

    #[test]
    fn relax_blends() {
        assert_eq!(relax(&[10.0], &[0.0], 0.25), vec![2.5]);
    }
}
