//! Finite-difference derivative and cumulative integration on tabulated data.

use crate::error::{NpError, NpResult};

/// Numerical derivative `dy/dx` at every point of a tabulated curve.
///
/// Central differences on interior points, forward difference at the first point
/// and backward difference at the last one.
pub fn derivative(points: &[(f64, f64)]) -> NpResult<Vec<f64>> {
    let n = points.len();
    if n < 2 {
        return Err(NpError::InvalidArg {
            what: "derivative needs at least two points",
        });
    }
    let slope = |a: usize, b: usize| -> NpResult<f64> {
        let dx = points[b].0 - points[a].0;
        if dx == 0.0 {
            return Err(NpError::InvalidArg {
                what: "derivative abscissae must be distinct",
            });
        }
        Ok((points[b].1 - points[a].1) / dx)
    };

    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let d = if i == 0 {
            slope(0, 1)?
        } else if i == n - 1 {
            slope(n - 2, n - 1)?
        } else {
            slope(i - 1, i + 1)?
        };
        out.push(d);
    }
    Ok(out)
}

/// Cumulative trapezoidal integral of `y` over `x`, starting from zero.
pub fn cumulative_trapezoid(y: &[f64], x: &[f64]) -> NpResult<Vec<f64>> {
    if y.len() != x.len() {
        return Err(NpError::InvalidArg {
            what: "trapezoid inputs differ in length",
        });
    }
    let mut out = Vec::with_capacity(y.len());
    let mut acc = 0.0;
    for i in 0..y.len() {
        if i > 0 {
            acc += 0.5 * (y[i] + y[i - 1]) * (x[i] - x[i - 1]);
        }
        out.push(acc);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collinear_points_have_constant_slope() {
        let d = derivative(&[(0.0, 0.0), (1.0, 2.0), (2.0, 4.0)]).unwrap();
        assert_eq!(d, vec![2.0, 2.0, 2.0]);
    }

    #[test]
    fn ends_are_one_sided() {
        // y = x^2 on x = 0, 1, 3
        let d = derivative(&[(0.0, 0.0), (1.0, 1.0), (3.0, 9.0)]).unwrap();
        assert_eq!(d[0], 1.0);
        assert_eq!(d[1], 3.0);
        assert_eq!(d[2], 4.0);
    }

    #[test]
    fn two_points_share_one_slope() {
        let d = derivative(&[(1.0, 1.0), (3.0, 2.0)]).unwrap();
        assert_eq!(d, vec![0.5, 0.5]);
    }

    #[test]
    fn rejects_degenerate_input() {
        assert!(derivative(&[(0.0, 1.0)]).is_err());
        assert!(derivative(&[(1.0, 1.0), (1.0, 2.0)]).is_err());
    }

    #[test]
    fn trapezoid_of_linear_function_is_exact() {
        let x = [0.0, 1.0, 2.0, 4.0];
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v).collect();
        let s = cumulative_trapezoid(&y, &x).unwrap();
        assert_eq!(s, vec![0.0, 1.0, 4.0, 16.0]);
    }

    #[test]
    fn trapezoid_length_mismatch() {
        assert!(cumulative_trapezoid(&[1.0], &[1.0, 2.0]).is_err());
    }
}
