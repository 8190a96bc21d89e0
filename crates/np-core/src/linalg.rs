//! Direct solve of tridiagonal systems.

use crate::error::{NpError, NpResult};

/// Solve `A x = rhs` for a tridiagonal `A` by the Thomas algorithm.
///
/// `lower[i]` multiplies `x[i]` in row `i + 1`, `upper[i]` multiplies `x[i + 1]`
/// in row `i`; both have length `n - 1`. No pivoting is done, so a zero pivot
/// is reported as [`NpError::Singular`].
pub fn solve_tridiagonal(
    lower: &[f64],
    diag: &[f64],
    upper: &[f64],
    rhs: &[f64],
) -> NpResult<Vec<f64>> {
    let n = diag.len();
    if n == 0 {
        return Err(NpError::InvalidArg {
            what: "empty tridiagonal system",
        });
    }
    if rhs.len() != n || lower.len() + 1 != n || upper.len() + 1 != n {
        return Err(NpError::InvalidArg {
            what: "tridiagonal band lengths do not match",
        });
    }

    let mut c = vec![0.0; n];
    let mut d = vec![0.0; n];

    let mut pivot = diag[0];
    if pivot == 0.0 || !pivot.is_finite() {
        return Err(NpError::Singular { row: 0 });
    }
    if n > 1 {
        c[0] = upper[0] / pivot;
    }
    d[0] = rhs[0] / pivot;

    for i in 1..n {
        pivot = diag[i] - lower[i - 1] * c[i - 1];
        if pivot == 0.0 || !pivot.is_finite() {
            return Err(NpError::Singular { row: i });
        }
        if i < n - 1 {
            c[i] = upper[i] / pivot;
        }
        d[i] = (rhs[i] - lower[i - 1] * d[i - 1]) / pivot;
    }

    let mut x = d;
    for i in (0..n - 1).rev() {
        x[i] -= c[i] * x[i + 1];
    }
    Ok(x)
}
