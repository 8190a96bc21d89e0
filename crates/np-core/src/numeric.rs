/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

/// `n` evenly spaced points from `start` to `end` inclusive.
pub fn linspace(start: Real, end: Real, n: usize) -> Vec<Real> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as Real;
            (0..n).map(|i| start + step * i as Real).collect()
        }
    }
}

/// Relative change `‖new − old‖ / ‖old‖` in the Euclidean norm.
///
/// Returns infinity when `old` is the zero vector.
pub fn relative_change(new: &[Real], old: &[Real]) -> Real {
    debug_assert_eq!(new.len(), old.len());
    let mut diff = 0.0;
    let mut base = 0.0;
    for (a, b) in new.iter().zip(old) {
        diff += (a - b) * (a - b);
        base += b * b;
    }
    if base == 0.0 {
        return Real::INFINITY;
    }
    (diff / base).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn linspace_endpoints() {
        let r = linspace(0.0, 0.0065, 201);
        assert_eq!(r.len(), 201);
        assert_eq!(r[0], 0.0);
        assert!((r[200] - 0.0065).abs() < 1e-15);
        assert!((r[1] - 0.0065 / 200.0).abs() < 1e-15);
        assert!(linspace(1.0, 2.0, 0).is_empty());
        assert_eq!(linspace(3.0, 4.0, 1), vec![3.0]);
    }

    #[test]
    fn relative_change_of_scaled_vector() {
        let old = [3.0, 4.0];
        let new = [3.3, 4.4];
        assert!((relative_change(&new, &old) - 0.1).abs() < 1e-12);
        assert_eq!(relative_change(&old, &old), 0.0);
        assert!(relative_change(&old, &[0.0, 0.0]).is_infinite());
    }
}
