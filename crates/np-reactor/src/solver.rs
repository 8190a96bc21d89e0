//! Implicit upwind-centred transport of the precursor mole fraction.

use std::sync::Arc;

use np_core::solve_tridiagonal;
use tracing::debug;

use crate::error::{ReactorError, ReactorResult};
use crate::profiles::ReferenceProfiles;

/// Courant number used for the suggested time step.
const COURANT: f64 = 0.1;

/// Output of one transport step, one entry per reactor cell.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportStep {
    pub concentrations: Vec<f64>,
    pub velocity: Vec<f64>,
    pub temperature: Vec<f64>,
    pub pressure: Vec<f64>,
    /// Suggested next time step [s]
    pub dt: f64,
}

#[derive(Debug, Clone)]
struct Domain {
    n_cells: usize,
    dx: f64,
    inlet_fraction: f64,
    positions: Vec<f64>,
    node_velocity: Vec<f64>,
    cell_velocity: Vec<f64>,
    cell_temperature: Vec<f64>,
    cell_pressure: Vec<f64>,
    t_old: f64,
    c_old: Vec<f64>,
}

impl Domain {
    fn nodes(&self) -> usize {
        self.n_cells + 2
    }
}

/// Chain of `n_cells` reactor cells between an inlet and an outlet node.
pub struct SpeciesTransportSolver {
    profiles: Arc<ReferenceProfiles>,
    domain: Option<Domain>,
}

impl SpeciesTransportSolver {
    /// Solver over the builtin reference profiles.
    pub fn new() -> ReactorResult<Self> {
        Ok(Self::with_profiles(Arc::new(ReferenceProfiles::builtin()?)))
    }

    pub fn with_profiles(profiles: Arc<ReferenceProfiles>) -> Self {
        Self {
            profiles,
            domain: None,
        }
    }

    /// Lay out `n_cells` cells over `length` [m] with the inlet held at
    /// `inlet_fraction`. Flow conditions are sampled once at the cell centres.
    pub fn set_domain(
        &mut self,
        n_cells: usize,
        length: f64,
        inlet_fraction: f64,
    ) -> ReactorResult<()> {
        if n_cells == 0 {
            return Err(ReactorError::InvalidArg {
                what: "reactor needs at least one cell".to_string(),
            });
        }
        if !(length.is_finite() && length > 0.0) {
            return Err(ReactorError::InvalidArg {
                what: format!("reactor length must be positive, got {length}"),
            });
        }
        if !(0.0..=1.0).contains(&inlet_fraction) {
            return Err(ReactorError::InvalidArg {
                what: format!("inlet fraction must lie in [0, 1], got {inlet_fraction}"),
            });
        }

        let nodes = n_cells + 2;
        let dx = length / (n_cells + 1) as f64;
        let positions: Vec<f64> = (0..nodes).map(|i| i as f64 * dx).collect();
        let node_velocity = positions
            .iter()
            .map(|&x| self.profiles.velocity(x))
            .collect();
        let centres: Vec<f64> = (0..n_cells).map(|i| dx / 2.0 + i as f64 * dx).collect();
        let p = &self.profiles;

        self.domain = Some(Domain {
            n_cells,
            dx,
            inlet_fraction,
            node_velocity,
            cell_velocity: centres.iter().map(|&x| p.velocity(x)).collect(),
            cell_temperature: centres.iter().map(|&x| p.temperature(x)).collect(),
            cell_pressure: centres.iter().map(|&x| p.pressure(x)).collect(),
            positions,
            t_old: 0.0,
            c_old: vec![0.0; nodes],
        });
        debug!(n_cells, dx, inlet_fraction, "reactor domain set");
        Ok(())
    }

    fn domain(&self) -> ReactorResult<&Domain> {
        self.domain.as_ref().ok_or(ReactorError::DomainNotSet)
    }

    pub fn n_cells(&self) -> ReactorResult<usize> {
        Ok(self.domain()?.n_cells)
    }

    pub fn nodes(&self) -> ReactorResult<usize> {
        Ok(self.domain()?.nodes())
    }

    pub fn dx(&self) -> ReactorResult<f64> {
        Ok(self.domain()?.dx)
    }

    pub fn positions(&self) -> ReactorResult<&[f64]> {
        Ok(&self.domain()?.positions)
    }

    pub fn inlet_fraction(&self) -> ReactorResult<f64> {
        Ok(self.domain()?.inlet_fraction)
    }

    /// Time of the last completed step.
    pub fn t_old(&self) -> ReactorResult<f64> {
        Ok(self.domain()?.t_old)
    }

    /// Nodal solution of the last completed step, boundary nodes included.
    pub fn previous_solution(&self) -> ReactorResult<&[f64]> {
        Ok(&self.domain()?.c_old)
    }

    pub fn cell_velocity(&self) -> ReactorResult<&[f64]> {
        Ok(&self.domain()?.cell_velocity)
    }

    pub fn cell_temperature(&self) -> ReactorResult<&[f64]> {
        Ok(&self.domain()?.cell_temperature)
    }

    pub fn cell_pressure(&self) -> ReactorResult<&[f64]> {
        Ok(&self.domain()?.cell_pressure)
    }

    /// Stable time step `0.1·dx / max(U)`.
    pub fn dt(&self) -> ReactorResult<f64> {
        let d = self.domain()?;
        let u_max = d
            .cell_velocity
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        if !(u_max.is_finite() && u_max > 0.0) {
            return Err(ReactorError::Numeric {
                what: format!("maximum cell velocity is {u_max}"),
            });
        }
        Ok(COURANT * d.dx / u_max)
    }

    /// Advance from the last step time to `t`. `cs` holds the cell values
    /// from the previous step; its last entry feeds the outlet node.
    pub fn run(&mut self, t: f64, cs: &[f64]) -> ReactorResult<TransportStep> {
        let dt = self.dt()?;
        let d = self.domain.as_mut().ok_or(ReactorError::DomainNotSet)?;
        if !t.is_finite() || t < d.t_old {
            return Err(ReactorError::InvalidArg {
                what: format!("time {t} precedes the last step at {}", d.t_old),
            });
        }
        let Some(&c_last) = cs.last().filter(|_| cs.len() >= d.n_cells) else {
            return Err(ReactorError::InvalidArg {
                what: format!("expected {} cell values, got {}", d.n_cells, cs.len()),
            });
        };

        let nodes = d.nodes();
        let last = nodes - 1;
        let step = t - d.t_old;
        // Inlet row is Dirichlet, interior rows centred, outlet row one-sided.
        // Every pivot stays >= 1 for non-negative velocities.
        let mut lower = vec![0.0; last];
        let mut diag = vec![1.0; nodes];
        let mut upper = vec![0.0; last];
        let mut rhs = vec![0.0; nodes];

        rhs[0] = d.inlet_fraction;
        for i in 1..last {
            let coeff = step * d.node_velocity[i] / (2.0 * d.dx);
            lower[i - 1] = -coeff;
            upper[i] = coeff;
            rhs[i] = cs[i - 1];
        }
        let coeff = step * d.node_velocity[last] / d.dx;
        lower[last - 1] = -coeff;
        diag[last] = 1.0 + coeff;
        rhs[last] = c_last;

        let mut c = solve_tridiagonal(&lower, &diag, &upper, &rhs)?;
        if let Some(bad) = c.iter().find(|v| !v.is_finite()) {
            return Err(ReactorError::Numeric {
                what: format!("transport solution is not finite ({bad})"),
            });
        }

        for v in c.iter_mut().skip(1) {
            *v = v.clamp(0.0, d.inlet_fraction);
        }
        d.t_old = t;
        d.c_old = c;

        Ok(TransportStep {
            concentrations: d.c_old[1..last].to_vec(),
            velocity: d.cell_velocity.clone(),
            temperature: d.cell_temperature.clone(),
            pressure: d.cell_pressure.clone(),
            dt,
        })
    }
}
