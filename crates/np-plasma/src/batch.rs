//! Independent solves of several cases in parallel.

use std::sync::Arc;

use np_props::PropertyLibrary;
use rayon::prelude::*;
use tracing::debug;

use crate::error::PlasmaResult;
use crate::settings::{PlasmaCase, PlasmaSettings};
use crate::solver::{PlasmaSolution, PlasmaTransportSolver};

/// Solve every case with its own solver instance. Results keep the order of
/// `cases`; one failing case does not stop the others.
pub fn solve_batch(
    cases: &[PlasmaCase],
    library: &Arc<PropertyLibrary>,
    settings: &PlasmaSettings,
) -> Vec<PlasmaResult<PlasmaSolution>> {
    cases
        .par_iter()
        .enumerate()
        .map(|(i, case)| {
            debug!(case = i, "batch solve started");
            let mut solver = PlasmaTransportSolver::new(settings.clone())?;
            solver.set_case(case.clone(), Arc::clone(library))?;
            solver.solve()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use np_core::units::{mm, w};
    use np_props::{Composition, Species};

    #[test]
    fn keeps_order_and_isolates_failures() {
        let library = Arc::new(PropertyLibrary::builtin().unwrap());
        let settings = PlasmaSettings {
            nodes: 21,
            max_inner_iterations: 4,
            max_power_iterations: 2,
            max_momentum_iterations: 4,
            ..Default::default()
        };
        let good = PlasmaCase {
            composition: Composition::pure(Species::Ar).unwrap(),
            input_power: w(10_000.0),
            flow_rate_slpm: 40.0,
            inlet_radius: mm(5.0),
        };
        let bad = PlasmaCase {
            inlet_radius: mm(0.0),
            ..good.clone()
        };
        let results = solve_batch(&[good.clone(), bad, good], &library, &settings);
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert_eq!(results[0], results[2]);
    }
}
