//! Content-based hashing for run IDs.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::types::RunRequest;

/// Hash of everything a run reads.
///
/// `inputs` should hold the case section the run solves together with the
/// data loaded for it (property tables, reference profiles), not the paths
/// that data came from.
pub fn compute_run_id<S: Serialize + ?Sized>(
    inputs: &S,
    request: &RunRequest,
    solver_version: &str,
) -> String {
    let mut hasher = Sha256::new();

    let inputs_json = serde_json::to_string(inputs).unwrap_or_default();
    hasher.update(inputs_json.as_bytes());

    let request_json = serde_json::to_string(request).unwrap_or_default();
    hasher.update(request_json.as_bytes());

    hasher.update(solver_version.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}
