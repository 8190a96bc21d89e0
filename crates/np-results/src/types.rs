//! Result data types.

use serde::{Deserialize, Serialize};

pub type RunId = String;

/// Two-column profile table, `(abscissa, value)` per row.
pub type Table2 = Vec<(f64, f64)>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunManifest {
    pub run_id: RunId,
    pub case_name: String,
    pub timestamp: String,
    pub request: RunRequest,
    pub summary: RunSummary,
    pub solver_version: String,
}

impl RunManifest {
    /// Manifest stamped with the current UTC time.
    pub fn now(
        run_id: RunId,
        case_name: &str,
        request: RunRequest,
        summary: RunSummary,
        solver_version: &str,
    ) -> Self {
        Self {
            run_id,
            case_name: case_name.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            request,
            summary,
            solver_version: solver_version.to_string(),
        }
    }
}

/// What was asked for; part of the run id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum RunRequest {
    Plasma,
    Reactor { t_end_s: f64, max_steps: usize },
}

/// Headline numbers of a finished run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum RunSummary {
    Plasma {
        converged: bool,
        power_iterations: usize,
        momentum_iterations: usize,
        field_v_m: f64,
        current_a: f64,
        power_relative_error: f64,
        reference_temperature_k: f64,
        reference_density_kg_m3: f64,
    },
    Reactor {
        reached_end: bool,
        steps: usize,
        time_s: f64,
        inlet_fraction: f64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeseriesRecord {
    pub time_s: f64,
    pub dt_s: f64,
    pub cells: Vec<CellSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CellSnapshot {
    pub index: usize,
    pub precursor_fraction: f64,
    pub velocity_m_s: f64,
    pub temperature_k: f64,
    pub pressure_pa: f64,
}
