//! Case file schema.

use serde::{Deserialize, Serialize};

/// Newest case file version this crate reads.
pub const LATEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaseFile {
    pub version: u32,
    pub name: String,
    /// Directory holding `ar.csv`, `h2.csv`, `n2.csv`, `o2.csv`; builtin
    /// tables when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plasma: Option<PlasmaDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reactor: Option<ReactorDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<SettingsDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum CompositionDef {
    Pure { species: String },
    Mixture { fractions: Vec<(String, f64)> },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlasmaDef {
    pub composition: CompositionDef,
    pub input_power_w: f64,
    pub flow_rate_slpm: f64,
    pub inlet_radius_m: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReactorDef {
    pub n_cells: usize,
    pub length_m: f64,
    pub precursor: String,
    pub feed_rate_kg_s: f64,
    pub carrier: CompositionDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t_end_s: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_steps: Option<usize>,
    /// CSV with `x,U,T,p` columns; builtin profiles when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profiles: Option<String>,
}

/// Overrides of the plasma solver defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SettingsDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wall_temperature_k: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupling_efficiency: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub torch_length_factor: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_field_v_m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_pressure_gradient_pa_m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_temperature_k: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_relaxation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub momentum_relaxation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_tolerance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_tolerance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_inner_iterations: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_momentum_iterations: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_power_iterations: Option<usize>,
}
