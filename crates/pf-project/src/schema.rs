//! Case file schema definitions.

use serde::{Deserialize, Serialize};

/// Newest case file version this crate reads and writes.
pub const LATEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Case {
    pub version: u32,
    pub name: String,
    pub pipe: PipeDef,
    #[serde(default)]
    pub known: KnownDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solver: Option<SolverDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fluid: Option<FluidDef>,
}

/// Pipe section. Exactly one of `material` and `roughness_m` is given.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipeDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roughness_m: Option<f64>,
    pub length_m: f64,
    pub diameter_m: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct KnownDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub velocity_mps: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_rate_m3ps: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head_loss_m: Option<f64>,
}

/// Overrides for the solver defaults; absent fields keep the default.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SolverDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_outer_iterations: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outer_tolerance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_friction_iterations: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friction_tolerance: Option<f64>,
    #[serde(default)]
    pub accept_unconverged: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FluidDef {
    pub density_kg_m3: f64,
    pub viscosity_pa_s: f64,
}
