//! Error types for hydraulic calculations.

use std::fmt;
use thiserror::Error;

/// Flow quantity a caller can supply or the solver can derive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    Velocity,
    FlowRate,
    HeadLoss,
}

impl Quantity {
    pub fn label(self) -> &'static str {
        match self {
            Quantity::Velocity => "velocity",
            Quantity::FlowRate => "flow rate",
            Quantity::HeadLoss => "head loss",
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which fixed-point loop gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopStage {
    /// Colebrook-White friction factor iteration.
    FrictionFactor,
    /// Outer velocity/friction iteration under a fixed head loss.
    HeadLoss,
}

impl fmt::Display for LoopStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopStage::FrictionFactor => f.write_str("friction factor"),
            LoopStage::HeadLoss => f.write_str("head-loss velocity"),
        }
    }
}

/// Errors that can occur during hydraulic calculations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HydraulicsError {
    #[error("Invalid dimension: {what} = {value} (must be finite and > 0)")]
    InvalidDimension { what: &'static str, value: f64 },

    #[error("Invalid flow input: {what} = {value} (must be finite and > 0)")]
    InvalidFlow { what: Quantity, value: f64 },

    #[error("Insufficient input: cannot determine {missing} ({reason})")]
    InsufficientInput {
        missing: Quantity,
        reason: &'static str,
    },

    #[error("{stage} iteration did not converge after {iterations} iterations (last change {change:e})")]
    NonConvergence {
        stage: LoopStage,
        iterations: usize,
        change: f64,
    },

    #[error("Unknown pipe material: {name}")]
    UnknownMaterial { name: String },

    #[error("Invalid solver configuration: {what}")]
    InvalidConfig { what: &'static str },

    #[error("Non-finite value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },
}

pub type HydraulicsResult<T> = Result<T, HydraulicsError>;
