//! Darcy friction factor.
//!
//! Laminar flow uses the closed form `f = 64 / Re`. Turbulent and transitional
//! flow solve the implicit Colebrook-White relation
//!
//! ```text
//! 1/sqrt(f) = -2 log10( eps/(3.7 D) + 2.51/(Re sqrt(f)) )
//! ```
//!
//! by direct substitution from a fixed seed.

use pf_core::units::Length;
use std::fmt;
use tracing::trace;

/// Reynolds number below which the flow is treated as laminar.
pub const LAMINAR_REYNOLDS_LIMIT: f64 = 2000.0;

/// Initial friction factor for the Colebrook-White iteration.
pub const FRICTION_SEED: f64 = 0.02;

/// Stop once successive iterates differ by less than this.
pub const FRICTION_TOLERANCE: f64 = 1e-6;

/// Iteration cap for the Colebrook-White loop.
pub const FRICTION_MAX_ITERATIONS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowRegime {
    Laminar,
    Turbulent,
}

impl FlowRegime {
    pub fn from_reynolds(reynolds: f64) -> Self {
        if reynolds < LAMINAR_REYNOLDS_LIMIT {
            FlowRegime::Laminar
        } else {
            FlowRegime::Turbulent
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FlowRegime::Laminar => "laminar",
            FlowRegime::Turbulent => "turbulent",
        }
    }
}

impl fmt::Display for FlowRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Colebrook-White iteration settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrictionConfig {
    pub seed: f64,
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for FrictionConfig {
    fn default() -> Self {
        Self {
            seed: FRICTION_SEED,
            tolerance: FRICTION_TOLERANCE,
            max_iterations: FRICTION_MAX_ITERATIONS,
        }
    }
}

/// Outcome of a friction factor evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrictionSolution {
    /// Darcy friction factor
    pub factor: f64,
    pub regime: FlowRegime,
    /// Substitution steps taken (0 for laminar flow)
    pub iterations: usize,
    /// Absolute change between the last two iterates
    pub change: f64,
    /// False when the cap was hit before the tolerance was met
    pub converged: bool,
}

/// Darcy friction factor with default iteration settings.
///
/// `reynolds` must be strictly positive; the laminar branch divides by it and
/// the turbulent branch takes its logarithm. This is not checked here.
pub fn resolve_friction(reynolds: f64, roughness: Length, diameter: Length) -> f64 {
    colebrook_white(reynolds, roughness, diameter, &FrictionConfig::default()).factor
}

/// Darcy friction factor with explicit iteration settings.
///
/// Same precondition as [`resolve_friction`]: `reynolds > 0`.
pub fn colebrook_white(
    reynolds: f64,
    roughness: Length,
    diameter: Length,
    config: &FrictionConfig,
) -> FrictionSolution {
    debug_assert!(reynolds > 0.0, "Reynolds number must be positive");

    if reynolds < LAMINAR_REYNOLDS_LIMIT {
        return FrictionSolution {
            factor: 64.0 / reynolds,
            regime: FlowRegime::Laminar,
            iterations: 0,
            change: 0.0,
            converged: true,
        };
    }

    let roughness_term = roughness_term(roughness, diameter);
    let mut f = config.seed;
    let mut change = f64::INFINITY;

    for iteration in 1..=config.max_iterations {
        let next = colebrook_update(f, reynolds, roughness_term);
        change = (next - f).abs();
        f = next;
        trace!(iteration, friction_factor = f, change, "colebrook-white step");

        if change < config.tolerance {
            return FrictionSolution {
                factor: f,
                regime: FlowRegime::Turbulent,
                iterations: iteration,
                change,
                converged: true,
            };
        }
    }

    FrictionSolution {
        factor: f,
        regime: FlowRegime::Turbulent,
        iterations: config.max_iterations,
        change,
        converged: false,
    }
}

/// `g(f) - f`, where `g` is the Colebrook-White right-hand side solved for `f`.
///
/// Zero at an exact solution.
pub fn colebrook_residual(
    friction_factor: f64,
    reynolds: f64,
    roughness: Length,
    diameter: Length,
) -> f64 {
    colebrook_update(
        friction_factor,
        reynolds,
        roughness_term(roughness, diameter),
    ) - friction_factor
}

fn roughness_term(roughness: Length, diameter: Length) -> f64 {
    roughness.value / (3.7 * diameter.value)
}

fn colebrook_update(f: f64, reynolds: f64, roughness_term: f64) -> f64 {
    let inv_sqrt_f = -2.0 * (roughness_term + 2.51 / (reynolds * f.sqrt())).log10();
    1.0 / (inv_sqrt_f * inv_sqrt_f)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use pf_core::units::m;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn turbulent_solution_satisfies_colebrook(
            reynolds in 2000.0_f64..1e8,
            relative_roughness in 1e-6_f64..0.05,
        ) {
            let diameter = m(0.1);
            let roughness = m(relative_roughness * 0.1);
            let sol = colebrook_white(reynolds, roughness, diameter, &FrictionConfig::default());

            prop_assert!(sol.converged);
            prop_assert!(sol.factor > 0.0 && sol.factor.is_finite());
            let residual = colebrook_residual(sol.factor, reynolds, roughness, diameter);
            prop_assert!(residual.abs() < 1e-6, "residual = {}", residual);
        }

        #[test]
        fn laminar_matches_closed_form(reynolds in 1.0_f64..2000.0) {
            let f = resolve_friction(reynolds, m(0.000_15), m(0.1));
            prop_assert_eq!(f, 64.0 / reynolds);
        }
    }
}
