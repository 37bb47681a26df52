//! Flow-state solver: fills in velocity, flow rate and head loss from
//! whichever of them the caller knows.
//!
//! Two resolution paths:
//! - **Head loss**: velocity unknown, head loss known. Velocity and friction
//!   factor depend on each other under a fixed head loss, so an outer
//!   fixed-point loop alternates the rearranged Darcy-Weisbach relation with a
//!   full friction factor solve until the friction factor settles.
//! - **Direct**: velocity known or derivable from flow rate. The friction
//!   factor is resolved once and the remaining quantities follow.
//!
//! Supplied quantities are kept as given; derived values only fill the gaps.

use crate::error::{HydraulicsError, HydraulicsResult, LoopStage, Quantity};
use crate::fluid::FluidProperties;
use crate::friction::{FlowRegime, FrictionConfig, FrictionSolution, colebrook_white};
use crate::geometry::PipeGeometry;
use pf_core::numeric::{Tolerances, ensure_finite, nearly_equal};
use pf_core::units::constants;
use pf_core::units::{Accel, Area, Length, Pressure, Velocity, VolumeRate, m, m3ps, mps, pa};
use tracing::{debug, trace, warn};

/// Initial friction factor for the head-loss loop.
pub const HEAD_LOSS_SEED: f64 = 0.02;

/// Stop once the friction factor changes by less than this between outer steps.
pub const HEAD_LOSS_TOLERANCE: f64 = 1e-6;

/// Iteration cap for the head-loss loop.
pub const HEAD_LOSS_MAX_ITERATIONS: usize = 100;

/// Relative disagreement above which a supplied value is reported as
/// inconsistent with the derived one.
pub const CONSISTENCY_TOLERANCE: f64 = 1e-3;

/// The subset of flow quantities the caller supplies.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KnownQuantities {
    pub velocity: Option<Velocity>,
    pub flow_rate: Option<VolumeRate>,
    pub head_loss: Option<Length>,
}

impl KnownQuantities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_velocity(mut self, velocity: Velocity) -> Self {
        self.velocity = Some(velocity);
        self
    }

    pub fn with_flow_rate(mut self, flow_rate: VolumeRate) -> Self {
        self.flow_rate = Some(flow_rate);
        self
    }

    pub fn with_head_loss(mut self, head_loss: Length) -> Self {
        self.head_loss = Some(head_loss);
        self
    }

    fn validate(&self) -> HydraulicsResult<()> {
        let supplied = [
            (Quantity::Velocity, self.velocity.map(|v| v.value)),
            (Quantity::FlowRate, self.flow_rate.map(|q| q.value)),
            (Quantity::HeadLoss, self.head_loss.map(|h| h.value)),
        ];
        for (what, value) in supplied {
            if let Some(value) = value {
                // Zero flow leaves Re = 0, where the friction factor is undefined.
                if !(value.is_finite() && value > 0.0) {
                    return Err(HydraulicsError::InvalidFlow { what, value });
                }
            }
        }
        Ok(())
    }
}

/// Solver settings. `Default` reproduces the reference constants for water.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    pub fluid: FluidProperties,
    pub gravity: Accel,
    /// Inner Colebrook-White loop
    pub friction: FrictionConfig,
    /// Friction factor seed for the head-loss loop
    pub seed: f64,
    pub outer_tolerance: f64,
    pub max_outer_iterations: usize,
    /// Return unconverged results (flagged) instead of `NonConvergence`
    pub accept_unconverged: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            fluid: FluidProperties::water(),
            gravity: constants::g(),
            friction: FrictionConfig::default(),
            seed: HEAD_LOSS_SEED,
            outer_tolerance: HEAD_LOSS_TOLERANCE,
            max_outer_iterations: HEAD_LOSS_MAX_ITERATIONS,
            accept_unconverged: false,
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> HydraulicsResult<()> {
        self.fluid.validate()?;
        if !(self.gravity.value.is_finite() && self.gravity.value > 0.0) {
            return Err(HydraulicsError::InvalidConfig {
                what: "gravity must be finite and > 0",
            });
        }
        if !(self.seed.is_finite() && self.seed > 0.0 && self.friction.seed > 0.0) {
            return Err(HydraulicsError::InvalidConfig {
                what: "friction factor seeds must be > 0",
            });
        }
        if !(self.outer_tolerance > 0.0 && self.friction.tolerance > 0.0) {
            return Err(HydraulicsError::InvalidConfig {
                what: "tolerances must be > 0",
            });
        }
        if self.max_outer_iterations == 0 || self.friction.max_iterations == 0 {
            return Err(HydraulicsError::InvalidConfig {
                what: "iteration caps must be at least 1",
            });
        }
        Ok(())
    }
}

/// How the solver pinned down the velocity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionPath {
    HeadLoss,
    Direct,
}

impl ResolutionPath {
    pub fn label(self) -> &'static str {
        match self {
            ResolutionPath::HeadLoss => "head loss",
            ResolutionPath::Direct => "direct",
        }
    }
}

/// Iteration bookkeeping attached to every result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Convergence {
    /// False only when `accept_unconverged` let an unconverged loop through
    pub converged: bool,
    /// Head-loss loop steps (0 on the direct path)
    pub outer_iterations: usize,
    /// Colebrook-White steps summed over all friction solves
    pub friction_iterations: usize,
    /// Final change in friction factor of the governing loop
    pub residual: f64,
}

/// Fully resolved flow in a pipe section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowState {
    pub velocity: Velocity,
    pub flow_rate: VolumeRate,
    pub head_loss: Length,
    pub reynolds: f64,
    pub friction_factor: f64,
    pub regime: FlowRegime,
    pub area: Area,
    pub relative_roughness: f64,
    /// Frictional pressure drop `rho * g * h_f`
    pub pressure_drop: Pressure,
    pub path: ResolutionPath,
    pub convergence: Convergence,
}

/// Result of the head-loss loop on its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadLossIteration {
    pub velocity: Velocity,
    pub friction_factor: f64,
    pub reynolds: f64,
    pub convergence: Convergence,
}

/// Solve with default settings (water, reference tolerances and caps).
pub fn solve(
    length: Length,
    diameter: Length,
    roughness: Length,
    known: &KnownQuantities,
) -> HydraulicsResult<FlowState> {
    let geometry = PipeGeometry::new(length, diameter, roughness)?;
    solve_with_config(&geometry, known, &SolverConfig::default())
}

/// Solve for the full flow state from the supplied quantities.
///
/// Fails with `InsufficientInput` when no flow quantity is supplied, with
/// `InvalidFlow` when a supplied one is not finite and positive, and with
/// `NonConvergence` when a loop hits its cap (unless the config accepts it).
pub fn solve_with_config(
    geometry: &PipeGeometry,
    known: &KnownQuantities,
    config: &SolverConfig,
) -> HydraulicsResult<FlowState> {
    config.validate()?;
    known.validate()?;

    match (known.velocity, known.flow_rate, known.head_loss) {
        (None, _, Some(head_loss)) => {
            let iteration = iterate_head_loss(geometry, head_loss, config)?;
            finish(
                geometry,
                known,
                config,
                ResolutionPath::HeadLoss,
                iteration.velocity.value,
                iteration.reynolds,
                iteration.friction_factor,
                iteration.convergence,
            )
        }
        (Some(velocity), _, _) => solve_direct(geometry, known, config, velocity.value),
        (None, Some(flow_rate), None) => {
            let velocity = flow_rate.value / geometry.area().value;
            solve_direct(geometry, known, config, velocity)
        }
        (None, None, None) => Err(HydraulicsError::InsufficientInput {
            missing: Quantity::Velocity,
            reason: "supply a velocity, flow rate or head loss",
        }),
    }
}

/// Velocity from a known head loss by alternating the rearranged
/// Darcy-Weisbach relation `V = sqrt(2 g h_f D / (f L))` with a full
/// friction factor solve.
///
/// If an inner friction solve fails to converge the loop aborts with
/// `NonConvergence { stage: FrictionFactor }`, unless the config accepts
/// unconverged results, in which case the final report is flagged.
pub fn iterate_head_loss(
    geometry: &PipeGeometry,
    head_loss: Length,
    config: &SolverConfig,
) -> HydraulicsResult<HeadLossIteration> {
    config.validate()?;
    let length = geometry.length().value;
    let diameter = geometry.diameter().value;
    let g = config.gravity.value;
    let h_f = head_loss.value;
    if !(h_f.is_finite() && h_f > 0.0) {
        return Err(HydraulicsError::InvalidFlow {
            what: Quantity::HeadLoss,
            value: h_f,
        });
    }

    let mut f = config.seed;
    let mut friction_iterations = 0;
    let mut inner_converged = true;
    let mut last = (0.0, f, 0.0, f64::INFINITY);

    for iteration in 1..=config.max_outer_iterations {
        let velocity = finite((2.0 * g * h_f * diameter / (f * length)).sqrt(), "velocity")?;
        let reynolds = finite(config.fluid.reynolds(velocity, diameter), "Reynolds number")?;

        let inner = colebrook_white(
            reynolds,
            geometry.roughness(),
            geometry.diameter(),
            &config.friction,
        );
        friction_iterations += inner.iterations;
        inner_converged &= check_inner(&inner, config)?;

        let next = finite(inner.factor, "friction factor")?;
        let change = (next - f).abs();
        trace!(iteration, velocity, reynolds, friction_factor = next, change, "head-loss step");

        if change < config.outer_tolerance {
            debug!(
                iterations = iteration,
                velocity,
                friction_factor = f,
                "head-loss iteration converged"
            );
            return Ok(HeadLossIteration {
                velocity: mps(velocity),
                friction_factor: f,
                reynolds,
                convergence: Convergence {
                    converged: inner_converged,
                    outer_iterations: iteration,
                    friction_iterations,
                    residual: change,
                },
            });
        }

        last = (velocity, f, reynolds, change);
        f = next;
    }

    let (velocity, friction_factor, reynolds, change) = last;
    if !config.accept_unconverged {
        return Err(HydraulicsError::NonConvergence {
            stage: LoopStage::HeadLoss,
            iterations: config.max_outer_iterations,
            change,
        });
    }
    warn!(
        iterations = config.max_outer_iterations,
        change, "head-loss iteration hit its cap; result is approximate"
    );
    Ok(HeadLossIteration {
        velocity: mps(velocity),
        friction_factor,
        reynolds,
        convergence: Convergence {
            converged: false,
            outer_iterations: config.max_outer_iterations,
            friction_iterations,
            residual: change,
        },
    })
}

/// Frictional head loss `f (L/D) V^2 / (2 g)`.
pub fn darcy_head_loss(
    friction_factor: f64,
    geometry: &PipeGeometry,
    velocity: Velocity,
    gravity: Accel,
) -> Length {
    let ratio = geometry.length().value / geometry.diameter().value;
    m(friction_factor * ratio * velocity.value.powi(2) / (2.0 * gravity.value))
}

fn solve_direct(
    geometry: &PipeGeometry,
    known: &KnownQuantities,
    config: &SolverConfig,
    velocity: f64,
) -> HydraulicsResult<FlowState> {
    let velocity = finite(velocity, "velocity")?;
    let reynolds = finite(
        config.fluid.reynolds(velocity, geometry.diameter().value),
        "Reynolds number",
    )?;
    let friction = colebrook_white(
        reynolds,
        geometry.roughness(),
        geometry.diameter(),
        &config.friction,
    );
    let converged = check_inner(&friction, config)?;
    let friction_factor = finite(friction.factor, "friction factor")?;

    finish(
        geometry,
        known,
        config,
        ResolutionPath::Direct,
        velocity,
        reynolds,
        friction_factor,
        Convergence {
            converged,
            outer_iterations: 0,
            friction_iterations: friction.iterations,
            residual: friction.change,
        },
    )
}

#[allow(clippy::too_many_arguments)]
fn finish(
    geometry: &PipeGeometry,
    known: &KnownQuantities,
    config: &SolverConfig,
    path: ResolutionPath,
    velocity: f64,
    reynolds: f64,
    friction_factor: f64,
    convergence: Convergence,
) -> HydraulicsResult<FlowState> {
    let area = geometry.area();
    let flow_rate = reconcile(
        Quantity::FlowRate,
        known.flow_rate.map(|q| q.value),
        velocity * area.value,
    );
    let head_loss = reconcile(
        Quantity::HeadLoss,
        known.head_loss.map(|h| h.value),
        darcy_head_loss(friction_factor, geometry, mps(velocity), config.gravity).value,
    );
    let head_loss = finite(head_loss, "head loss")?;
    let pressure_drop = config.fluid.density.value * config.gravity.value * head_loss;

    debug!(
        path = path.label(),
        velocity,
        flow_rate,
        head_loss,
        reynolds,
        friction_factor,
        "flow state resolved"
    );

    Ok(FlowState {
        velocity: mps(velocity),
        flow_rate: m3ps(flow_rate),
        head_loss: m(head_loss),
        reynolds,
        friction_factor,
        regime: FlowRegime::from_reynolds(reynolds),
        area,
        relative_roughness: geometry.relative_roughness(),
        pressure_drop: pa(pressure_drop),
        path,
        convergence,
    })
}

/// Returns whether the friction solve converged, or the error when the config
/// does not accept unconverged results.
fn check_inner(solution: &FrictionSolution, config: &SolverConfig) -> HydraulicsResult<bool> {
    if solution.converged {
        return Ok(true);
    }
    if !config.accept_unconverged {
        return Err(HydraulicsError::NonConvergence {
            stage: LoopStage::FrictionFactor,
            iterations: solution.iterations,
            change: solution.change,
        });
    }
    warn!(
        iterations = solution.iterations,
        change = solution.change,
        "friction factor iteration hit its cap; continuing with last iterate"
    );
    Ok(false)
}

fn reconcile(what: Quantity, supplied: Option<f64>, derived: f64) -> f64 {
    match supplied {
        Some(value) => {
            let tol = Tolerances {
                abs: 0.0,
                rel: CONSISTENCY_TOLERANCE,
            };
            if !nearly_equal(derived, value, tol) {
                warn!(
                    quantity = %what,
                    supplied = value,
                    derived,
                    "supplied value disagrees with derived value; keeping supplied"
                );
            }
            value
        }
        None => derived,
    }
}

fn finite(value: f64, what: &'static str) -> HydraulicsResult<f64> {
    ensure_finite(value, what).map_err(|_| HydraulicsError::NonFinite { what, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::friction::{FRICTION_TOLERANCE, colebrook_residual};
    use pf_core::units::m;

    fn steel_pipe() -> PipeGeometry {
        PipeGeometry::new(m(100.0), m(0.1), m(0.000_15)).unwrap()
    }

    #[test]
    fn flow_rate_to_velocity() {
        let known = KnownQuantities::new().with_flow_rate(m3ps(0.01));
        let state = solve_with_config(&steel_pipe(), &known, &SolverConfig::default()).unwrap();

        assert!((state.area.value - 0.007_854).abs() < 1e-6);
        assert!((state.velocity.value - 1.2732).abs() < 1e-4);
        assert_eq!(state.flow_rate.value, 0.01);
        assert_eq!(state.path, ResolutionPath::Direct);
        assert_eq!(state.convergence.outer_iterations, 0);
    }

    #[test]
    fn velocity_fills_everything() {
        let known = KnownQuantities::new().with_velocity(mps(1.5));
        let state = solve_with_config(&steel_pipe(), &known, &SolverConfig::default()).unwrap();

        assert!((state.reynolds - 150_000.0).abs() < 1e-6);
        assert_eq!(state.regime, FlowRegime::Turbulent);
        assert!((state.flow_rate.value - 1.5 * state.area.value).abs() < 1e-12);
        // h_f = f (L/D) V^2 / 2g
        let expected = state.friction_factor * 1000.0 * 2.25 / (2.0 * constants::G_MPS2);
        assert!((state.head_loss.value - expected).abs() < 1e-12);
        assert!((state.pressure_drop.value - 1000.0 * constants::G_MPS2 * expected).abs() < 1e-6);
    }

    #[test]
    fn head_loss_path_converges() {
        let state = solve(
            m(100.0),
            m(0.1),
            m(0.000_15),
            &KnownQuantities::new().with_head_loss(m(2.0)),
        )
        .unwrap();

        assert_eq!(state.path, ResolutionPath::HeadLoss);
        assert!(state.convergence.converged);
        assert!(state.convergence.residual < 1e-6);
        assert!(state.convergence.outer_iterations >= 2);
        assert!((state.velocity.value - 1.297).abs() < 5e-3, "V = {}", state.velocity.value);
        assert_eq!(state.head_loss.value, 2.0);

        let residual = colebrook_residual(state.friction_factor, state.reynolds, m(0.000_15), m(0.1));
        assert!(residual.abs() < 1e-5);
    }

    #[test]
    fn laminar_head_loss_path() {
        // Very small head loss in a thin smooth tube stays laminar.
        let pipe = PipeGeometry::new(m(10.0), m(0.005), m(0.000_001_5)).unwrap();
        let known = KnownQuantities::new().with_head_loss(m(0.01));
        let state = solve_with_config(&pipe, &known, &SolverConfig::default()).unwrap();

        assert_eq!(state.regime, FlowRegime::Laminar);
        assert!(state.convergence.converged);
        assert!((state.friction_factor - 64.0 / state.reynolds).abs() < 1e-5);
    }

    #[test]
    fn nothing_known_is_insufficient() {
        let err = solve(m(100.0), m(0.1), m(0.000_15), &KnownQuantities::new()).unwrap_err();
        assert!(matches!(
            err,
            HydraulicsError::InsufficientInput {
                missing: Quantity::Velocity,
                ..
            }
        ));
    }

    #[test]
    fn zero_length_or_diameter_is_invalid_dimension() {
        let known = KnownQuantities::new().with_velocity(mps(1.0));
        let err = solve(m(100.0), m(0.0), m(0.000_15), &known).unwrap_err();
        assert!(matches!(
            err,
            HydraulicsError::InvalidDimension {
                what: "pipe diameter",
                ..
            }
        ));

        let err = solve(m(0.0), m(0.1), m(0.000_15), &known.with_head_loss(m(1.0))).unwrap_err();
        assert!(matches!(
            err,
            HydraulicsError::InvalidDimension {
                what: "pipe length",
                ..
            }
        ));
    }

    #[test]
    fn zero_or_negative_flow_is_rejected() {
        let err = solve(
            m(100.0),
            m(0.1),
            m(0.000_15),
            &KnownQuantities::new().with_velocity(mps(0.0)),
        )
        .unwrap_err();
        assert_eq!(
            err,
            HydraulicsError::InvalidFlow {
                what: Quantity::Velocity,
                value: 0.0
            }
        );

        let err = solve(
            m(100.0),
            m(0.1),
            m(0.000_15),
            &KnownQuantities::new().with_head_loss(m(-2.0)),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            HydraulicsError::InvalidFlow {
                what: Quantity::HeadLoss,
                ..
            }
        ));
    }

    #[test]
    fn supplied_values_are_kept() {
        // Head loss takes priority over flow rate, but the supplied flow rate
        // is reported unchanged.
        let known = KnownQuantities::new()
            .with_flow_rate(m3ps(0.5))
            .with_head_loss(m(2.0));
        let state = solve_with_config(&steel_pipe(), &known, &SolverConfig::default()).unwrap();

        assert_eq!(state.path, ResolutionPath::HeadLoss);
        assert_eq!(state.flow_rate.value, 0.5);
        assert_eq!(state.head_loss.value, 2.0);
    }

    #[test]
    fn outer_cap_reports_non_convergence() {
        let config = SolverConfig {
            max_outer_iterations: 1,
            ..SolverConfig::default()
        };
        let known = KnownQuantities::new().with_head_loss(m(2.0));
        let err = solve_with_config(&steel_pipe(), &known, &config).unwrap_err();
        assert!(matches!(
            err,
            HydraulicsError::NonConvergence {
                stage: LoopStage::HeadLoss,
                iterations: 1,
                ..
            }
        ));
    }

    #[test]
    fn unconverged_result_is_flagged_when_accepted() {
        let config = SolverConfig {
            max_outer_iterations: 1,
            accept_unconverged: true,
            ..SolverConfig::default()
        };
        let known = KnownQuantities::new().with_head_loss(m(2.0));
        let state = solve_with_config(&steel_pipe(), &known, &config).unwrap();

        assert!(!state.convergence.converged);
        assert_eq!(state.convergence.outer_iterations, 1);
        assert!(state.velocity.value > 0.0 && state.velocity.value.is_finite());
    }

    #[test]
    fn inner_non_convergence_aborts_head_loss_loop() {
        let config = SolverConfig {
            friction: FrictionConfig {
                max_iterations: 1,
                ..FrictionConfig::default()
            },
            ..SolverConfig::default()
        };
        let known = KnownQuantities::new().with_head_loss(m(2.0));
        let err = solve_with_config(&steel_pipe(), &known, &config).unwrap_err();
        assert!(matches!(
            err,
            HydraulicsError::NonConvergence {
                stage: LoopStage::FrictionFactor,
                ..
            }
        ));
    }

    fn single_step_friction_accepted() -> SolverConfig {
        SolverConfig {
            friction: FrictionConfig {
                max_iterations: 1,
                ..FrictionConfig::default()
            },
            accept_unconverged: true,
            ..SolverConfig::default()
        }
    }

    #[test]
    fn accepted_inner_non_convergence_is_flagged_on_head_loss_path() {
        let known = KnownQuantities::new().with_head_loss(m(2.0));
        let state =
            solve_with_config(&steel_pipe(), &known, &single_step_friction_accepted()).unwrap();

        assert_eq!(state.path, ResolutionPath::HeadLoss);
        assert!(!state.convergence.converged);
        // The outer loop still settles; only the inner solves were cut short.
        assert!(state.convergence.outer_iterations >= 1);
        assert!(state.convergence.outer_iterations < SolverConfig::default().max_outer_iterations);
        assert_eq!(
            state.convergence.friction_iterations,
            state.convergence.outer_iterations
        );
        assert!((state.velocity.value - 1.297).abs() < 1e-2, "V = {}", state.velocity.value);
        assert_eq!(state.head_loss.value, 2.0);
    }

    #[test]
    fn accepted_inner_non_convergence_is_flagged_on_direct_path() {
        let known = KnownQuantities::new().with_velocity(mps(1.5));
        let state =
            solve_with_config(&steel_pipe(), &known, &single_step_friction_accepted()).unwrap();

        assert_eq!(state.path, ResolutionPath::Direct);
        assert!(!state.convergence.converged);
        assert_eq!(state.convergence.outer_iterations, 0);
        assert_eq!(state.convergence.friction_iterations, 1);
        assert!(state.convergence.residual >= FRICTION_TOLERANCE);
        assert!(state.friction_factor > 0.0 && state.friction_factor.is_finite());
    }

    #[test]
    fn zero_iteration_cap_is_invalid_config() {
        let config = SolverConfig {
            max_outer_iterations: 0,
            ..SolverConfig::default()
        };
        let known = KnownQuantities::new().with_velocity(mps(1.0));
        assert!(matches!(
            solve_with_config(&steel_pipe(), &known, &config),
            Err(HydraulicsError::InvalidConfig { .. })
        ));
    }
}
