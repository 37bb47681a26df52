//! pf-hydraulics: steady incompressible flow in a straight pipe.
//!
//! Provides:
//! - Material roughness table
//! - Darcy friction factor (laminar closed form, Colebrook-White iteration)
//! - Flow-state solver that fills in velocity, flow rate and head loss
//!   from whichever of them is known
//!
//! Everything is a pure function of its inputs; nothing is cached between
//! calls, so the solver can be called from any number of threads.
//!
//! # Example
//!
//! ```
//! use pf_core::units::m;
//! use pf_hydraulics::{KnownQuantities, lookup_roughness, solve};
//!
//! let roughness = lookup_roughness("steel").unwrap();
//! let known = KnownQuantities::new().with_head_loss(m(2.0));
//! let state = solve(m(100.0), m(0.1), roughness, &known).unwrap();
//!
//! assert!(state.convergence.converged);
//! println!("V = {:.4} m/s", state.velocity.value);
//! ```

pub mod error;
pub mod flow;
pub mod fluid;
pub mod friction;
pub mod geometry;
pub mod material;

// Re-exports
pub use error::{HydraulicsError, HydraulicsResult, LoopStage, Quantity};
pub use flow::{
    Convergence, FlowState, HeadLossIteration, KnownQuantities, ResolutionPath, SolverConfig,
    darcy_head_loss, iterate_head_loss, solve, solve_with_config,
};
pub use fluid::FluidProperties;
pub use friction::{
    FlowRegime, FrictionConfig, FrictionSolution, colebrook_residual, colebrook_white,
    resolve_friction,
};
pub use geometry::PipeGeometry;
pub use material::{Material, MaterialEntry, lookup_roughness, materials};
