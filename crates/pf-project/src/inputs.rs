//! Conversion of a validated case into solver inputs.

use crate::ProjectResult;
use crate::schema::{Case, KnownDef, SolverDef};
use crate::validate::ValidationError;
use pf_core::units::{Length, kg_m3, m, m3ps, mps, pa_s};
use pf_hydraulics::{
    FlowState, FluidProperties, KnownQuantities, PipeGeometry, SolverConfig, lookup_roughness,
    solve_with_config,
};

/// Everything `solve_with_config` needs for one case.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverInputs {
    pub geometry: PipeGeometry,
    pub known: KnownQuantities,
    pub config: SolverConfig,
}

impl Case {
    pub fn to_solver_inputs(&self) -> ProjectResult<SolverInputs> {
        let roughness = resolve_roughness(self.pipe.material.as_deref(), self.pipe.roughness_m)?;
        let geometry = PipeGeometry::new(m(self.pipe.length_m), m(self.pipe.diameter_m), roughness)?;

        let mut config = SolverConfig::default();
        if let Some(solver) = &self.solver {
            apply_solver(&mut config, solver);
        }
        if let Some(fluid) = &self.fluid {
            config.fluid = FluidProperties::new(
                kg_m3(fluid.density_kg_m3),
                pa_s(fluid.viscosity_pa_s),
            );
        }

        Ok(SolverInputs {
            geometry,
            known: known_quantities(&self.known),
            config,
        })
    }
}

/// Pipe roughness from exactly one of a material name or an explicit value.
pub fn resolve_roughness(
    material: Option<&str>,
    roughness_m: Option<f64>,
) -> ProjectResult<Length> {
    match (material, roughness_m) {
        (Some(name), None) => Ok(lookup_roughness(name)?),
        (None, Some(roughness)) => Ok(m(roughness)),
        (Some(_), Some(_)) => Err(ValidationError::Conflict {
            fields: "pipe.material, pipe.roughness_m".to_string(),
            reason: "give a material or an explicit roughness, not both".to_string(),
        }
        .into()),
        (None, None) => Err(ValidationError::Missing {
            field: "pipe.material".to_string(),
            reason: "a material or an explicit roughness is required".to_string(),
        }
        .into()),
    }
}

/// Convert `case` and solve it. Does not re-run `validate_case`.
pub fn solve_case(case: &Case) -> ProjectResult<FlowState> {
    let inputs = case.to_solver_inputs()?;
    tracing::debug!(case = %case.name, "solving case");
    Ok(solve_with_config(
        &inputs.geometry,
        &inputs.known,
        &inputs.config,
    )?)
}

fn known_quantities(known: &KnownDef) -> KnownQuantities {
    KnownQuantities {
        velocity: known.velocity_mps.map(mps),
        flow_rate: known.flow_rate_m3ps.map(m3ps),
        head_loss: known.head_loss_m.map(m),
    }
}

fn apply_solver(config: &mut SolverConfig, solver: &SolverDef) {
    if let Some(cap) = solver.max_outer_iterations {
        config.max_outer_iterations = cap;
    }
    if let Some(tol) = solver.outer_tolerance {
        config.outer_tolerance = tol;
    }
    if let Some(cap) = solver.max_friction_iterations {
        config.friction.max_iterations = cap;
    }
    if let Some(tol) = solver.friction_tolerance {
        config.friction.tolerance = tol;
    }
    config.accept_unconverged = solver.accept_unconverged;
}
