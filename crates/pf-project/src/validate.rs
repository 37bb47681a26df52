//! Case validation logic.

use crate::schema::{Case, FluidDef, KnownDef, LATEST_VERSION, PipeDef, SolverDef};
use pf_hydraulics::Material;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Conflicting fields: {fields} ({reason})")]
    Conflict { fields: String, reason: String },

    #[error("Missing value: {field} ({reason})")]
    Missing { field: String, reason: String },

    #[error("Unknown material: {name}")]
    UnknownMaterial { name: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_case(case: &Case) -> Result<(), ValidationError> {
    if case.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: case.version,
        });
    }

    validate_pipe(&case.pipe)?;
    validate_known(&case.known)?;
    if let Some(solver) = &case.solver {
        validate_solver(solver)?;
    }
    if let Some(fluid) = &case.fluid {
        validate_fluid(fluid)?;
    }
    Ok(())
}

fn validate_pipe(pipe: &PipeDef) -> Result<(), ValidationError> {
    match (&pipe.material, pipe.roughness_m) {
        (Some(_), Some(_)) => {
            return Err(ValidationError::Conflict {
                fields: "pipe.material, pipe.roughness_m".to_string(),
                reason: "give a material or an explicit roughness, not both".to_string(),
            });
        }
        (None, None) => {
            return Err(ValidationError::Missing {
                field: "pipe.material".to_string(),
                reason: "a material or an explicit roughness is required".to_string(),
            });
        }
        (Some(name), None) => {
            if name.parse::<Material>().is_err() {
                return Err(ValidationError::UnknownMaterial { name: name.clone() });
            }
        }
        (None, Some(roughness)) => ensure_positive("pipe.roughness_m", roughness)?,
    }

    ensure_positive("pipe.length_m", pipe.length_m)?;
    ensure_positive("pipe.diameter_m", pipe.diameter_m)?;
    Ok(())
}

fn validate_known(known: &KnownDef) -> Result<(), ValidationError> {
    let fields = [
        ("known.velocity_mps", known.velocity_mps),
        ("known.flow_rate_m3ps", known.flow_rate_m3ps),
        ("known.head_loss_m", known.head_loss_m),
    ];
    for (field, value) in fields {
        match value {
            Some(value) if !(value.is_finite() && value >= 0.0) => {
                return Err(ValidationError::InvalidValue {
                    field: field.to_string(),
                    value: value.to_string(),
                    reason: "must be finite and non-negative".to_string(),
                });
            }
            _ => {}
        }
    }
    Ok(())
}

fn validate_solver(solver: &SolverDef) -> Result<(), ValidationError> {
    let caps = [
        ("solver.max_outer_iterations", solver.max_outer_iterations),
        ("solver.max_friction_iterations", solver.max_friction_iterations),
    ];
    for (field, cap) in caps {
        if cap == Some(0) {
            return Err(ValidationError::InvalidValue {
                field: field.to_string(),
                value: "0".to_string(),
                reason: "iteration cap must be at least 1".to_string(),
            });
        }
    }
    if let Some(tol) = solver.outer_tolerance {
        ensure_positive("solver.outer_tolerance", tol)?;
    }
    if let Some(tol) = solver.friction_tolerance {
        ensure_positive("solver.friction_tolerance", tol)?;
    }
    Ok(())
}

fn validate_fluid(fluid: &FluidDef) -> Result<(), ValidationError> {
    ensure_positive("fluid.density_kg_m3", fluid.density_kg_m3)?;
    ensure_positive("fluid.viscosity_pa_s", fluid.viscosity_pa_s)
}

fn ensure_positive(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "must be finite and > 0".to_string(),
        })
    }
}
