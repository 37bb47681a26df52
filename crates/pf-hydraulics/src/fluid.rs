//! Fluid properties used by the Reynolds number.

use crate::error::{HydraulicsError, HydraulicsResult};
use pf_core::units::constants::{WATER_DENSITY_KG_M3, WATER_VISCOSITY_PA_S};
use pf_core::units::{Density, DynVisc, kg_m3, pa_s};

/// Incompressible fluid with constant density and dynamic viscosity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluidProperties {
    pub density: Density,
    pub viscosity: DynVisc,
}

impl FluidProperties {
    pub fn new(density: Density, viscosity: DynVisc) -> Self {
        Self { density, viscosity }
    }

    /// Water at reference conditions (1000 kg/m3, 1e-3 Pa·s).
    pub fn water() -> Self {
        Self::new(kg_m3(WATER_DENSITY_KG_M3), pa_s(WATER_VISCOSITY_PA_S))
    }

    /// Reynolds number `rho * V * D / mu` from SI base values.
    pub fn reynolds(&self, velocity_mps: f64, diameter_m: f64) -> f64 {
        self.density.value * velocity_mps * diameter_m / self.viscosity.value
    }

    pub fn validate(&self) -> HydraulicsResult<()> {
        if !(self.density.value.is_finite() && self.density.value > 0.0) {
            return Err(HydraulicsError::InvalidConfig {
                what: "fluid density must be finite and > 0",
            });
        }
        if !(self.viscosity.value.is_finite() && self.viscosity.value > 0.0) {
            return Err(HydraulicsError::InvalidConfig {
                what: "fluid viscosity must be finite and > 0",
            });
        }
        Ok(())
    }
}

impl Default for FluidProperties {
    fn default() -> Self {
        Self::water()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn water_reynolds() {
        let water = FluidProperties::water();
        let re = water.reynolds(1.5, 0.1);
        assert!((re - 150_000.0).abs() < 1e-6);
    }

    #[test]
    fn rejects_non_positive_viscosity() {
        let fluid = FluidProperties::new(kg_m3(1000.0), pa_s(0.0));
        assert!(matches!(
            fluid.validate(),
            Err(HydraulicsError::InvalidConfig { .. })
        ));
    }
}
