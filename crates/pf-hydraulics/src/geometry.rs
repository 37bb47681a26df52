//! Validated pipe geometry.

use crate::error::{HydraulicsError, HydraulicsResult};
use pf_core::numeric::ensure_positive;
use pf_core::units::{Area, Length, m2};

/// Straight pipe section: length, inner diameter and absolute wall roughness.
///
/// All three are checked to be finite and strictly positive on construction,
/// so downstream relations never divide by zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipeGeometry {
    length: Length,
    diameter: Length,
    roughness: Length,
}

impl PipeGeometry {
    pub fn new(length: Length, diameter: Length, roughness: Length) -> HydraulicsResult<Self> {
        check_dimension(length, "pipe length")?;
        check_dimension(diameter, "pipe diameter")?;
        check_dimension(roughness, "pipe roughness")?;
        Ok(Self {
            length,
            diameter,
            roughness,
        })
    }

    pub fn length(&self) -> Length {
        self.length
    }

    pub fn diameter(&self) -> Length {
        self.diameter
    }

    pub fn roughness(&self) -> Length {
        self.roughness
    }

    /// Flow area `pi * D^2 / 4`.
    pub fn area(&self) -> Area {
        m2(std::f64::consts::PI * self.diameter.value.powi(2) / 4.0)
    }

    /// Relative roughness `eps / D`.
    pub fn relative_roughness(&self) -> f64 {
        self.roughness.value / self.diameter.value
    }
}

fn check_dimension(value: Length, what: &'static str) -> HydraulicsResult<()> {
    ensure_positive(value.value, what).map_err(|_| HydraulicsError::InvalidDimension {
        what,
        value: value.value,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_core::units::m;

    #[test]
    fn area_of_100mm_pipe() {
        let pipe = PipeGeometry::new(m(10.0), m(0.1), m(0.000_15)).unwrap();
        assert!((pipe.area().value - 0.007_854).abs() < 1e-6);
        assert!((pipe.relative_roughness() - 0.0015).abs() < 1e-12);
    }

    #[test]
    fn zero_diameter_rejected() {
        let err = PipeGeometry::new(m(10.0), m(0.0), m(0.000_15)).unwrap_err();
        assert_eq!(
            err,
            HydraulicsError::InvalidDimension {
                what: "pipe diameter",
                value: 0.0
            }
        );
    }

    #[test]
    fn negative_and_nan_dimensions_rejected() {
        assert!(PipeGeometry::new(m(-1.0), m(0.1), m(0.000_15)).is_err());
        assert!(PipeGeometry::new(m(1.0), m(0.1), m(0.0)).is_err());
        assert!(PipeGeometry::new(m(f64::NAN), m(0.1), m(0.000_15)).is_err());
    }
}
