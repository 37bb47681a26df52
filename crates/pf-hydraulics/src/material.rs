//! Absolute wall roughness of common pipe materials.

use crate::error::{HydraulicsError, HydraulicsResult};
use pf_core::units::{Length, m};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Material {
    Steel,
    CastIron,
    Concrete,
    Pvc,
    CopperTubing,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialEntry {
    pub material: Material,
    pub name: &'static str,
    /// Absolute roughness [m]
    pub roughness_m: f64,
}

const MATERIAL_TABLE: [MaterialEntry; 5] = [
    MaterialEntry {
        material: Material::Steel,
        name: "steel",
        roughness_m: 0.000_15,
    },
    MaterialEntry {
        material: Material::CastIron,
        name: "cast iron",
        roughness_m: 0.000_26,
    },
    MaterialEntry {
        material: Material::Concrete,
        name: "concrete",
        roughness_m: 0.003,
    },
    MaterialEntry {
        material: Material::Pvc,
        name: "PVC",
        roughness_m: 0.000_001_5,
    },
    MaterialEntry {
        material: Material::CopperTubing,
        name: "copper tubing",
        roughness_m: 0.000_001_5,
    },
];

/// All known materials, in table order.
pub fn materials() -> &'static [MaterialEntry] {
    &MATERIAL_TABLE
}

/// Look up the absolute roughness for a material name.
///
/// Matching ignores ASCII case and surrounding whitespace. Unknown names are
/// an error; there is no fallback roughness.
pub fn lookup_roughness(name: &str) -> HydraulicsResult<Length> {
    Ok(name.parse::<Material>()?.roughness())
}

impl Material {
    fn entry(self) -> &'static MaterialEntry {
        // Table order matches declaration order.
        &MATERIAL_TABLE[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.entry().name
    }

    pub fn roughness(self) -> Length {
        m(self.entry().roughness_m)
    }
}

impl FromStr for Material {
    type Err = HydraulicsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let query = s.trim();
        MATERIAL_TABLE
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(query))
            .map(|entry| entry.material)
            .ok_or_else(|| HydraulicsError::UnknownMaterial {
                name: s.to_string(),
            })
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_order_matches_enum() {
        for entry in materials() {
            assert_eq!(entry.material.entry(), entry);
        }
    }

    #[test]
    fn lookup_known_materials() {
        assert_eq!(lookup_roughness("steel").unwrap().value, 0.000_15);
        assert_eq!(lookup_roughness("cast iron").unwrap().value, 0.000_26);
        assert_eq!(lookup_roughness("concrete").unwrap().value, 0.003);
        assert_eq!(lookup_roughness("PVC").unwrap().value, 0.000_001_5);
        assert_eq!(lookup_roughness("copper tubing").unwrap().value, 0.000_001_5);
    }

    #[test]
    fn lookup_ignores_case_and_whitespace() {
        assert_eq!("pvc".parse::<Material>().unwrap(), Material::Pvc);
        assert_eq!(
            "  Cast Iron ".parse::<Material>().unwrap(),
            Material::CastIron
        );
    }

    #[test]
    fn unknown_material_is_an_error() {
        let err = lookup_roughness("unobtainium").unwrap_err();
        assert_eq!(
            err,
            HydraulicsError::UnknownMaterial {
                name: "unobtainium".to_string()
            }
        );
    }

    #[test]
    fn every_roughness_is_positive() {
        assert!(materials().iter().all(|e| e.roughness_m > 0.0));
    }
}
