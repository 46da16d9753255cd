//! Pipe wall materials.

use crate::error::{FluidError, FluidResult};
use hy_core::numeric::ensure_finite;
use hy_core::units::{Length, mm};
use serde::{Deserialize, Serialize};

/// Common pipe materials in heating installations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Material {
    Copper,
    CarbonSteel,
    StainlessSteel,
    /// Cross-linked polyethylene
    Pex,
    /// Multilayer composite (PE-Al-PE)
    Mlcp,
}

impl Material {
    /// Typical absolute roughness of new pipe.
    pub fn roughness(self) -> Length {
        match self {
            Material::Copper => mm(0.0015),
            Material::CarbonSteel => mm(0.045),
            Material::StainlessSteel => mm(0.015),
            Material::Pex => mm(0.007),
            Material::Mlcp => mm(0.007),
        }
    }
}

/// Absolute wall roughness of a pipe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipeMaterial {
    pub roughness: Length,
}

impl PipeMaterial {
    /// Material with an explicit roughness.
    ///
    /// # Errors
    /// Returns `NonPhysical` for negative or non-finite roughness. Zero is a smooth pipe.
    pub fn new(roughness: Length) -> FluidResult<Self> {
        if ensure_finite(roughness.value, "roughness")? < 0.0 {
            return Err(FluidError::NonPhysical { what: "roughness" });
        }
        Ok(Self { roughness })
    }

    /// Catalog lookup.
    pub fn standard(material: Material) -> Self {
        Self {
            roughness: material.roughness(),
        }
    }

    /// Hydraulically smooth wall.
    pub fn smooth() -> Self {
        Self {
            roughness: mm(0.0),
        }
    }
}
