//! hy-fluids: fluid and pipe material properties for the hydronics engine.
//!
//! Provides:
//! - `FluidProperties`: density and dynamic viscosity at a reference temperature
//! - A tabulated water model (0-100 °C) for heating circuits
//! - `PipeMaterial`: absolute roughness, with a catalog of common pipe materials
//!
//! Everything here is a pure value lookup. Nothing is iterated or solved.
//!
//! # Example
//!
//! ```
//! use hy_core::units::degc;
//! use hy_fluids::{FluidProperties, Material, PipeMaterial};
//!
//! let water = FluidProperties::water(degc(70.0)).unwrap();
//! assert!(water.density.value > 970.0 && water.density.value < 980.0);
//!
//! let copper = PipeMaterial::standard(Material::Copper);
//! assert!(copper.roughness.value < 1e-5);
//! ```

pub mod error;
pub mod material;
pub mod properties;

pub use error::{FluidError, FluidResult};
pub use material::{Material, PipeMaterial};
pub use properties::FluidProperties;
