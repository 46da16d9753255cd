//! Fluid property records.

use crate::error::{FluidError, FluidResult};
use hy_core::numeric::{ensure_finite, interpolate};
use hy_core::units::{
    Density, DynVisc, Length, Pressure, Temperature, constants::G0_MPS2, degc, kgpm3, m, pa, pas,
    to_degc,
};
use serde::{Deserialize, Serialize};

/// Water density (kg/m³) against temperature (°C) at atmospheric pressure.
const WATER_DENSITY: [(f64, f64); 11] = [
    (0.0, 999.84),
    (10.0, 999.70),
    (20.0, 998.21),
    (30.0, 995.65),
    (40.0, 992.22),
    (50.0, 988.04),
    (60.0, 983.20),
    (70.0, 977.76),
    (80.0, 971.79),
    (90.0, 965.31),
    (100.0, 958.35),
];

/// Water dynamic viscosity (mPa·s) against temperature (°C).
const WATER_VISCOSITY_MPAS: [(f64, f64); 11] = [
    (0.0, 1.792),
    (10.0, 1.306),
    (20.0, 1.002),
    (30.0, 0.797),
    (40.0, 0.653),
    (50.0, 0.547),
    (60.0, 0.466),
    (70.0, 0.404),
    (80.0, 0.354),
    (90.0, 0.315),
    (100.0, 0.282),
];

/// Density and dynamic viscosity of the circulating fluid at a reference temperature.
///
/// Immutable once constructed. The friction engine reads it, never writes it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FluidProperties {
    pub density: Density,
    pub viscosity: DynVisc,
    pub reference_temperature: Temperature,
}

impl FluidProperties {
    /// Build a record from explicit values.
    ///
    /// # Errors
    /// Returns `NonPhysical` if density or viscosity is not strictly positive and finite.
    pub fn new(
        density: Density,
        viscosity: DynVisc,
        reference_temperature: Temperature,
    ) -> FluidResult<Self> {
        if ensure_finite(density.value, "density")? <= 0.0 {
            return Err(FluidError::NonPhysical { what: "density" });
        }
        if ensure_finite(viscosity.value, "viscosity")? <= 0.0 {
            return Err(FluidError::NonPhysical { what: "viscosity" });
        }
        ensure_finite(reference_temperature.value, "reference temperature")?;

        Ok(Self {
            density,
            viscosity,
            reference_temperature,
        })
    }

    /// Liquid water at the given temperature, interpolated from tabulated data.
    ///
    /// # Errors
    /// Returns `OutOfRange` outside 0-100 °C.
    pub fn water(temperature: Temperature) -> FluidResult<Self> {
        let t_c = to_degc(temperature);
        let rho = interpolate(&WATER_DENSITY, t_c).ok_or(FluidError::OutOfRange {
            what: "water temperature (°C)",
            value: t_c,
        })?;
        let mu_mpas = interpolate(&WATER_VISCOSITY_MPAS, t_c).ok_or(FluidError::OutOfRange {
            what: "water temperature (°C)",
            value: t_c,
        })?;

        Self::new(kgpm3(rho), pas(mu_mpas * 1e-3), temperature)
    }

    /// Water at 20 °C, the reference used by pressure-drop tables.
    pub fn water_20c() -> Self {
        Self {
            density: kgpm3(998.21),
            viscosity: pas(1.002e-3),
            reference_temperature: degc(20.0),
        }
    }

    /// Kinematic viscosity ν = μ/ρ in m²/s.
    pub fn kinematic_viscosity(&self) -> f64 {
        self.viscosity.value / self.density.value
    }

    /// Convert a pressure difference into metres of this fluid: H = Δp / (ρ g).
    pub fn head_from_pressure(&self, dp: Pressure) -> Length {
        m(dp.value / (self.density.value * G0_MPS2))
    }

    /// Convert metres of this fluid into a pressure difference: Δp = ρ g H.
    pub fn pressure_from_head(&self, head: Length) -> Pressure {
        pa(self.density.value * G0_MPS2 * head.value)
    }
}
