//! Trend checks over the tabulated water model.

use hy_core::units::degc;
use hy_fluids::FluidProperties;
use proptest::prelude::*;

proptest! {
    #[test]
    fn warmer_water_is_lighter_and_thinner(t in 0.0_f64..99.0, dt in 0.5_f64..1.0) {
        let cold = FluidProperties::water(degc(t)).unwrap();
        let warm = FluidProperties::water(degc(t + dt)).unwrap();
        prop_assert!(warm.density.value < cold.density.value);
        prop_assert!(warm.viscosity.value < cold.viscosity.value);
        prop_assert!(warm.kinematic_viscosity() < cold.kinematic_viscosity());
    }
}

#[test]
fn typical_flow_temperature() {
    let water = FluidProperties::water(degc(70.0)).unwrap();
    assert!((water.density.value - 977.76).abs() < 1e-9);
    assert!((water.viscosity.value - 0.404e-3).abs() < 1e-12);
}
