//! Physical constants and reference conditions shared by the models.

use std::f64::consts::PI;

/// Vacuum permeability μ₀ in henries per meter (H/m).
pub const MU_0: f64 = 4.0e-7 * PI;

/// Reference temperature for resistivity tables in °C.
pub const REFERENCE_TEMPERATURE_C: f64 = 20.0;

/// Wheeler multi-layer coefficient for lengths in meters, result in µH.
pub const WHEELER_COEFFICIENT: f64 = 31.6;

/// Form factor of a sinusoidal transformer EMF, `V = 4.44·f·N·A·B`.
pub const SINE_FORM_FACTOR: f64 = 4.44;

pub const MM_TO_M: f64 = 1e-3;
pub const MM2_TO_M2: f64 = 1e-6;

/// Angular frequency in rad/s for a linear frequency in Hz
#[inline]
pub fn angular_frequency(hz: f64) -> f64 {
    2.0 * PI * hz
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn mu_0_matches_codata() {
        assert_relative_eq!(MU_0, 1.256_637_062_12e-6, max_relative = 1.0e-9);
    }

    #[test]
    fn angular_frequency_of_one_hertz() {
        assert_relative_eq!(angular_frequency(1.0), 2.0 * PI);
        assert_relative_eq!(angular_frequency(1000.0), 6283.185_307_179_586, epsilon = 1.0e-9);
    }
}
