//! Process-wide calibration constants.
//!
//! The closed-form models are tuned against measured pickups through the
//! numbers collected here. A `Calibration` is read-only once built; engine
//! functions take it by reference so tests can inject their own values.

use crate::error::{PickupError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Fewest points the transformer bandwidth sweep may use
pub const MIN_BANDWIDTH_POINTS: usize = 500;

/// Bounds and density of a logarithmic frequency sweep
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepSpec {
    pub start: f64,
    pub stop: f64,
    pub points: usize,
}

impl SweepSpec {
    pub const fn new(start: f64, stop: f64, points: usize) -> Self {
        SweepSpec {
            start,
            stop,
            points,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransformerCalibration {
    /// Leakage inductance as a fraction of primary inductance before
    /// winding-style and core-shape factors
    pub leakage_base: f64,
    /// Interwinding capacitance (F) of a simple winding on a 100 mm² core
    pub interwinding_capacitance_base: f64,
    /// Self-capacitance base (F) of a transformer winding
    pub winding_capacitance_base: f64,
    /// Sub-linear turns exponent of the winding capacitance law
    pub winding_capacitance_exponent: f64,
    /// Mean turn length over the core perimeter
    pub winding_build_factor: f64,
    /// Signal level (V rms) used for the saturation check
    pub drive_level_vrms: f64,
    /// Lowest frequency (Hz) the core has to carry, worst case for flux
    pub lowest_frequency: f64,
    pub core_loss_reference_frequency: f64,
    pub core_loss_frequency: f64,
    pub core_loss_low: f64,
    pub core_loss_high: f64,
}

impl Default for TransformerCalibration {
    fn default() -> Self {
        TransformerCalibration {
            leakage_base: 0.01,
            interwinding_capacitance_base: 50e-12,
            winding_capacitance_base: 2e-12,
            winding_capacitance_exponent: 0.35,
            winding_build_factor: 1.2,
            drive_level_vrms: 1.0,
            lowest_frequency: 40.0,
            core_loss_reference_frequency: 100.0,
            core_loss_frequency: 1000.0,
            core_loss_low: 0.4,
            core_loss_high: 0.8,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Calibration {
    /// `C_BASE` of the inter-turn capacitance law (F)
    pub capacitance_base: f64,
    /// Sub-linear turns exponent of the capacitance law
    pub capacitance_exponent: f64,
    /// `k_pack` at a packing factor of 0.5
    pub packing_offset: f64,
    pub packing_slope: f64,
    /// Extra wire for winding irregularity
    pub wire_slack: f64,
    /// Smallest magnitude converted to dB
    pub db_floor: f64,
    pub half_power_ratio: f64,
    /// Mid-band frequency for normalisation and reference impedances (Hz)
    pub reference_frequency: f64,
    pub resonance_sweep: SweepSpec,
    pub bandwidth_sweep: SweepSpec,
    /// Golden-section tolerance on log10(frequency)
    pub peak_tolerance: f64,
    pub transformer: TransformerCalibration,
}

impl Default for Calibration {
    fn default() -> Self {
        Calibration {
            capacitance_base: 4.5e-12,
            capacitance_exponent: 0.35,
            packing_offset: 0.7,
            packing_slope: 1.0,
            wire_slack: 1.03,
            db_floor: 1e-12,
            half_power_ratio: 0.707,
            reference_frequency: 1000.0,
            resonance_sweep: SweepSpec::new(20.0, 100e3, 1000),
            bandwidth_sweep: SweepSpec::new(20.0, 100e3, 600),
            peak_tolerance: 1e-6,
            transformer: TransformerCalibration::default(),
        }
    }
}

impl Calibration {
    /// Defaults, built once for the lifetime of the process
    pub fn shared() -> &'static Calibration {
        static SHARED: OnceLock<Calibration> = OnceLock::new();
        SHARED.get_or_init(Calibration::default)
    }

    /// Parse a (possibly partial) JSON calibration; missing keys keep defaults
    pub fn from_json_str(json: &str) -> Result<Calibration> {
        let cal: Calibration = serde_json::from_str(json)
            .map_err(|e| PickupError::Calibration(format!("invalid calibration json: {}", e)))?;
        cal.validate()?;
        Ok(cal)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Calibration> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            PickupError::Calibration(format!("cannot read {}: {}", path.display(), e))
        })?;
        Calibration::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, sweep, min_points) in [
            ("resonanceSweep", &self.resonance_sweep, 3),
            ("bandwidthSweep", &self.bandwidth_sweep, MIN_BANDWIDTH_POINTS),
        ] {
            if !(sweep.start > 0.0 && sweep.stop > sweep.start) {
                return Err(PickupError::Calibration(format!(
                    "{} needs 0 < start < stop",
                    name
                )));
            }
            if sweep.points < min_points {
                return Err(PickupError::Calibration(format!(
                    "{} needs at least {} points",
                    name, min_points
                )));
            }
        }
        if self.capacitance_base <= 0.0 || self.wire_slack <= 0.0 {
            return Err(PickupError::Calibration(
                "capacitanceBase and wireSlack must be positive".to_string(),
            ));
        }
        if !(self.half_power_ratio > 0.0 && self.half_power_ratio < 1.0) {
            return Err(PickupError::Calibration(
                "halfPowerRatio must lie in (0, 1)".to_string(),
            ));
        }
        if self.reference_frequency <= 0.0 || self.peak_tolerance <= 0.0 {
            return Err(PickupError::Calibration(
                "referenceFrequency and peakTolerance must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calibration_defaults_are_valid() {
        assert!(Calibration::default().validate().is_ok());
        assert_eq!(Calibration::shared(), &Calibration::default());
        assert!(std::ptr::eq(Calibration::shared(), Calibration::shared()));
    }

    #[test]
    fn calibration_partial_json_keeps_defaults() {
        let cal = Calibration::from_json_str(
            r#"{ "capacitanceBase": 5e-12, "transformer": { "driveLevelVrms": 0.5 } }"#,
        )
        .unwrap();
        assert_eq!(cal.capacitance_base, 5e-12);
        assert_eq!(cal.capacitance_exponent, 0.35);
        assert_eq!(cal.transformer.drive_level_vrms, 0.5);
        assert_eq!(cal.transformer.leakage_base, 0.01);
        assert_eq!(cal.bandwidth_sweep, SweepSpec::new(20.0, 100e3, 600));
    }

    #[test]
    fn calibration_rejects_bad_input() {
        assert!(matches!(
            Calibration::from_json_str("{ not json"),
            Err(PickupError::Calibration(_))
        ));
        assert!(matches!(
            Calibration::from_json_str(
                r#"{ "bandwidthSweep": { "start": 100.0, "stop": 10.0, "points": 50 } }"#
            ),
            Err(PickupError::Calibration(_))
        ));
        assert!(Calibration::from_file("/nonexistent/calibration.json").is_err());
    }

    #[test]
    fn calibration_bandwidth_sweep_needs_500_points() {
        let sparse = r#"{ "bandwidthSweep": { "start": 20.0, "stop": 100000.0, "points": 499 } }"#;
        assert!(matches!(
            Calibration::from_json_str(sparse),
            Err(PickupError::Calibration(_))
        ));
        let dense = r#"{ "bandwidthSweep": { "start": 20.0, "stop": 100000.0, "points": 500 } }"#;
        assert_eq!(Calibration::from_json_str(dense).unwrap().bandwidth_sweep.points, 500);
        // the resonance sweep has no such floor
        let coarse = r#"{ "resonanceSweep": { "start": 20.0, "stop": 100000.0, "points": 50 } }"#;
        assert!(Calibration::from_json_str(coarse).is_ok());
    }
}
