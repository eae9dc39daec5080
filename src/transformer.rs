//! Step-up/step-down transformer between the coil and the load.

pub mod magnetics;
pub mod parasitics;
pub mod response;

pub use self::magnetics::{
    AmorphousGrade, CoreLoss, CoreMaterial, CoreShape, FerriteGrade, NanocrystallineGrade,
    SiliconSteelGrade,
};
pub use self::parasitics::{Shielding, TransformerParasitics, TransformerWindingStyle};
pub use self::response::{
    compute_bandwidth, transformer_frequency_response, BandEdges, TransformerLoad,
    TransformerNetwork,
};

use self::magnetics::{
    compute_effective_permeability_with_gap, compute_peak_flux_density,
    compute_primary_inductance, compute_saturation_margin, core_loss_index,
};
use self::parasitics::compute_parasitics;
use crate::calibration::Calibration;
use crate::coil::WireMaterial;
use crate::complex::Complex;
use crate::network::{CoilLoad, LoadParams, Unloaded};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CoreParams {
    pub shape: CoreShape,
    pub material: CoreMaterial,
    /// mm²
    pub effective_area: f64,
    /// mm
    pub effective_length: f64,
    /// mm
    pub air_gap: f64,
}

impl Default for CoreParams {
    fn default() -> Self {
        CoreParams {
            shape: CoreShape::Ei,
            material: CoreMaterial::default(),
            effective_area: 100.0,
            effective_length: 80.0,
            air_gap: 0.0,
        }
    }
}

/// Conductor of one winding
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConductorSpec {
    /// mm
    pub diameter: f64,
    pub material: WireMaterial,
}

impl Default for ConductorSpec {
    fn default() -> Self {
        ConductorSpec {
            diameter: 0.1,
            material: WireMaterial::Copper,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransformerWinding {
    pub primary_turns: u32,
    pub secondary_turns: u32,
    pub primary: ConductorSpec,
    pub secondary: ConductorSpec,
    pub style: TransformerWindingStyle,
    pub shielding: Shielding,
}

impl Default for TransformerWinding {
    fn default() -> Self {
        TransformerWinding {
            primary_turns: 0,
            secondary_turns: 0,
            primary: ConductorSpec::default(),
            secondary: ConductorSpec {
                diameter: 0.05,
                ..ConductorSpec::default()
            },
            style: TransformerWindingStyle::Simple,
            shielding: Shielding::None,
        }
    }
}

/// Transformer description; an all-default value is disabled and unwound
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransformerParams {
    pub enabled: bool,
    pub core: CoreParams,
    pub winding: TransformerWinding,
}

impl TransformerParams {
    pub fn turns_ratio(&self) -> f64 {
        compute_turns_ratio(self.winding.primary_turns, self.winding.secondary_turns)
    }

    /// Core permeability after the air gap
    pub fn effective_permeability(&self) -> f64 {
        compute_effective_permeability_with_gap(
            self.core.material.properties().permeability,
            self.core.air_gap,
            self.core.effective_length,
        )
    }

    /// Magnetizing inductance of the primary, H
    pub fn primary_inductance(&self) -> f64 {
        compute_primary_inductance(
            self.effective_permeability(),
            self.winding.primary_turns,
            self.core.effective_area,
            self.core.effective_length,
        )
    }

    /// Lumped network for this transformer with parasitics computed once
    pub fn network(&self, cal: &Calibration) -> TransformerNetwork {
        let lp = self.primary_inductance();
        let parasitics = compute_parasitics(self, lp, &cal.transformer);
        TransformerNetwork::new(self.turns_ratio(), lp, parasitics)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformerComputedResults {
    pub turns_ratio: f64,
    pub voltage_ratio: f64,
    /// |Z| (Ω) of the load seen from the primary at the reference frequency
    pub reflected_load: f64,
    /// H
    pub primary_inductance: f64,
    /// Upper −3 dB point, Hz
    pub bandwidth: f64,
    /// Lower −3 dB point, Hz
    pub lower_bandwidth: f64,
    pub saturation_margin: f64,
    /// T at the drive level and lowest frequency
    pub peak_flux_density: f64,
    pub core_loss_estimate: CoreLoss,
    pub core_loss_index: f64,
    pub parasitics: TransformerParasitics,
}

/// `n = Ns/Np`, 0 without primary turns
pub fn compute_turns_ratio(primary_turns: u32, secondary_turns: u32) -> f64 {
    if primary_turns == 0 {
        return 0.0;
    }
    secondary_turns as f64 / primary_turns as f64
}

/// `Z/n²` component-wise, open circuit for `n = 0`
pub fn compute_reflected_load(load: Complex, turns_ratio: f64) -> Complex {
    if turns_ratio == 0.0 {
        return Complex::OPEN_CIRCUIT;
    }
    load.scale(1.0 / (turns_ratio * turns_ratio))
}

/// Headroom of the core at the calibrated drive level and lowest frequency,
/// 0 when frequency, turns or area is not positive
pub fn transformer_saturation_margin(params: &TransformerParams, cal: &Calibration) -> f64 {
    let tc = &cal.transformer;
    if tc.lowest_frequency <= 0.0
        || params.winding.primary_turns == 0
        || params.core.effective_area <= 0.0
    {
        return 0.0;
    }
    let b = compute_peak_flux_density(
        tc.drive_level_vrms,
        tc.lowest_frequency,
        params.winding.primary_turns,
        params.core.effective_area,
    );
    compute_saturation_margin(b, params.core.material.properties().saturation_flux_density)
}

/// Everything the transformer contributes, with `load` on the secondary or
/// the secondary open when `load` is `None`.
pub fn compute_transformer_results(
    params: &TransformerParams,
    load: Option<&LoadParams>,
    cal: &Calibration,
) -> TransformerComputedResults {
    let network = params.network(cal);
    let turns_ratio = network.turns_ratio();
    let tc = &cal.transformer;

    let (edges, reflected_load) = match load {
        Some(load) => (
            compute_bandwidth(&network, load, cal),
            compute_reflected_load(load.impedance(cal.reference_frequency), turns_ratio)
                .magnitude(),
        ),
        None => (compute_bandwidth(&network, &Unloaded, cal), f64::INFINITY),
    };

    let peak_flux_density = compute_peak_flux_density(
        tc.drive_level_vrms,
        tc.lowest_frequency,
        params.winding.primary_turns,
        params.core.effective_area,
    );
    let loss_index = core_loss_index(
        params.core.material.properties().loss_coefficient,
        tc.core_loss_frequency,
        tc.core_loss_reference_frequency,
    );

    let out = TransformerComputedResults {
        turns_ratio,
        voltage_ratio: turns_ratio,
        reflected_load,
        primary_inductance: params.primary_inductance(),
        bandwidth: edges.upper,
        lower_bandwidth: edges.lower,
        saturation_margin: transformer_saturation_margin(params, cal),
        peak_flux_density,
        core_loss_estimate: CoreLoss::classify(loss_index, tc.core_loss_low, tc.core_loss_high),
        core_loss_index: loss_index,
        parasitics: *network.parasitics(),
    };
    debug!(
        turns_ratio,
        bandwidth = out.bandwidth,
        margin = out.saturation_margin,
        "transformer results"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn step_up() -> TransformerParams {
        let mut p = TransformerParams::default();
        p.enabled = true;
        p.winding.primary_turns = 200;
        p.winding.secondary_turns = 2000;
        p
    }

    #[test]
    fn transformer_turns_ratio() {
        assert_eq!(compute_turns_ratio(200, 2000), 10.0);
        assert_eq!(compute_turns_ratio(0, 2000), 0.0);
        assert_eq!(TransformerParams::default().turns_ratio(), 0.0);
    }

    #[test]
    fn transformer_reflected_load() {
        let z = Complex::new(250e3, -40e3);
        let r = compute_reflected_load(z, 10.0);
        assert_relative_eq!(r.re(), 2500.0, max_relative = 1e-12);
        assert_relative_eq!(r.im(), -400.0, max_relative = 1e-12);
        assert_eq!(compute_reflected_load(z, 0.0), Complex::OPEN_CIRCUIT);
    }

    #[test]
    fn transformer_results_step_up() {
        let cal = Calibration::default();
        let res = compute_transformer_results(&step_up(), Some(&LoadParams::default()), &cal);
        assert_eq!(res.turns_ratio, 10.0);
        assert_eq!(res.voltage_ratio, 10.0);
        assert_relative_eq!(res.primary_inductance, 0.144_513, max_relative = 1e-4);
        assert_eq!(res.core_loss_estimate, CoreLoss::Low);
        assert!(res.bandwidth > 15e3 && res.bandwidth <= 100e3);
        assert!(res.lower_bandwidth < res.bandwidth);
        assert!(res.saturation_margin > 0.0 && res.saturation_margin < 1.0);
        // 250 kΩ ‖ tone ‖ 1 MΩ ‖ cable at 1 kHz, divided by 100
        assert!(res.reflected_load > 1000.0 && res.reflected_load < 2500.0);
    }

    #[test]
    fn transformer_gap_lowers_inductance() {
        let mut gapped = step_up();
        gapped.core.air_gap = 0.1;
        assert!(gapped.primary_inductance() < step_up().primary_inductance());
        let cal = Calibration::default();
        // flux depends on drive, turns and area only
        assert_eq!(
            transformer_saturation_margin(&gapped, &cal),
            transformer_saturation_margin(&step_up(), &cal)
        );
    }

    #[test]
    fn transformer_unconfigured_is_degenerate() {
        let cal = Calibration::default();
        let res = compute_transformer_results(&TransformerParams::default(), None, &cal);
        assert_eq!(res.turns_ratio, 0.0);
        assert_eq!(res.saturation_margin, 0.0);
        assert_eq!(res.primary_inductance, 0.0);
        assert_eq!(res.peak_flux_density, 0.0);
        assert_eq!(res.bandwidth, 0.0);
        assert_eq!(res.lower_bandwidth, 0.0);

        let unwound = TransformerParams {
            enabled: true,
            ..TransformerParams::default()
        };
        let res = compute_transformer_results(&unwound, Some(&LoadParams::default()), &cal);
        assert_eq!(res.bandwidth, 0.0);
        assert_eq!(res.lower_bandwidth, 0.0);
    }

    #[test]
    fn transformer_params_from_json() {
        let json = r#"{
            "enabled": true,
            "core": {"shape": "toroid", "material": {"family": "nanocrystalline", "grade": "finemet"}},
            "winding": {"primaryTurns": 100, "secondaryTurns": 300, "style": "bifilar"}
        }"#;
        let p: TransformerParams = serde_json::from_str(json).unwrap();
        assert!(p.enabled);
        assert_eq!(p.core.shape, CoreShape::Toroid);
        assert_eq!(p.core.effective_area, 100.0);
        assert_eq!(p.winding.style, TransformerWindingStyle::Bifilar);
        assert_eq!(p.turns_ratio(), 3.0);
    }
}
