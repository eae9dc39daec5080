//! Coil electrical model: geometry and wire to R, L, C, resonance and Q.

pub mod geometry;
pub mod wire;

pub use self::geometry::CoilGeometry;
pub use self::wire::{
    InsulationBuild, InsulationType, StrandType, WindingStyle, WireMaterial, WireParams,
};

use crate::calibration::Calibration;
use crate::consts::{angular_frequency, MM_TO_M, WHEELER_COEFFICIENT};
use crate::error::{PickupError, Result};
use serde::Serialize;
use std::f64::consts::PI;
use tracing::debug;

/// Snapshot of the unloaded coil, recomputed from inputs on every query
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoilComputedResults {
    /// Ω
    pub dc_resistance: f64,
    /// H
    pub inductance: f64,
    /// F
    pub capacitance: f64,
    /// Hz
    pub resonant_frequency: f64,
    pub quality_factor: f64,
    /// m
    pub total_wire_length: f64,
    /// m
    pub mean_turn_length: f64,
    /// Radial build of the winding, m
    pub winding_depth: f64,
    /// m³
    pub coil_volume: f64,
    /// Turns the bobbin window holds at the given packing factor
    pub max_turns: u32,
    /// `turns / max_turns`, 0 without capacity
    pub fill_ratio: f64,
}

impl CoilComputedResults {
    /// Build a snapshot from R, L and C; resonance and Q are derived here
    /// and nowhere else.
    pub fn from_rlc(dc_resistance: f64, inductance: f64, capacitance: f64) -> Self {
        let f0 = compute_resonance(inductance, capacitance);
        CoilComputedResults {
            dc_resistance,
            inductance,
            capacitance,
            resonant_frequency: f0,
            quality_factor: compute_q(f0, inductance, dc_resistance),
            total_wire_length: 0.0,
            mean_turn_length: 0.0,
            winding_depth: 0.0,
            coil_volume: 0.0,
            max_turns: 0,
            fill_ratio: 0.0,
        }
    }
}

/// Mean turn length in m, 0 for degenerate geometry
pub fn compute_mean_turn_length(geometry: &CoilGeometry) -> f64 {
    geometry.mean_turn_length() * MM_TO_M
}

/// `turns × mean_turn_length × slack`, in m
pub fn compute_total_wire_length(turns: u32, mean_turn_length: f64, cal: &Calibration) -> f64 {
    turns as f64 * mean_turn_length * cal.wire_slack
}

/// DC resistance (Ω) of `length` m of the given wire at its temperature.
///
/// # Errors
/// * `InvalidGeometry` if the wire diameter is not positive
pub fn compute_dc_resistance(wire: &WireParams, length: f64) -> Result<f64> {
    if wire.diameter <= 0.0 {
        return Err(PickupError::InvalidGeometry(format!(
            "wire diameter must be positive, got {} mm",
            wire.diameter
        )));
    }
    let area = wire.strand.conductor_area(wire.diameter);
    Ok(wire.material.resistivity_at(wire.temperature) * length / area)
}

/// Wheeler's multi-layer air-core approximation, in H.
///
/// `L[µH] = 31.6·N²·r² / (6r + 9h + 10t)` with the equivalent mean radius
/// `r`, winding height `h` and build `t` in meters.
pub fn compute_inductance(geometry: &CoilGeometry, turns: u32) -> f64 {
    let r = geometry.equivalent_radius() * MM_TO_M;
    let h = geometry.height() * MM_TO_M;
    let t = geometry.winding_depth() * MM_TO_M;
    let denom = 6.0 * r + 9.0 * h + 10.0 * t;
    if turns == 0 || denom <= 0.0 {
        return 0.0;
    }
    let n = turns as f64;
    WHEELER_COEFFICIENT * n * n * r * r / denom * 1e-6
}

/// `k_pack = offset + slope·(packing − 0.5)`, never negative
pub fn packing_capacitance_factor(packing_factor: f64, cal: &Calibration) -> f64 {
    (cal.packing_offset + cal.packing_slope * (packing_factor - 0.5)).max(0.0)
}

/// Self-capacitance (F): `C_BASE · N^0.35 · k_wind · k_pack · k_ins`.
///
/// The turns exponent is sub-linear: only neighbouring turns contribute
/// materially to the inter-turn capacitance.
pub fn compute_capacitance(wire: &WireParams, cal: &Calibration) -> f64 {
    if wire.turns == 0 {
        return 0.0;
    }
    cal.capacitance_base
        * (wire.turns as f64).powf(cal.capacitance_exponent)
        * wire.winding_style.coefficients().capacitance
        * packing_capacitance_factor(wire.packing_factor, cal)
        * wire.insulation_factor()
}

/// `f0 = 1/(2π√(L·C))`, 0 unless both are positive
pub fn compute_resonance(inductance: f64, capacitance: f64) -> f64 {
    if inductance <= 0.0 || capacitance <= 0.0 {
        return 0.0;
    }
    1.0 / (2.0 * PI * (inductance * capacitance).sqrt())
}

/// `Q = ω0·L/R`, 0 for a non-positive resistance
pub fn compute_q(resonant_frequency: f64, inductance: f64, resistance: f64) -> f64 {
    if resistance <= 0.0 {
        return 0.0;
    }
    angular_frequency(resonant_frequency) * inductance / resistance
}

/// Turns the bobbin window can hold at the wire's packing factor
pub fn compute_max_turns(geometry: &CoilGeometry, wire: &WireParams) -> u32 {
    let d = wire.insulated_diameter();
    if d <= 0.0 || wire.packing_factor <= 0.0 {
        return 0;
    }
    let per_turn = PI / 4.0 * d * d;
    (geometry.window_area() * wire.packing_factor / per_turn).floor() as u32
}

pub fn compute_coil_results(
    geometry: &CoilGeometry,
    wire: &WireParams,
    cal: &Calibration,
) -> Result<CoilComputedResults> {
    let mean_turn_length = compute_mean_turn_length(geometry);
    let total_wire_length = compute_total_wire_length(wire.turns, mean_turn_length, cal);
    let dc_resistance = compute_dc_resistance(wire, total_wire_length)?;
    let inductance = compute_inductance(geometry, wire.turns);
    let capacitance = compute_capacitance(wire, cal);
    let max_turns = compute_max_turns(geometry, wire);
    let fill_ratio = if max_turns > 0 {
        wire.turns as f64 / max_turns as f64
    } else {
        0.0
    };

    let out = CoilComputedResults {
        total_wire_length,
        mean_turn_length,
        winding_depth: geometry.winding_depth() * MM_TO_M,
        coil_volume: geometry.volume() * 1e-9,
        max_turns,
        fill_ratio,
        ..CoilComputedResults::from_rlc(dc_resistance, inductance, capacitance)
    };
    debug!(
        dcr = out.dc_resistance,
        inductance = out.inductance,
        capacitance = out.capacitance,
        f0 = out.resonant_frequency,
        "coil results"
    );
    Ok(out)
}
