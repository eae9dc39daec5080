use crate::calibration::TransformerCalibration;
use crate::consts::{MM2_TO_M2, MM_TO_M, REFERENCE_TEMPERATURE_C};
use serde::{Deserialize, Serialize};
use simple_error::{bail, SimpleError};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use super::{ConductorSpec, TransformerParams};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindingStyleCoefficients {
    pub leakage: f64,
    pub interwinding: f64,
    pub self_capacitance: f64,
}

const SIMPLE: WindingStyleCoefficients = WindingStyleCoefficients {
    leakage: 1.0,
    interwinding: 1.0,
    self_capacitance: 1.0,
};
const SECTIONED: WindingStyleCoefficients = WindingStyleCoefficients {
    leakage: 0.5,
    interwinding: 1.6,
    self_capacitance: 0.8,
};
const INTERLEAVED: WindingStyleCoefficients = WindingStyleCoefficients {
    leakage: 0.25,
    interwinding: 2.5,
    self_capacitance: 1.2,
};
const BIFILAR: WindingStyleCoefficients = WindingStyleCoefficients {
    leakage: 0.05,
    interwinding: 6.0,
    self_capacitance: 1.5,
};

/// How primary and secondary are arranged on the bobbin
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformerWindingStyle {
    #[default]
    Simple,
    Sectioned,
    Interleaved,
    Bifilar,
}

impl TransformerWindingStyle {
    pub fn coefficients(&self) -> &'static WindingStyleCoefficients {
        match self {
            TransformerWindingStyle::Simple => &SIMPLE,
            TransformerWindingStyle::Sectioned => &SECTIONED,
            TransformerWindingStyle::Interleaved => &INTERLEAVED,
            TransformerWindingStyle::Bifilar => &BIFILAR,
        }
    }

    pub fn to_str(&self) -> &str {
        match self {
            TransformerWindingStyle::Simple => "simple",
            TransformerWindingStyle::Sectioned => "sectioned",
            TransformerWindingStyle::Interleaved => "interleaved",
            TransformerWindingStyle::Bifilar => "bifilar",
        }
    }
}

impl FromStr for TransformerWindingStyle {
    type Err = SimpleError;

    fn from_str(val: &str) -> Result<Self, Self::Err> {
        match val.to_lowercase().as_str() {
            "simple" => Ok(TransformerWindingStyle::Simple),
            "sectioned" => Ok(TransformerWindingStyle::Sectioned),
            "interleaved" => Ok(TransformerWindingStyle::Interleaved),
            "bifilar" => Ok(TransformerWindingStyle::Bifilar),
            _ => bail!("Transformer winding style not recognized"),
        }
    }
}

impl fmt::Display for TransformerWindingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShieldingCoefficients {
    pub interwinding: f64,
}

const NO_SHIELD: ShieldingCoefficients = ShieldingCoefficients { interwinding: 1.0 };
const FOIL_SHIELD: ShieldingCoefficients = ShieldingCoefficients { interwinding: 0.15 };
const FARADAY_SHIELD: ShieldingCoefficients = ShieldingCoefficients { interwinding: 0.05 };

/// Electrostatic screen between the windings
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shielding {
    #[default]
    None,
    Foil,
    FaradayScreen,
}

impl Shielding {
    pub fn coefficients(&self) -> &'static ShieldingCoefficients {
        match self {
            Shielding::None => &NO_SHIELD,
            Shielding::Foil => &FOIL_SHIELD,
            Shielding::FaradayScreen => &FARADAY_SHIELD,
        }
    }
}

/// Parasitic elements of one transformer, computed once per result request
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformerParasitics {
    /// H
    pub leakage_inductance: f64,
    /// F
    pub interwinding_capacitance: f64,
    /// F
    pub primary_capacitance: f64,
    /// F
    pub secondary_capacitance: f64,
    /// Ω
    pub primary_resistance: f64,
    /// Ω
    pub secondary_resistance: f64,
}

/// Mean turn length (m) of a winding on a core of `effective_area` mm²
pub fn winding_mean_turn_length(effective_area: f64, build_factor: f64) -> f64 {
    if effective_area <= 0.0 {
        return 0.0;
    }
    4.0 * effective_area.sqrt() * build_factor * MM_TO_M
}

/// `ρ·N·MLT/A` in Ω at 20 °C, 0 for a conductor without a diameter
pub fn compute_winding_resistance(turns: u32, conductor: &ConductorSpec, mlt: f64) -> f64 {
    if conductor.diameter <= 0.0 {
        return 0.0;
    }
    let area = PI / 4.0 * conductor.diameter * conductor.diameter * MM2_TO_M2;
    conductor.material.resistivity_at(REFERENCE_TEMPERATURE_C) * turns as f64 * mlt / area
}

/// Self-capacitance (F) of a winding: `C_base·N^exp·k_style`
pub fn compute_winding_capacitance(
    turns: u32,
    style: TransformerWindingStyle,
    cal: &TransformerCalibration,
) -> f64 {
    if turns == 0 {
        return 0.0;
    }
    cal.winding_capacitance_base
        * (turns as f64).powf(cal.winding_capacitance_exponent)
        * style.coefficients().self_capacitance
}

/// Leakage, interwinding capacitance, winding capacitances and winding
/// resistances for `params` with primary inductance `primary_inductance`.
pub fn compute_parasitics(
    params: &TransformerParams,
    primary_inductance: f64,
    cal: &TransformerCalibration,
) -> TransformerParasitics {
    let winding = &params.winding;
    let style = winding.style.coefficients();
    let area = params.core.effective_area.max(0.0);
    let mlt = winding_mean_turn_length(area, cal.winding_build_factor);

    TransformerParasitics {
        leakage_inductance: primary_inductance
            * cal.leakage_base
            * style.leakage
            * params.core.shape.coefficients().leakage,
        interwinding_capacitance: cal.interwinding_capacitance_base
            * style.interwinding
            * winding.shielding.coefficients().interwinding
            * (area / 100.0).sqrt(),
        primary_capacitance: compute_winding_capacitance(
            winding.primary_turns,
            winding.style,
            cal,
        ),
        secondary_capacitance: compute_winding_capacitance(
            winding.secondary_turns,
            winding.style,
            cal,
        ),
        primary_resistance: compute_winding_resistance(winding.primary_turns, &winding.primary, mlt),
        secondary_resistance: compute_winding_resistance(
            winding.secondary_turns,
            &winding.secondary,
            mlt,
        ),
    }
}
