use crate::consts::{MM2_TO_M2, MM_TO_M, MU_0, SINE_FORM_FACTOR};
use serde::{Deserialize, Serialize};
use simple_error::{bail, SimpleError};
use std::fmt;
use std::str::FromStr;

/// Relative permeability, saturation flux density (T) and loss coefficient
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoreMaterialProperties {
    pub permeability: f64,
    pub saturation_flux_density: f64,
    pub loss_coefficient: f64,
}

const FINEMET: CoreMaterialProperties = CoreMaterialProperties {
    permeability: 70000.0,
    saturation_flux_density: 1.23,
    loss_coefficient: 0.10,
};
const VITROPERM: CoreMaterialProperties = CoreMaterialProperties {
    permeability: 60000.0,
    saturation_flux_density: 1.2,
    loss_coefficient: 0.10,
};
const METGLAS_2605: CoreMaterialProperties = CoreMaterialProperties {
    permeability: 10000.0,
    saturation_flux_density: 1.56,
    loss_coefficient: 0.25,
};
const METGLAS_2714: CoreMaterialProperties = CoreMaterialProperties {
    permeability: 80000.0,
    saturation_flux_density: 0.57,
    loss_coefficient: 0.12,
};
const MNZN: CoreMaterialProperties = CoreMaterialProperties {
    permeability: 2300.0,
    saturation_flux_density: 0.39,
    loss_coefficient: 0.18,
};
const NIZN: CoreMaterialProperties = CoreMaterialProperties {
    permeability: 400.0,
    saturation_flux_density: 0.30,
    loss_coefficient: 0.15,
};
const GRAIN_ORIENTED: CoreMaterialProperties = CoreMaterialProperties {
    permeability: 4000.0,
    saturation_flux_density: 1.9,
    loss_coefficient: 0.42,
};
const NON_ORIENTED: CoreMaterialProperties = CoreMaterialProperties {
    permeability: 2000.0,
    saturation_flux_density: 1.6,
    loss_coefficient: 0.50,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NanocrystallineGrade {
    Finemet,
    Vitroperm,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmorphousGrade {
    Metglas2605,
    Metglas2714,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FerriteGrade {
    MnZn,
    NiZn,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiliconSteelGrade {
    GrainOriented,
    NonOriented,
}

/// Core material family and grade, e.g. `{"family": "ferrite", "grade": "mn_zn"}`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "family", content = "grade", rename_all = "snake_case")]
pub enum CoreMaterial {
    Nanocrystalline(NanocrystallineGrade),
    Amorphous(AmorphousGrade),
    Ferrite(FerriteGrade),
    SiliconSteel(SiliconSteelGrade),
}

impl Default for CoreMaterial {
    fn default() -> Self {
        CoreMaterial::Ferrite(FerriteGrade::MnZn)
    }
}

impl CoreMaterial {
    pub fn properties(&self) -> &'static CoreMaterialProperties {
        match self {
            CoreMaterial::Nanocrystalline(NanocrystallineGrade::Finemet) => &FINEMET,
            CoreMaterial::Nanocrystalline(NanocrystallineGrade::Vitroperm) => &VITROPERM,
            CoreMaterial::Amorphous(AmorphousGrade::Metglas2605) => &METGLAS_2605,
            CoreMaterial::Amorphous(AmorphousGrade::Metglas2714) => &METGLAS_2714,
            CoreMaterial::Ferrite(FerriteGrade::MnZn) => &MNZN,
            CoreMaterial::Ferrite(FerriteGrade::NiZn) => &NIZN,
            CoreMaterial::SiliconSteel(SiliconSteelGrade::GrainOriented) => &GRAIN_ORIENTED,
            CoreMaterial::SiliconSteel(SiliconSteelGrade::NonOriented) => &NON_ORIENTED,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeCoefficients {
    /// Leakage relative to an EI lamination stack
    pub leakage: f64,
}

const EI_SHAPE: ShapeCoefficients = ShapeCoefficients { leakage: 1.0 };
const TOROID_SHAPE: ShapeCoefficients = ShapeCoefficients { leakage: 0.4 };
const C_CORE_SHAPE: ShapeCoefficients = ShapeCoefficients { leakage: 0.7 };
const POT_SHAPE: ShapeCoefficients = ShapeCoefficients { leakage: 0.6 };

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoreShape {
    #[default]
    Ei,
    Toroid,
    CCore,
    PotCore,
}

impl CoreShape {
    pub fn coefficients(&self) -> &'static ShapeCoefficients {
        match self {
            CoreShape::Ei => &EI_SHAPE,
            CoreShape::Toroid => &TOROID_SHAPE,
            CoreShape::CCore => &C_CORE_SHAPE,
            CoreShape::PotCore => &POT_SHAPE,
        }
    }

    pub fn to_str(&self) -> &str {
        match self {
            CoreShape::Ei => "ei",
            CoreShape::Toroid => "toroid",
            CoreShape::CCore => "c_core",
            CoreShape::PotCore => "pot_core",
        }
    }
}

impl FromStr for CoreShape {
    type Err = SimpleError;

    fn from_str(val: &str) -> Result<Self, Self::Err> {
        match val.to_lowercase().as_str() {
            "ei" => Ok(CoreShape::Ei),
            "toroid" => Ok(CoreShape::Toroid),
            "c_core" | "c-core" | "ccore" => Ok(CoreShape::CCore),
            "pot_core" | "pot-core" | "pot" => Ok(CoreShape::PotCore),
            _ => bail!("Core shape not recognized"),
        }
    }
}

impl fmt::Display for CoreShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

/// Qualitative core loss bucket
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoreLoss {
    Low,
    Medium,
    High,
}

impl CoreLoss {
    /// Buckets `index` as `< low` low, `< high` medium, anything else high
    pub fn classify(index: f64, low: f64, high: f64) -> CoreLoss {
        if index < low {
            CoreLoss::Low
        } else if index < high {
            CoreLoss::Medium
        } else {
            CoreLoss::High
        }
    }

    pub fn to_str(&self) -> &str {
        match self {
            CoreLoss::Low => "low",
            CoreLoss::Medium => "medium",
            CoreLoss::High => "high",
        }
    }
}

impl fmt::Display for CoreLoss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

/// Permeability of a gapped core by reluctance mixing:
/// `μ_eff = μ / (1 + μ·gap/le)`.
///
/// Returns `permeability` unchanged for a zero gap or a non-positive path
/// length.
pub fn compute_effective_permeability_with_gap(
    permeability: f64,
    air_gap: f64,
    effective_length: f64,
) -> f64 {
    if air_gap <= 0.0 || effective_length <= 0.0 {
        return permeability;
    }
    permeability / (1.0 + permeability * air_gap / effective_length)
}

/// `L = μ0·μ_eff·N²·Ae/le` in H with `Ae` in mm² and `le` in mm
pub fn compute_primary_inductance(
    effective_permeability: f64,
    turns: u32,
    effective_area: f64,
    effective_length: f64,
) -> f64 {
    if effective_length <= 0.0 || effective_area <= 0.0 {
        return 0.0;
    }
    let n = turns as f64;
    MU_0 * effective_permeability * n * n * effective_area * MM2_TO_M2
        / (effective_length * MM_TO_M)
}

/// `B = V/(4.44·f·N·Ae)` in T, 0 when frequency, turns or area is not positive
pub fn compute_peak_flux_density(vrms: f64, freq: f64, turns: u32, effective_area: f64) -> f64 {
    if freq <= 0.0 || turns == 0 || effective_area <= 0.0 {
        return 0.0;
    }
    vrms / (SINE_FORM_FACTOR * freq * turns as f64 * effective_area * MM2_TO_M2)
}

/// `max(0, 1 − B/Bsat)`, 0 for a non-positive `Bsat`
pub fn compute_saturation_margin(flux_density: f64, saturation_flux_density: f64) -> f64 {
    if saturation_flux_density <= 0.0 {
        return 0.0;
    }
    (1.0 - flux_density / saturation_flux_density).max(0.0)
}

/// `k·max(0, 1 + log10(f/f_ref))`
pub fn core_loss_index(loss_coefficient: f64, freq: f64, reference_frequency: f64) -> f64 {
    if freq <= 0.0 || reference_frequency <= 0.0 {
        return 0.0;
    }
    loss_coefficient * (1.0 + (freq / reference_frequency).log10()).max(0.0)
}
