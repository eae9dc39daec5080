use crate::consts::REFERENCE_TEMPERATURE_C;
use serde::{Deserialize, Serialize};
use simple_error::{bail, SimpleError};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Resistivity at 20 °C (Ω·m) and its linear temperature coefficient (1/°C)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConductorCoefficients {
    pub resistivity: f64,
    pub temp_coefficient: f64,
}

const COPPER: ConductorCoefficients = ConductorCoefficients {
    resistivity: 1.724e-8,
    temp_coefficient: 0.00393,
};
const OFC_COPPER: ConductorCoefficients = ConductorCoefficients {
    resistivity: 1.710e-8,
    temp_coefficient: 0.00393,
};
const SILVER: ConductorCoefficients = ConductorCoefficients {
    resistivity: 1.59e-8,
    temp_coefficient: 0.0038,
};
const ALUMINIUM: ConductorCoefficients = ConductorCoefficients {
    resistivity: 2.65e-8,
    temp_coefficient: 0.00429,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WireMaterial {
    #[default]
    Copper,
    OxygenFreeCopper,
    Silver,
    Aluminium,
}

impl WireMaterial {
    pub fn coefficients(&self) -> &'static ConductorCoefficients {
        match self {
            WireMaterial::Copper => &COPPER,
            WireMaterial::OxygenFreeCopper => &OFC_COPPER,
            WireMaterial::Silver => &SILVER,
            WireMaterial::Aluminium => &ALUMINIUM,
        }
    }

    /// Resistivity (Ω·m) at `temperature_c`, linear about 20 °C
    pub fn resistivity_at(&self, temperature_c: f64) -> f64 {
        let k = self.coefficients();
        k.resistivity * (1.0 + k.temp_coefficient * (temperature_c - REFERENCE_TEMPERATURE_C))
    }
}

/// Conductor construction; `diameter` on the wire is per strand
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StrandType {
    #[default]
    Solid,
    Stranded {
        strands: u32,
    },
}

impl StrandType {
    /// Fraction of a stranded bundle's outline occupied by conductor
    const BUNDLE_FILL: f64 = 0.78;

    pub fn strands(&self) -> u32 {
        match self {
            StrandType::Solid => 1,
            StrandType::Stranded { strands } => (*strands).max(1),
        }
    }

    /// Copper cross-section (m²) for a strand diameter in mm
    pub fn conductor_area(&self, diameter_mm: f64) -> f64 {
        let d = diameter_mm * 1e-3;
        self.strands() as f64 * PI * d * d / 4.0
    }

    /// Outline diameter (mm) of the bare conductor bundle
    pub fn bundle_diameter(&self, diameter_mm: f64) -> f64 {
        match self.strands() {
            1 => diameter_mm,
            n => diameter_mm * (n as f64 / StrandType::BUNDLE_FILL).sqrt(),
        }
    }
}

/// Relative inter-turn capacitance of the film
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InsulationCoefficients {
    pub capacitance: f64,
}

/// Capacitance factor and film thickness over the bare diameter
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BuildCoefficients {
    pub capacitance: f64,
    pub build_ratio: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InsulationType {
    #[default]
    PlainEnamel,
    Formvar,
    Polyurethane,
    Polyester,
    Ptfe,
}

impl InsulationType {
    pub fn coefficients(&self) -> &'static InsulationCoefficients {
        const PLAIN_ENAMEL: InsulationCoefficients = InsulationCoefficients { capacitance: 1.0 };
        const FORMVAR: InsulationCoefficients = InsulationCoefficients { capacitance: 0.95 };
        const POLYURETHANE: InsulationCoefficients = InsulationCoefficients { capacitance: 1.05 };
        const POLYESTER: InsulationCoefficients = InsulationCoefficients { capacitance: 1.1 };
        const PTFE: InsulationCoefficients = InsulationCoefficients { capacitance: 0.75 };
        match self {
            InsulationType::PlainEnamel => &PLAIN_ENAMEL,
            InsulationType::Formvar => &FORMVAR,
            InsulationType::Polyurethane => &POLYURETHANE,
            InsulationType::Polyester => &POLYESTER,
            InsulationType::Ptfe => &PTFE,
        }
    }

    pub fn to_str(&self) -> &str {
        match self {
            InsulationType::PlainEnamel => "plain enamel",
            InsulationType::Formvar => "formvar",
            InsulationType::Polyurethane => "polyurethane",
            InsulationType::Polyester => "polyester",
            InsulationType::Ptfe => "PTFE",
        }
    }
}

impl FromStr for InsulationType {
    type Err = SimpleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plain" | "plainenamel" | "plain enamel" | "enamel" => Ok(InsulationType::PlainEnamel),
            "formvar" | "heavy formvar" => Ok(InsulationType::Formvar),
            "polyurethane" | "poly" | "pu" => Ok(InsulationType::Polyurethane),
            "polyester" | "pe" => Ok(InsulationType::Polyester),
            "ptfe" | "teflon" => Ok(InsulationType::Ptfe),
            _ => bail!("insulation type not recognized"),
        }
    }
}

impl fmt::Display for InsulationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

/// Insulation class: film thickness grade
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InsulationBuild {
    #[default]
    Single,
    Heavy,
    Triple,
}

impl InsulationBuild {
    pub fn coefficients(&self) -> &'static BuildCoefficients {
        const SINGLE: BuildCoefficients = BuildCoefficients {
            capacitance: 1.0,
            build_ratio: 0.04,
        };
        const HEAVY: BuildCoefficients = BuildCoefficients {
            capacitance: 0.85,
            build_ratio: 0.09,
        };
        const TRIPLE: BuildCoefficients = BuildCoefficients {
            capacitance: 0.72,
            build_ratio: 0.15,
        };
        match self {
            InsulationBuild::Single => &SINGLE,
            InsulationBuild::Heavy => &HEAVY,
            InsulationBuild::Triple => &TRIPLE,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindingCoefficients {
    pub capacitance: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WindingStyle {
    #[default]
    Scatter,
    Random,
    Layered,
}

impl WindingStyle {
    pub fn coefficients(&self) -> &'static WindingCoefficients {
        const SCATTER: WindingCoefficients = WindingCoefficients { capacitance: 0.85 };
        const RANDOM: WindingCoefficients = WindingCoefficients { capacitance: 1.0 };
        const LAYERED: WindingCoefficients = WindingCoefficients { capacitance: 1.25 };
        match self {
            WindingStyle::Scatter => &SCATTER,
            WindingStyle::Random => &RANDOM,
            WindingStyle::Layered => &LAYERED,
        }
    }

    pub fn to_str(&self) -> &str {
        match self {
            WindingStyle::Scatter => "scatter",
            WindingStyle::Random => "random",
            WindingStyle::Layered => "layered",
        }
    }
}

impl FromStr for WindingStyle {
    type Err = SimpleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "scatter" | "scatterwound" | "scatter-wound" => Ok(WindingStyle::Scatter),
            "random" | "machine" => Ok(WindingStyle::Random),
            "layered" | "layer" | "perfect" => Ok(WindingStyle::Layered),
            _ => bail!("winding style not recognized"),
        }
    }
}

impl fmt::Display for WindingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

/// Magnet wire and how it is wound. Read-only to the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WireParams {
    pub material: WireMaterial,
    pub strand: StrandType,
    /// Bare diameter in mm (per strand)
    pub diameter: f64,
    pub insulation: InsulationType,
    pub insulation_build: InsulationBuild,
    pub turns: u32,
    pub winding_style: WindingStyle,
    pub packing_factor: f64,
    /// Winding temperature in °C
    pub temperature: f64,
}

impl Default for WireParams {
    /// 42 AWG plain enamel, 8000 turns scatter wound
    fn default() -> Self {
        WireParams {
            material: WireMaterial::Copper,
            strand: StrandType::Solid,
            diameter: 0.0635,
            insulation: InsulationType::PlainEnamel,
            insulation_build: InsulationBuild::Single,
            turns: 8000,
            winding_style: WindingStyle::Scatter,
            packing_factor: 0.72,
            temperature: REFERENCE_TEMPERATURE_C,
        }
    }
}

impl WireParams {
    /// `k_ins`: insulation type times build
    pub fn insulation_factor(&self) -> f64 {
        self.insulation.coefficients().capacitance * self.insulation_build.coefficients().capacitance
    }

    /// Overall diameter (mm) including film build
    pub fn insulated_diameter(&self) -> f64 {
        self.strand.bundle_diameter(self.diameter)
            * (1.0 + self.insulation_build.coefficients().build_ratio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn wire_resistivity_temperature() {
        let cu = WireMaterial::Copper;
        assert_relative_eq!(cu.resistivity_at(20.0), 1.724e-8);
        assert_relative_eq!(cu.resistivity_at(45.0), 1.724e-8 * (1.0 + 0.00393 * 25.0));
        assert!(cu.resistivity_at(0.0) < cu.resistivity_at(20.0));
        assert!(WireMaterial::Silver.resistivity_at(20.0) < cu.resistivity_at(20.0));
    }

    #[test]
    fn wire_strand_area() {
        let solid = StrandType::Solid;
        let litz = StrandType::Stranded { strands: 7 };
        assert_relative_eq!(solid.conductor_area(1.0), PI / 4.0 * 1e-6);
        assert_relative_eq!(litz.conductor_area(1.0), 7.0 * PI / 4.0 * 1e-6);
        assert_eq!(solid.bundle_diameter(0.1), 0.1);
        assert!(litz.bundle_diameter(0.1) > 0.1 * 7f64.sqrt());
        assert_eq!(StrandType::Stranded { strands: 0 }.strands(), 1);
    }

    #[test]
    fn wire_from_str() {
        assert_eq!(WindingStyle::from_str("Scatter").unwrap(), WindingStyle::Scatter);
        assert_eq!(WindingStyle::from_str("layered").unwrap(), WindingStyle::Layered);
        assert!(WindingStyle::from_str("braided").is_err());
        assert_eq!(
            InsulationType::from_str("Heavy Formvar").unwrap(),
            InsulationType::Formvar
        );
        assert!(InsulationType::from_str("cotton").is_err());
    }

    #[test]
    fn wire_insulation_factor() {
        let mut wire = WireParams::default();
        assert_relative_eq!(wire.insulation_factor(), 1.0);
        wire.insulation_build = InsulationBuild::Heavy;
        assert!(wire.insulation_factor() < 1.0);
        assert_relative_eq!(wire.insulated_diameter(), 0.0635 * 1.09);
    }

    #[test]
    fn wire_params_from_json() {
        let wire: WireParams = serde_json::from_str(
            r#"{ "diameter": 0.0635, "turns": 7600, "windingStyle": "scatter",
                 "packingFactor": 0.72, "temperature": 20.0,
                 "strand": { "type": "stranded", "strands": 3 } }"#,
        )
        .unwrap();
        assert_eq!(wire.turns, 7600);
        assert_eq!(wire.strand.strands(), 3);
        assert_eq!(wire.material, WireMaterial::Copper);
    }
}
