//! Magnet and positioning figures produced outside this crate.
//!
//! The field model is not part of the engine; these values arrive already
//! computed and are only read by the analyzer.

use serde::{Deserialize, Serialize};
use simple_error::{bail, SimpleError};
use std::fmt;
use std::str::FromStr;

/// How hard the magnet pulls on the string
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StringPull {
    #[default]
    None,
    Mild,
    Moderate,
    Strong,
}

impl StringPull {
    pub fn to_str(&self) -> &str {
        match self {
            StringPull::None => "none",
            StringPull::Mild => "mild",
            StringPull::Moderate => "moderate",
            StringPull::Strong => "strong",
        }
    }
}

impl FromStr for StringPull {
    type Err = SimpleError;

    fn from_str(val: &str) -> Result<Self, Self::Err> {
        match val.to_lowercase().as_str() {
            "none" => Ok(StringPull::None),
            "mild" => Ok(StringPull::Mild),
            "moderate" => Ok(StringPull::Moderate),
            "strong" => Ok(StringPull::Strong),
            _ => bail!("String pull level not recognized"),
        }
    }
}

impl fmt::Display for StringPull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MagnetComputedResults {
    /// T
    pub field_at_string: f64,
    pub string_pull_warning: StringPull,
    /// In [0, 1]
    pub sensitivity_index: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PositioningParams {
    /// Pole top to string, mm
    pub string_distance: f64,
    /// mm
    pub pole_height: f64,
    /// Inches, e.g. 0.010
    pub string_gauge: Option<f64>,
}

impl Default for PositioningParams {
    fn default() -> Self {
        PositioningParams {
            string_distance: 2.5,
            pole_height: 0.0,
            string_gauge: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magnet_results_from_json() {
        let m: MagnetComputedResults = serde_json::from_str(
            r#"{"fieldAtString": 0.012, "stringPullWarning": "moderate", "sensitivityIndex": 0.6}"#,
        )
        .unwrap();
        assert_eq!(m.string_pull_warning, StringPull::Moderate);
        assert_eq!(m.field_at_string, 0.012);

        let p: PositioningParams = serde_json::from_str(r#"{"stringDistance": 1.2}"#).unwrap();
        assert_eq!(p.string_distance, 1.2);
        assert_eq!(p.string_gauge, None);
    }

    #[test]
    fn magnet_string_pull_parse() {
        assert_eq!("Strong".parse::<StringPull>().unwrap(), StringPull::Strong);
        assert!("fierce".parse::<StringPull>().is_err());
        assert_eq!(StringPull::Mild.to_string(), "mild");
    }
}
