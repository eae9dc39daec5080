use regex::Regex;
use serde::{Deserialize, Serialize};
use simple_error::{bail, SimpleError};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

macro_rules! unwrap_or_bail {
    ($opt: expr, $msg: expr) => {
        match $opt {
            Some(v) => v,
            None => {
                bail!($msg);
            }
        }
    };
}

/// Descriptor of SI scaling
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum Scale {
    Atto,
    Femto,
    Pico,
    Nano,
    Micro,
    Milli,
    Centi,
    #[default]
    Base,
    Kilo,
    Mega,
    Giga,
    Tera,
}

impl Scale {
    pub fn to_str(&self) -> &str {
        match self {
            Scale::Atto => "a",
            Scale::Femto => "f",
            Scale::Pico => "p",
            Scale::Nano => "n",
            Scale::Micro => "u",
            Scale::Milli => "m",
            Scale::Centi => "c",
            Scale::Base => "",
            Scale::Kilo => "k",
            Scale::Mega => "M",
            Scale::Giga => "G",
            Scale::Tera => "T",
        }
    }

    /// Provides multiplier for scale
    /// Scale::Pico = 1e-12
    pub fn multiplier(&self) -> f64 {
        match self {
            Scale::Atto => 1e-18,
            Scale::Femto => 1e-15,
            Scale::Pico => 1e-12,
            Scale::Nano => 1e-9,
            Scale::Micro => 1e-6,
            Scale::Milli => 1e-3,
            Scale::Centi => 1e-2,
            Scale::Base => 1.0,
            Scale::Kilo => 1e3,
            Scale::Mega => 1e6,
            Scale::Giga => 1e9,
            Scale::Tera => 1e12,
        }
    }

    /// Convert a scaled value to base units
    pub fn unscale(&self, val: f64) -> f64 {
        val * self.multiplier()
    }

    /// Convert a base-unit value to this scale
    pub fn scale(&self, val: f64) -> f64 {
        val / self.multiplier()
    }
}

impl FromStr for Scale {
    type Err = SimpleError;

    // Case matters: "m" is milli, "M" is mega.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "a" | "atto" => Ok(Scale::Atto),
            "f" | "femto" => Ok(Scale::Femto),
            "p" | "pico" => Ok(Scale::Pico),
            "n" | "nano" => Ok(Scale::Nano),
            "u" | "µ" | "μ" | "micro" => Ok(Scale::Micro),
            "m" | "milli" => Ok(Scale::Milli),
            "c" | "centi" => Ok(Scale::Centi),
            "" => Ok(Scale::Base),
            "k" | "K" | "kilo" => Ok(Scale::Kilo),
            "M" | "mega" | "meg" | "Meg" => Ok(Scale::Mega),
            "G" | "giga" => Ok(Scale::Giga),
            "T" | "tera" => Ok(Scale::Tera),
            _ => bail!("scale prefix not recognized: {}", s),
        }
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

fn value_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^\s*(?<num>[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)\s*(?<scale>meg|Meg|[afpnuµμmckKMGT]?)\s*(?:Hz|hz|Ω|ohm|Ohm|F|H|R)?\s*$",
        )
        .expect("Invalid regex!")
    })
}

/// Parse an engineering-notation value such as `250k`, `470pF`, `1.5M` or
/// `2.2e-9` into base units.
///
/// A trailing unit symbol (`Hz`, `F`, `H`, `Ω`) is accepted and ignored.
/// A lone `m` is milli, following SPICE; meters are never inferred.
pub fn parse_value(s: &str) -> Result<f64, SimpleError> {
    let caps = match value_regex().captures(s) {
        Some(c) => c,
        None => bail!("value not recognized: {}", s),
    };
    let num = unwrap_or_bail!(caps.name("num"), "missing numeric part");
    let val: f64 = match num.as_str().parse() {
        Ok(v) => v,
        Err(_) => bail!("number not recognized: {}", num.as_str()),
    };
    let scale = match caps.name("scale") {
        Some(m) => Scale::from_str(m.as_str())?,
        None => Scale::Base,
    };
    Ok(scale.unscale(val))
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn test_parse_value() {
        assert!(approx_eq!(f64, parse_value("250k").unwrap(), 250e3, ulps = 2));
        assert!(approx_eq!(f64, parse_value("470p").unwrap(), 470e-12, ulps = 2));
        assert!(approx_eq!(f64, parse_value("470pF").unwrap(), 470e-12, ulps = 2));
        assert!(approx_eq!(f64, parse_value("1.5M").unwrap(), 1.5e6, ulps = 2));
        assert!(approx_eq!(f64, parse_value("1Meg").unwrap(), 1e6, ulps = 2));
        assert!(approx_eq!(f64, parse_value("22nF").unwrap(), 22e-9, ulps = 2));
        assert!(approx_eq!(f64, parse_value("2.2e-9").unwrap(), 2.2e-9, ulps = 2));
        assert!(approx_eq!(f64, parse_value(" 1m ").unwrap(), 1e-3, ulps = 2));
        assert!(approx_eq!(f64, parse_value("100").unwrap(), 100.0, ulps = 2));
        assert!(approx_eq!(f64, parse_value("4.7kΩ").unwrap(), 4700.0, ulps = 2));
    }

    #[test]
    fn test_parse_value_errors() {
        assert!(parse_value("").is_err());
        assert!(parse_value("abc").is_err());
        assert!(parse_value("10x").is_err());
        assert!(parse_value("1.2.3k").is_err());
    }

    #[test]
    fn test_scale_unscale() {
        assert!(approx_eq!(f64, Scale::Kilo.unscale(2.5), 2500.0, ulps = 2));
        assert!(approx_eq!(f64, Scale::Pico.scale(100e-12), 100.0, ulps = 2));
        assert_eq!(Scale::from_str("M").unwrap(), Scale::Mega);
        assert_eq!(Scale::from_str("m").unwrap(), Scale::Milli);
        assert!(Scale::from_str("x").is_err());
    }
}
