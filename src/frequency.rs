use crate::complex::Complex;
use crate::error::{PickupError, Result};
use crate::unit::Scale;
use ndarray::Array1;
use serde::Serialize;

/// Frequency sweep; stores values in Hz
#[derive(Clone, Debug, PartialEq)]
pub struct Frequency {
    pts: Array1<f64>,
}

impl Frequency {
    pub fn from_vec(f: Vec<f64>, scale: Scale) -> Frequency {
        Frequency {
            pts: Array1::from(f).mapv(|x| scale.unscale(x)),
        }
    }

    /// `npts` points from `start` to `stop` inclusive with a constant ratio
    /// between neighbours. Non-positive bounds give an empty sweep.
    pub fn from_log_range(start: f64, stop: f64, npts: usize, scale: Scale) -> Frequency {
        let (start, stop) = (scale.unscale(start), scale.unscale(stop));
        if start <= 0.0 || stop <= 0.0 || npts == 0 {
            return Frequency::default();
        }
        let mut pts = Array1::logspace(10.0, start.log10(), stop.log10(), npts);
        pts[0] = start;
        if npts > 1 {
            pts[npts - 1] = stop;
        }
        Frequency { pts }
    }

    pub fn freq(&self, pt: usize) -> f64 {
        self.pts[pt]
    }

    pub fn npts(&self) -> usize {
        self.pts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.pts.iter()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.pts.to_vec()
    }
}

impl Default for Frequency {
    fn default() -> Self {
        Frequency {
            pts: Array1::zeros(0),
        }
    }
}

/// One sample of a response curve
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequencyPoint {
    pub frequency: f64,
    pub magnitude: f64,
    pub magnitude_db: f64,
    pub phase_deg: f64,
}

impl FrequencyPoint {
    /// Sample `value` at `frequency`. Magnitudes below `db_floor` are
    /// clamped to it before taking `20·log10`.
    pub fn from_complex(frequency: f64, value: Complex, db_floor: f64) -> Self {
        let magnitude = value.magnitude();
        FrequencyPoint {
            frequency,
            magnitude,
            magnitude_db: to_db(magnitude, db_floor),
            phase_deg: value.phase_deg(),
        }
    }
}

/// `20·log10(mag)` with `mag` floored at `floor`
pub fn to_db(magnitude: f64, floor: f64) -> f64 {
    20.0 * magnitude.max(floor).log10()
}

/// `n` log-spaced frequencies from `lo` to `hi`, both endpoints included.
///
/// # Errors
/// * `InvalidInput` unless `0 < lo < hi`
pub fn generate_log_frequencies(lo: f64, hi: f64, n: usize) -> Result<Vec<f64>> {
    if !(lo > 0.0 && hi > lo) {
        return Err(PickupError::InvalidInput(format!(
            "log sweep needs 0 < lo < hi, got {} .. {}",
            lo, hi
        )));
    }
    Ok(Frequency::from_log_range(lo, hi, n, Scale::Base).to_vec())
}
