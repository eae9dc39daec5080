use crate::calibration::Calibration;
use crate::complex::Complex;
use crate::consts::angular_frequency;
use crate::frequency::{Frequency, FrequencyPoint};
use crate::network::{capacitive_reactance, CoilLoad};
use crate::unit::Scale;
use tracing::{debug, info_span, warn};

use super::parasitics::TransformerParasitics;

/// Lumped transformer: series `Rp` and `jωLlk` into the magnetizing
/// inductance shunted by the interwinding capacitance, ideal `1:n` behind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformerNetwork {
    turns_ratio: f64,
    magnetizing_inductance: f64,
    parasitics: TransformerParasitics,
}

impl TransformerNetwork {
    pub fn new(
        turns_ratio: f64,
        magnetizing_inductance: f64,
        parasitics: TransformerParasitics,
    ) -> Self {
        TransformerNetwork {
            turns_ratio,
            magnetizing_inductance,
            parasitics,
        }
    }

    pub fn turns_ratio(&self) -> f64 {
        self.turns_ratio
    }

    pub fn parasitics(&self) -> &TransformerParasitics {
        &self.parasitics
    }

    fn series_branch(&self, freq: f64) -> Complex {
        Complex::new(
            self.parasitics.primary_resistance,
            angular_frequency(freq) * self.parasitics.leakage_inductance,
        )
    }

    fn magnetizing_branch(&self, freq: f64) -> Complex {
        let zm = if self.magnetizing_inductance > 0.0 && freq > 0.0 {
            Complex::from_imag(angular_frequency(freq) * self.magnetizing_inductance)
        } else {
            Complex::ZERO
        };
        zm.parallel(&capacitive_reactance(
            self.parasitics.interwinding_capacitance,
            freq,
        ))
    }

    /// `Rp + jωLlk + (jωLm ‖ 1/(jωCiw))` at `freq` Hz, secondary open
    pub fn ladder_impedance(&self, freq: f64) -> Complex {
        self.series_branch(freq) + self.magnetizing_branch(freq)
    }

    /// Load after the secondary winding capacitance
    fn shunted_load(&self, load: Complex, freq: f64) -> Complex {
        load.parallel(&capacitive_reactance(
            self.parasitics.secondary_capacitance,
            freq,
        ))
    }

    /// `Z_load/n² + Rs/n²` seen across the magnetizing branch; open for
    /// `n = 0`
    pub fn reflected_impedance(&self, load: Complex, freq: f64) -> Complex {
        if self.turns_ratio <= 0.0 {
            return Complex::OPEN_CIRCUIT;
        }
        let n2 = self.turns_ratio * self.turns_ratio;
        let shunted = self.shunted_load(load, freq);
        shunted.scale(1.0 / n2) + Complex::from_real(self.parasitics.secondary_resistance / n2)
    }

    /// Impedance at the primary terminals with `load` on the secondary
    pub fn input_impedance(&self, load: Complex, freq: f64) -> Complex {
        let shunt = self
            .magnetizing_branch(freq)
            .parallel(&self.reflected_impedance(load, freq));
        capacitive_reactance(self.parasitics.primary_capacitance, freq)
            .parallel(&(self.series_branch(freq) + shunt))
    }

    /// Secondary voltage per primary terminal voltage
    pub fn voltage_transfer(&self, load: Complex, freq: f64) -> Complex {
        if self.turns_ratio <= 0.0 {
            return Complex::ZERO;
        }
        let n2 = self.turns_ratio * self.turns_ratio;
        let reflected = self.reflected_impedance(load, freq);
        let shunt = self.magnetizing_branch(freq).parallel(&reflected);
        let across_magnetizing = shunt / (self.series_branch(freq) + shunt);
        let across_load = self.shunted_load(load, freq).scale(1.0 / n2) / reflected;
        across_magnetizing * across_load * Complex::from_real(self.turns_ratio)
    }
}

/// A load hung on the secondary of a transformer, as the coil sees it
pub struct TransformerLoad<'a, L: CoilLoad + ?Sized> {
    network: &'a TransformerNetwork,
    load: &'a L,
}

impl<'a, L: CoilLoad + ?Sized> TransformerLoad<'a, L> {
    pub fn new(network: &'a TransformerNetwork, load: &'a L) -> Self {
        TransformerLoad { network, load }
    }
}

impl<L: CoilLoad + ?Sized> CoilLoad for TransformerLoad<'_, L> {
    fn impedance(&self, freq: f64) -> Complex {
        self.network
            .input_impedance(self.load.impedance(freq), freq)
    }

    fn transfer(&self, freq: f64) -> Complex {
        self.network
            .voltage_transfer(self.load.impedance(freq), freq)
            * self.load.transfer(freq)
    }
}

/// Transformer gain across `freqs`, driven from an ideal source, normalised
/// to the response at the reference frequency and scaled by the turns ratio
/// so mid-band reads `n`.
pub fn transformer_frequency_response<L: CoilLoad + ?Sized>(
    network: &TransformerNetwork,
    load: &L,
    freqs: &Frequency,
    cal: &Calibration,
) -> Vec<FrequencyPoint> {
    let _span = info_span!("transformer_response", n_points = freqs.npts()).entered();
    let transfer = |f: f64| network.voltage_transfer(load.impedance(f), f);
    let reference = transfer(cal.reference_frequency).magnitude();
    let norm = if reference > 0.0 && reference.is_finite() {
        network.turns_ratio() / reference
    } else {
        0.0
    };
    freqs
        .iter()
        .map(|&f| FrequencyPoint::from_complex(f, transfer(f).scale(norm), cal.db_floor))
        .collect()
}

/// Upper and lower −3 dB points of a response (Hz)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BandEdges {
    pub peak_frequency: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Scans forward from the peak for the first sample below
/// `half_power_ratio × peak`, and backward for the lower edge. A missing
/// crossing reports the sweep bound on that side.
///
/// `None` for an empty response or one that never rises above zero.
pub fn find_band_edges(response: &[FrequencyPoint], half_power_ratio: f64) -> Option<BandEdges> {
    let (peak_idx, peak) = response
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, &FrequencyPoint)>, (i, pt)| match best {
            Some((_, b)) if b.magnitude >= pt.magnitude => best,
            _ => Some((i, pt)),
        })?;
    if !(peak.magnitude > 0.0 && peak.magnitude.is_finite()) {
        return None;
    }
    let threshold = peak.magnitude * half_power_ratio;

    let upper = match response[peak_idx..]
        .iter()
        .find(|pt| pt.magnitude < threshold)
    {
        Some(pt) => pt.frequency,
        None => {
            let bound = response[response.len() - 1].frequency;
            warn!(bound, "no -3 dB point above the peak, bandwidth clamped to sweep");
            bound
        }
    };
    let lower = response[..peak_idx]
        .iter()
        .rev()
        .find(|pt| pt.magnitude < threshold)
        .map_or(response[0].frequency, |pt| pt.frequency);

    debug!(peak = peak.frequency, lower, upper, "band edges");
    Some(BandEdges {
        peak_frequency: peak.frequency,
        lower,
        upper,
    })
}

/// Band edges of the transformer over the calibrated bandwidth sweep; all
/// zero when no signal passes
pub fn compute_bandwidth<L: CoilLoad + ?Sized>(
    network: &TransformerNetwork,
    load: &L,
    cal: &Calibration,
) -> BandEdges {
    let sweep = cal.bandwidth_sweep;
    let freqs = Frequency::from_log_range(sweep.start, sweep.stop, sweep.points, Scale::Base);
    let response = transformer_frequency_response(network, load, &freqs, cal);
    find_band_edges(&response, cal.half_power_ratio).unwrap_or(BandEdges {
        peak_frequency: 0.0,
        lower: 0.0,
        upper: 0.0,
    })
}
