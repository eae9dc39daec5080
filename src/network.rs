//! Coil impedance, the load hung on it, and the loaded response.

use crate::calibration::Calibration;
use crate::coil::CoilComputedResults;
use crate::complex::Complex;
use crate::consts::angular_frequency;
use crate::frequency::{to_db, Frequency, FrequencyPoint};
use crate::minimize::Golden;
use crate::transformer::{TransformerLoad, TransformerNetwork, TransformerParams};
use crate::unit::Scale;
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span, warn};

/// Controls, cable and amplifier downstream of the pickup
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoadParams {
    /// Ω
    pub volume_pot: f64,
    /// Wiper position in [0, 1]
    pub volume_position: f64,
    /// Ω
    pub tone_pot: f64,
    pub tone_position: f64,
    /// F
    pub tone_capacitor: f64,
    /// m
    pub cable_length: f64,
    /// F/m
    pub cable_capacitance_per_meter: f64,
    /// Ω
    pub amp_input_impedance: f64,
}

impl Default for LoadParams {
    fn default() -> Self {
        LoadParams {
            volume_pot: 250e3,
            volume_position: 1.0,
            tone_pot: 250e3,
            tone_position: 1.0,
            tone_capacitor: 22e-9,
            cable_length: 3.0,
            cable_capacitance_per_meter: 100e-12,
            amp_input_impedance: 1e6,
        }
    }
}

impl LoadParams {
    /// `cable_length × cable_capacitance_per_meter`, F
    pub fn total_cable_capacitance(&self) -> f64 {
        (self.cable_length * self.cable_capacitance_per_meter).max(0.0)
    }
}

/// Anything the coil terminals can drive
pub trait CoilLoad {
    /// Impedance across the coil terminals at `freq` Hz
    fn impedance(&self, freq: f64) -> Complex;

    /// Output voltage per coil terminal voltage
    fn transfer(&self, _freq: f64) -> Complex {
        Complex::ONE
    }
}

/// Nothing connected
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Unloaded;

impl CoilLoad for Unloaded {
    fn impedance(&self, _freq: f64) -> Complex {
        Complex::OPEN_CIRCUIT
    }
}

impl CoilLoad for LoadParams {
    fn impedance(&self, freq: f64) -> Complex {
        load_impedance(self, freq)
    }
}

/// `R + jωL`
pub fn compute_series_rl(resistance: f64, inductance: f64, freq: f64) -> Complex {
    Complex::new(resistance, angular_frequency(freq) * inductance)
}

/// `−j/ωC`; open circuit for a missing capacitor or at DC
pub fn capacitive_reactance(capacitance: f64, freq: f64) -> Complex {
    if capacitance <= 0.0 || freq <= 0.0 {
        return Complex::OPEN_CIRCUIT;
    }
    Complex::from_imag(-1.0 / (angular_frequency(freq) * capacitance))
}

/// Parallel-resonant coil: `(R + jωL) ‖ −j/ωC`
pub fn coil_impedance(coil: &CoilComputedResults, freq: f64) -> Complex {
    compute_series_rl(coil.dc_resistance, coil.inductance, freq)
        .parallel(&capacitive_reactance(coil.capacitance, freq))
}

/// Volume pot, tone branch, amplifier input and cable capacitance, all in
/// parallel across the coil.
pub fn load_impedance(load: &LoadParams, freq: f64) -> Complex {
    let volume = Complex::from_real(load.volume_pot * load.volume_position);
    let tone = Complex::from_real(load.tone_pot * load.tone_position)
        + capacitive_reactance(load.tone_capacitor, freq);
    let amp = if load.amp_input_impedance > 0.0 {
        Complex::from_real(load.amp_input_impedance)
    } else {
        Complex::OPEN_CIRCUIT
    };
    let cable = capacitive_reactance(load.total_cable_capacitance(), freq);

    volume.parallel(&tone).parallel(&amp).parallel(&cable)
}

/// Output per EMF at `freq`: the coil's `R + jωL` in series, its
/// capacitance in parallel with the load as the shunt.
pub fn response_at<L: CoilLoad + ?Sized>(
    coil: &CoilComputedResults,
    load: &L,
    freq: f64,
) -> Complex {
    let series = compute_series_rl(coil.dc_resistance, coil.inductance, freq);
    let shunt = capacitive_reactance(coil.capacitance, freq).parallel(&load.impedance(freq));
    let divider = if shunt.is_open_circuit() {
        Complex::ONE
    } else {
        shunt / (series + shunt)
    };
    divider * load.transfer(freq)
}

/// Response of `coil` into any load across `freqs`
pub fn sweep_response<L: CoilLoad + ?Sized>(
    coil: &CoilComputedResults,
    load: &L,
    freqs: &Frequency,
    cal: &Calibration,
) -> Vec<FrequencyPoint> {
    let _span = info_span!("system_response", n_points = freqs.npts()).entered();
    freqs
        .iter()
        .map(|&f| FrequencyPoint::from_complex(f, response_at(coil, load, f), cal.db_floor))
        .collect()
}

/// Coil into the pots, cable and amplifier
pub fn system_response(
    coil: &CoilComputedResults,
    load: &LoadParams,
    freqs: &Frequency,
    cal: &Calibration,
) -> Vec<FrequencyPoint> {
    sweep_response(coil, load, freqs, cal)
}

/// Coil into a transformer with the load on its secondary
pub fn transformer_system_response(
    coil: &CoilComputedResults,
    transformer: &TransformerNetwork,
    load: &LoadParams,
    freqs: &Frequency,
    cal: &Calibration,
) -> Vec<FrequencyPoint> {
    sweep_response(coil, &TransformerLoad::new(transformer, load), freqs, cal)
}

/// Magnitude and phase of the bare coil impedance
pub fn coil_impedance_curve(
    coil: &CoilComputedResults,
    freqs: &Frequency,
    cal: &Calibration,
) -> Vec<FrequencyPoint> {
    freqs
        .iter()
        .map(|&f| FrequencyPoint::from_complex(f, coil_impedance(coil, f), cal.db_floor))
        .collect()
}

/// Located response peak and its half-power width
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ResonancePeak {
    pub frequency: f64,
    pub magnitude: f64,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
    pub q: f64,
    /// dB above the lowest swept frequency
    pub gain_db: f64,
}

/// Frequency (Hz) where the response falls through `threshold` between
/// samples `a` and `b`, interpolated on a log axis.
fn crossing(a: (f64, f64), b: (f64, f64), threshold: f64) -> f64 {
    let (fa, ma) = a;
    let (fb, mb) = b;
    let t = if ma != mb { (ma - threshold) / (ma - mb) } else { 0.0 };
    10f64.powf(fa.log10() + t * (fb.log10() - fa.log10()))
}

/// Loaded resonance by dense sweep and golden refinement, Q by the
/// half-power bandwidth around it.
pub fn find_resonance_peak<L: CoilLoad + ?Sized>(
    coil: &CoilComputedResults,
    load: &L,
    cal: &Calibration,
) -> ResonancePeak {
    let sweep = cal.resonance_sweep;
    let freqs = Frequency::from_log_range(sweep.start, sweep.stop, sweep.points, Scale::Base);
    let _span = info_span!("loaded_resonance", n_points = freqs.npts()).entered();

    let mags: Vec<f64> = freqs
        .iter()
        .map(|&f| response_at(coil, load, f).magnitude())
        .collect();
    let Some(&base) = mags.first() else {
        return ResonancePeak::default();
    };
    let mut idx = 0;
    for (i, m) in mags.iter().enumerate() {
        if *m > mags[idx] {
            idx = i;
        }
    }

    if !(mags[idx] > 0.0 && mags[idx].is_finite()) {
        debug!(magnitude = mags[idx], "no signal reaches the output, no resonance");
        return ResonancePeak::default();
    }

    let mut peak_f = freqs.freq(idx);
    let mut peak_m = mags[idx];
    if idx > 0 && idx + 1 < mags.len() {
        let mut golden =
            Golden::new(|x: f64| -response_at(coil, load, 10f64.powf(x)).magnitude());
        match golden.golden_section_search(
            freqs.freq(idx - 1).log10(),
            freqs.freq(idx + 1).log10(),
            Some(cal.peak_tolerance),
            Some(200),
        ) {
            Ok(res) if -res.fmin > peak_m => {
                peak_f = 10f64.powf(res.xmin);
                peak_m = -res.fmin;
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "peak refinement failed, using sweep maximum"),
        }
    }

    let threshold = peak_m * cal.half_power_ratio;
    let upper = (idx + 1..mags.len())
        .find(|&j| mags[j] < threshold)
        .map(|j| {
            crossing(
                (freqs.freq(j - 1), mags[j - 1]),
                (freqs.freq(j), mags[j]),
                threshold,
            )
        });
    let lower = (0..idx).rev().find(|&j| mags[j] < threshold).map(|j| {
        crossing(
            (freqs.freq(j + 1), mags[j + 1]),
            (freqs.freq(j), mags[j]),
            threshold,
        )
    });

    let bandwidth = match (lower, upper) {
        (Some(lo), Some(hi)) => hi - lo,
        (None, Some(hi)) => 2.0 * (hi - peak_f),
        (Some(lo), None) => 2.0 * (peak_f - lo),
        (None, None) => 0.0,
    };
    let q = if bandwidth > 0.0 { peak_f / bandwidth } else { 0.0 };
    if bandwidth <= 0.0 {
        warn!(peak = peak_f, "no half-power crossing around the peak, Q set to 0");
    }

    let out = ResonancePeak {
        frequency: peak_f,
        magnitude: peak_m,
        lower,
        upper,
        q,
        gain_db: to_db(peak_m, cal.db_floor) - to_db(base, cal.db_floor),
    };
    debug!(f = out.frequency, q = out.q, gain_db = out.gain_db, "resonance peak");
    out
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadComputedResults {
    /// Hz
    pub loaded_resonance: f64,
    pub loaded_q: f64,
    /// F
    pub total_cable_capacitance: f64,
    pub peak_gain_db: f64,
    /// |Z| (Ω) across the coil at the reference frequency
    pub load_impedance_at_1k: f64,
}

fn loaded_results<L: CoilLoad + ?Sized>(
    coil: &CoilComputedResults,
    load: &L,
    cable_capacitance: f64,
    cal: &Calibration,
) -> LoadComputedResults {
    let peak = find_resonance_peak(coil, load, cal);
    LoadComputedResults {
        loaded_resonance: peak.frequency,
        loaded_q: peak.q,
        total_cable_capacitance: cable_capacitance,
        peak_gain_db: peak.gain_db,
        load_impedance_at_1k: load.impedance(cal.reference_frequency).magnitude(),
    }
}

pub fn compute_loaded_results(
    coil: &CoilComputedResults,
    load: &LoadParams,
    cal: &Calibration,
) -> LoadComputedResults {
    loaded_results(coil, load, load.total_cable_capacitance(), cal)
}

/// Loaded figures with the load behind `transformer` when it is enabled
pub fn compute_loaded_results_with_transformer(
    coil: &CoilComputedResults,
    load: &LoadParams,
    transformer: &TransformerParams,
    cal: &Calibration,
) -> LoadComputedResults {
    if !transformer.enabled {
        return compute_loaded_results(coil, load, cal);
    }
    let network = transformer.network(cal);
    loaded_results(
        coil,
        &TransformerLoad::new(&network, load),
        load.total_cable_capacitance(),
        cal,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coil::{compute_coil_results, CoilGeometry, WireParams};
    use approx::assert_relative_eq;
    use float_cmp::approx_eq;
    use std::f64::consts::PI;

    fn strat() -> CoilComputedResults {
        let wire = WireParams {
            turns: 7600,
            ..WireParams::default()
        };
        compute_coil_results(&CoilGeometry::default(), &wire, &Calibration::default()).unwrap()
    }

    #[test]
    fn network_series_rl() {
        for (r, l, f) in [(1.0, 1e-3, 50.0), (8e3, 2.5, 12e3), (1405.7, 0.304, 1e3)] {
            let z = compute_series_rl(r, l, f);
            assert_eq!(z.re(), r);
            assert!(approx_eq!(f64, z.im(), 2.0 * PI * f * l, ulps = 4));
        }
    }

    #[test]
    fn network_capacitive_reactance() {
        let z = capacitive_reactance(1e-6, 1000.0);
        assert_eq!(z.re(), 0.0);
        assert_relative_eq!(z.im(), -159.154_943, max_relative = 1e-8);
        assert!(capacitive_reactance(0.0, 1000.0).is_open_circuit());
        assert!(capacitive_reactance(1e-9, 0.0).is_open_circuit());
    }

    #[test]
    fn network_coil_impedance_peaks() {
        let coil = strat();
        let low = coil_impedance(&coil, 20.0).magnitude();
        let high = coil_impedance(&coil, 1e6).magnitude();
        let peak = coil_impedance(&coil, coil.resonant_frequency).magnitude();
        assert!(peak > low && peak > high);
        assert!(peak > 100.0 * coil.dc_resistance);
    }

    #[test]
    fn network_load_impedance() {
        let load = LoadParams::default();
        // at DC-ish frequencies the capacitors are open: 250k ‖ 1M
        let z = load_impedance(&load, 1e-3);
        assert_relative_eq!(z.re(), 200e3, max_relative = 1e-4);

        let grounded = LoadParams {
            volume_position: 0.0,
            ..LoadParams::default()
        };
        assert_eq!(load_impedance(&grounded, 1e3).magnitude(), 0.0);

        let no_amp = LoadParams {
            amp_input_impedance: 0.0,
            tone_capacitor: 0.0,
            cable_length: 0.0,
            ..LoadParams::default()
        };
        assert_relative_eq!(load_impedance(&no_amp, 1e3).re(), 250e3, max_relative = 1e-12);
        assert_relative_eq!(load.total_cable_capacitance(), 300e-12, max_relative = 1e-12);
    }

    #[test]
    fn network_unloaded_peak_matches_self_resonance() {
        let coil = strat();
        let peak = find_resonance_peak(&coil, &Unloaded, &Calibration::default());
        assert_relative_eq!(peak.frequency, coil.resonant_frequency, max_relative = 0.01);
        assert_relative_eq!(peak.q, coil.quality_factor, max_relative = 0.1);
        assert!(peak.lower.is_some() && peak.upper.is_some());
    }

    #[test]
    fn network_default_load_pulls_resonance_down() {
        let coil = strat();
        let cal = Calibration::default();
        let res = compute_loaded_results(&coil, &LoadParams::default(), &cal);
        assert!(res.loaded_resonance > 10e3 && res.loaded_resonance < 20e3);
        assert!(res.loaded_q > 2.0 && res.loaded_q < 5.0);
        assert!(res.peak_gain_db > 6.0);
        assert!(res.loaded_resonance < coil.resonant_frequency);

        let long_cable = LoadParams {
            cable_length: 10.0,
            ..LoadParams::default()
        };
        let longer = compute_loaded_results(&coil, &long_cable, &cal);
        assert!(longer.loaded_resonance < res.loaded_resonance);
        assert_relative_eq!(longer.total_cable_capacitance, 1e-9, max_relative = 1e-12);
    }

    #[test]
    fn network_disabled_transformer_is_ignored() {
        let coil = strat();
        let cal = Calibration::default();
        let load = LoadParams::default();
        let mut xf = TransformerParams::default();
        xf.winding.primary_turns = 200;
        xf.winding.secondary_turns = 2000;
        assert_eq!(
            compute_loaded_results_with_transformer(&coil, &load, &xf, &cal),
            compute_loaded_results(&coil, &load, &cal)
        );
        xf.enabled = true;
        let stepped = compute_loaded_results_with_transformer(&coil, &load, &xf, &cal);
        let plain = compute_loaded_results(&coil, &load, &cal);
        assert!(stepped.loaded_resonance < 0.5 * plain.loaded_resonance);
    }

    #[test]
    fn network_silent_output_has_no_resonance() {
        let coil = strat();
        let cal = Calibration::default();

        let grounded = LoadParams {
            volume_position: 0.0,
            ..LoadParams::default()
        };
        let res = compute_loaded_results(&coil, &grounded, &cal);
        assert_eq!(res.loaded_resonance, 0.0);
        assert_eq!(res.loaded_q, 0.0);
        assert_eq!(res.peak_gain_db, 0.0);

        let unwound = TransformerParams {
            enabled: true,
            ..TransformerParams::default()
        };
        let res = compute_loaded_results_with_transformer(&coil, &LoadParams::default(), &unwound, &cal);
        assert_eq!(res.loaded_resonance, 0.0);
        assert_eq!(res.loaded_q, 0.0);
    }

    #[test]
    fn network_system_response_shape() {
        let coil = strat();
        let cal = Calibration::default();
        let freqs = Frequency::from_log_range(20.0, 20e3, 200, Scale::Base);
        let resp = system_response(&coil, &LoadParams::default(), &freqs, &cal);
        assert_eq!(resp.len(), 200);
        // divider is close to unity well below resonance
        assert_relative_eq!(resp[0].magnitude, 1.0, max_relative = 0.05);
        assert!(resp.iter().all(|p| p.magnitude_db.is_finite()));

        let curve = coil_impedance_curve(&coil, &freqs, &cal);
        assert_relative_eq!(curve[0].magnitude, coil.dc_resistance, max_relative = 0.05);
    }
}
