use super::{AnalysisMessage, Level};
use crate::network::{LoadComputedResults, LoadParams};
use crate::transformer::{CoreLoss, TransformerComputedResults};

const MIN_LOADED_RESONANCE: f64 = 1500.0;
const DARK_LOADED_RESONANCE: f64 = 2500.0;
const SHARP_Q: f64 = 5.0;
const DAMPED_Q: f64 = 0.8;
const MAX_CABLE_CAPACITANCE: f64 = 1e-9;
const MIN_AMP_IMPEDANCE: f64 = 100e3;
const LOW_SATURATION_MARGIN: f64 = 0.2;
const MIN_BANDWIDTH: f64 = 15e3;

pub fn analyze_load(load: &LoadParams, results: &LoadComputedResults) -> Vec<AnalysisMessage> {
    let mut out = Vec::new();
    let f = results.loaded_resonance;

    if f > 0.0 && f < MIN_LOADED_RESONANCE {
        out.push(
            AnalysisMessage::new(
                Level::Warning,
                "Very low loaded resonance",
                format!("With the load connected the peak falls to {:.0} Hz; the tone will be muddy.", f),
            )
            .with_suggestion("Shorten the cable or raise the pot values"),
        );
    } else if f >= MIN_LOADED_RESONANCE && f < DARK_LOADED_RESONANCE {
        out.push(AnalysisMessage::new(
            Level::Info,
            "Dark loaded resonance",
            format!("Loaded peak at {:.0} Hz gives a warm, dark voice.", f),
        ));
    }

    if results.loaded_q > SHARP_Q {
        out.push(AnalysisMessage::new(
            Level::Info,
            "Sharp resonant peak",
            format!("Loaded Q of {:.1} gives a pronounced presence peak.", results.loaded_q),
        ));
    } else if results.loaded_q > 0.0 && results.loaded_q < DAMPED_Q {
        out.push(AnalysisMessage::new(
            Level::Info,
            "Damped resonance",
            format!("Loaded Q of {:.2} leaves almost no peak.", results.loaded_q),
        ));
    }

    if results.total_cable_capacitance > MAX_CABLE_CAPACITANCE {
        out.push(
            AnalysisMessage::new(
                Level::Warning,
                "High cable capacitance",
                format!(
                    "{:.2} nF of cable pulls the resonance down.",
                    results.total_cable_capacitance * 1e9
                ),
            )
            .with_suggestion("Use a shorter or low-capacitance cable"),
        );
    }

    if load.amp_input_impedance > 0.0 && load.amp_input_impedance < MIN_AMP_IMPEDANCE {
        out.push(
            AnalysisMessage::new(
                Level::Warning,
                "Low amplifier input impedance",
                format!(
                    "{:.0} kΩ input loads the pickup heavily.",
                    load.amp_input_impedance / 1e3
                ),
            )
            .with_suggestion("Use a buffer or an input of 1 MΩ"),
        );
    }

    out
}

pub fn analyze_transformer(results: &TransformerComputedResults) -> Vec<AnalysisMessage> {
    let mut out = Vec::new();

    if results.turns_ratio == 0.0 {
        out.push(
            AnalysisMessage::new(
                Level::Warning,
                "Transformer not configured",
                "The transformer has no primary turns, so no signal passes.",
            )
            .with_suggestion("Set primary and secondary turns"),
        );
        return out;
    }

    if results.saturation_margin == 0.0 {
        out.push(
            AnalysisMessage::new(
                Level::Danger,
                "Core saturates",
                "Peak flux exceeds the core's saturation density at low frequencies.",
            )
            .with_suggestion("Add primary turns or use a larger core"),
        );
    } else if results.saturation_margin < LOW_SATURATION_MARGIN {
        out.push(AnalysisMessage::new(
            Level::Warning,
            "Little saturation headroom",
            format!(
                "Only {:.0}% margin before the core saturates.",
                results.saturation_margin * 100.0
            ),
        ));
    }

    if results.bandwidth < MIN_BANDWIDTH {
        out.push(
            AnalysisMessage::new(
                Level::Warning,
                "Narrow transformer bandwidth",
                format!("Upper −3 dB point at {:.1} kHz.", results.bandwidth / 1e3),
            )
            .with_suggestion("Use an interleaved or sectioned winding to cut leakage"),
        );
    }

    if results.core_loss_estimate == CoreLoss::High {
        out.push(AnalysisMessage::new(
            Level::Info,
            "High core loss",
            "The core material dissipates noticeably at audio frequencies.",
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transformer::TransformerParasitics;

    fn results(f: f64, q: f64) -> LoadComputedResults {
        LoadComputedResults {
            loaded_resonance: f,
            loaded_q: q,
            total_cable_capacitance: 300e-12,
            peak_gain_db: 6.0,
            load_impedance_at_1k: 100e3,
        }
    }

    fn transformer(margin: f64, bandwidth: f64, loss: CoreLoss) -> TransformerComputedResults {
        TransformerComputedResults {
            turns_ratio: 10.0,
            voltage_ratio: 10.0,
            reflected_load: 2500.0,
            primary_inductance: 0.14,
            bandwidth,
            lower_bandwidth: 30.0,
            saturation_margin: margin,
            peak_flux_density: 0.28,
            core_loss_estimate: loss,
            core_loss_index: 0.36,
            parasitics: TransformerParasitics::default(),
        }
    }

    #[test]
    fn analysis_load_resonance_and_q() {
        let load = LoadParams::default();
        assert!(analyze_load(&load, &results(5000.0, 3.0)).is_empty());
        assert_eq!(analyze_load(&load, &results(1200.0, 3.0))[0].level, Level::Warning);
        assert_eq!(analyze_load(&load, &results(2000.0, 3.0))[0].level, Level::Info);
        assert_eq!(analyze_load(&load, &results(5000.0, 6.0))[0].title, "Sharp resonant peak");
        assert_eq!(analyze_load(&load, &results(5000.0, 0.5))[0].title, "Damped resonance");
    }

    #[test]
    fn analysis_load_cable_and_amp() {
        let load = LoadParams {
            amp_input_impedance: 47e3,
            ..LoadParams::default()
        };
        let res = LoadComputedResults {
            total_cable_capacitance: 1.5e-9,
            ..results(5000.0, 3.0)
        };
        let titles: Vec<String> = analyze_load(&load, &res).into_iter().map(|m| m.title).collect();
        assert_eq!(titles, vec!["High cable capacitance", "Low amplifier input impedance"]);
    }

    #[test]
    fn analysis_transformer_rules() {
        assert!(analyze_transformer(&transformer(0.5, 40e3, CoreLoss::Low)).is_empty());
        let levels: Vec<Level> = analyze_transformer(&transformer(0.0, 10e3, CoreLoss::High))
            .iter()
            .map(|m| m.level)
            .collect();
        assert_eq!(levels, vec![Level::Danger, Level::Warning, Level::Info]);
        assert_eq!(
            analyze_transformer(&transformer(0.1, 40e3, CoreLoss::Medium))[0].title,
            "Little saturation headroom"
        );

        let unwound = TransformerComputedResults {
            turns_ratio: 0.0,
            ..transformer(0.0, 100e3, CoreLoss::Low)
        };
        let msgs = analyze_transformer(&unwound);
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].level, Level::Warning);
    }
}
