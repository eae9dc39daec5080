use super::{AnalysisMessage, Level};
use crate::coil::{CoilComputedResults, WireParams};

const DCR_DANGER: f64 = 20e3;
const DCR_WARNING: f64 = 15e3;
const DCR_INFO: f64 = 12e3;
const DCR_LOW: f64 = 2e3;
const MIN_RESONANCE: f64 = 1500.0;
const FILL_WARNING: f64 = 0.95;
const MIN_WIRE_DIAMETER: f64 = 0.05;
const HOT_TEMPERATURE: f64 = 80.0;
const HIGH_CAPACITANCE: f64 = 300e-12;

fn kilo_ohms(r: f64) -> String {
    format!("{:.1} kΩ", r / 1e3)
}

pub fn analyze_coil(wire: &WireParams, coil: &CoilComputedResults) -> Vec<AnalysisMessage> {
    let mut out = Vec::new();
    let dcr = coil.dc_resistance;

    if dcr > DCR_DANGER {
        out.push(
            AnalysisMessage::new(
                Level::Danger,
                "Very high DC resistance",
                format!(
                    "{} is far above typical pickups; treble will be heavily rolled off.",
                    kilo_ohms(dcr)
                ),
            )
            .with_suggestion("Use thicker wire or fewer turns"),
        );
    } else if dcr >= DCR_WARNING {
        out.push(
            AnalysisMessage::new(
                Level::Warning,
                "High DC resistance",
                format!("{} gives a dark, compressed tone.", kilo_ohms(dcr)),
            )
            .with_suggestion("Reduce turns if more clarity is wanted"),
        );
    } else if dcr >= DCR_INFO {
        out.push(AnalysisMessage::new(
            Level::Info,
            "Hot winding",
            format!("{} is in overwound territory.", kilo_ohms(dcr)),
        ));
    } else if dcr < DCR_LOW {
        out.push(AnalysisMessage::new(
            Level::Info,
            "Low output",
            format!("{} suggests a low-output, bright pickup.", kilo_ohms(dcr)),
        ));
    }

    let f0 = coil.resonant_frequency;
    if f0 > 0.0 && f0 < MIN_RESONANCE {
        out.push(
            AnalysisMessage::new(
                Level::Warning,
                "Low self-resonance",
                format!("Unloaded resonance at {:.0} Hz sits inside the guitar range.", f0),
            )
            .with_suggestion("Lower the inductance or the winding capacitance"),
        );
    }

    if coil.fill_ratio > 1.0 {
        out.push(
            AnalysisMessage::new(
                Level::Danger,
                "Bobbin overfilled",
                format!(
                    "{} turns do not fit; the bobbin holds about {}.",
                    wire.turns, coil.max_turns
                ),
            )
            .with_suggestion("Use thinner wire, fewer turns or a larger bobbin"),
        );
    } else if coil.fill_ratio >= FILL_WARNING {
        out.push(AnalysisMessage::new(
            Level::Warning,
            "Bobbin nearly full",
            format!("Winding uses {:.0}% of the bobbin window.", coil.fill_ratio * 100.0),
        ));
    }

    if wire.diameter > 0.0 && wire.diameter < MIN_WIRE_DIAMETER {
        out.push(
            AnalysisMessage::new(
                Level::Warning,
                "Fragile wire",
                format!("{:.4} mm wire breaks easily while winding.", wire.diameter),
            )
            .with_suggestion("Reduce winding tension"),
        );
    }

    if wire.temperature > HOT_TEMPERATURE {
        out.push(AnalysisMessage::new(
            Level::Info,
            "High operating temperature",
            format!(
                "At {:.0} °C the copper resistance is noticeably raised.",
                wire.temperature
            ),
        ));
    }

    if coil.capacitance > HIGH_CAPACITANCE {
        out.push(AnalysisMessage::new(
            Level::Info,
            "High winding capacitance",
            format!("{:.0} pF of self-capacitance.", coil.capacitance * 1e12),
        ));
    }

    out
}
