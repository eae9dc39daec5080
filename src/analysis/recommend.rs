use super::{AnalysisMessage, Level};
use crate::coil::CoilComputedResults;
use crate::network::LoadParams;

const BUFFER_DCR: f64 = 12e3;
const BUFFER_CABLE_CAPACITANCE: f64 = 1e-9;

/// Cross-cutting advice, given the messages the other analyzers produced
pub fn analyze_recommendations(
    coil: &CoilComputedResults,
    load: Option<&LoadParams>,
    prior: &[AnalysisMessage],
) -> Vec<AnalysisMessage> {
    let mut out = Vec::new();

    if let Some(load) = load {
        if coil.dc_resistance > BUFFER_DCR
            && load.total_cable_capacitance() > BUFFER_CABLE_CAPACITANCE
        {
            out.push(
                AnalysisMessage::new(
                    Level::Warning,
                    "Buffer recommended",
                    "A high-impedance coil into a long cable loses most of its treble.",
                )
                .with_suggestion("Add an onboard buffer or use a shorter cable"),
            );
        }
    }

    if !prior.iter().chain(out.iter()).any(|m| m.level.is_problem()) {
        out.push(AnalysisMessage::new(
            Level::Success,
            "Balanced design",
            "No problems found in the coil, magnet or load.",
        ));
    }

    out
}
