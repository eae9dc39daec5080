use super::{AnalysisMessage, Level};
use crate::magnet::{MagnetComputedResults, PositioningParams, StringPull};

const CLOSE_STRING: f64 = 1.5;
const FAR_STRING: f64 = 5.0;
const WEAK_FIELD: f64 = 0.005;
const HIGH_SENSITIVITY: f64 = 0.8;

pub fn analyze_magnet(
    magnet: Option<&MagnetComputedResults>,
    positioning: Option<&PositioningParams>,
) -> Vec<AnalysisMessage> {
    let mut out = Vec::new();

    if let Some(m) = magnet {
        match m.string_pull_warning {
            StringPull::Strong => out.push(
                AnalysisMessage::new(
                    Level::Danger,
                    "Strong string pull",
                    "The magnet pulls the string enough to cause wolf tones and lost sustain.",
                )
                .with_suggestion("Lower the pickup or use a weaker magnet"),
            ),
            StringPull::Moderate => out.push(
                AnalysisMessage::new(
                    Level::Warning,
                    "Noticeable string pull",
                    "Sustain and intonation may suffer on the wound strings.",
                )
                .with_suggestion("Lower the pickup slightly"),
            ),
            StringPull::Mild => out.push(AnalysisMessage::new(
                Level::Info,
                "Mild string pull",
                "Some magnetic pull on the strings, usually harmless.",
            )),
            StringPull::None => {}
        }

        if m.field_at_string < WEAK_FIELD {
            out.push(AnalysisMessage::new(
                Level::Info,
                "Weak field at the string",
                format!("{:.1} mT at the string gives low output.", m.field_at_string * 1e3),
            ));
        }

        if m.sensitivity_index >= HIGH_SENSITIVITY {
            out.push(AnalysisMessage::new(
                Level::Success,
                "High sensitivity",
                "Magnet and position give a strong, responsive signal.",
            ));
        }
    }

    if let Some(p) = positioning {
        if p.string_distance < CLOSE_STRING {
            out.push(
                AnalysisMessage::new(
                    Level::Warning,
                    "Pickup very close to the strings",
                    format!(
                        "{:.1} mm leaves little room for string travel.",
                        p.string_distance
                    ),
                )
                .with_suggestion("Lower the pickup to at least 1.5 mm"),
            );
        } else if p.string_distance > FAR_STRING {
            out.push(AnalysisMessage::new(
                Level::Info,
                "Pickup far from the strings",
                format!("At {:.1} mm output drops noticeably.", p.string_distance),
            ));
        }
    }

    out
}
