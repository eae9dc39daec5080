//! Rule-based diagnostics over computed results.
//!
//! Each sub-analyzer appends messages from fixed thresholds; `analyze` runs
//! them in order (coil, magnet, load, transformer, recommendations) and
//! stable-sorts the list by severity.

pub mod coil;
pub mod load;
pub mod magnet;
pub mod recommend;

pub use self::coil::analyze_coil;
pub use self::load::{analyze_load, analyze_transformer};
pub use self::magnet::analyze_magnet;
pub use self::recommend::analyze_recommendations;

use crate::calibration::Calibration;
use crate::coil::{CoilComputedResults, WireParams};
use crate::magnet::{MagnetComputedResults, PositioningParams};
use crate::network::{
    compute_loaded_results, compute_loaded_results_with_transformer, LoadComputedResults,
    LoadParams,
};
use crate::transformer::{compute_transformer_results, TransformerParams};
use serde::Serialize;
use std::fmt;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Danger,
    Warning,
    Info,
    Success,
}

impl Level {
    /// Sort key, most severe first
    pub fn rank(&self) -> u8 {
        match self {
            Level::Danger => 0,
            Level::Warning => 1,
            Level::Info => 2,
            Level::Success => 3,
        }
    }

    pub fn to_str(&self) -> &str {
        match self {
            Level::Danger => "danger",
            Level::Warning => "warning",
            Level::Info => "info",
            Level::Success => "success",
        }
    }

    pub fn is_problem(&self) -> bool {
        matches!(self, Level::Danger | Level::Warning)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMessage {
    pub level: Level,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl AnalysisMessage {
    pub fn new(level: Level, title: impl Into<String>, description: impl Into<String>) -> Self {
        AnalysisMessage {
            level,
            title: title.into(),
            description: description.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Everything the analyzer may look at; only the coil is required
#[derive(Clone, Copy, Debug)]
pub struct AnalysisInput<'a> {
    pub wire: &'a WireParams,
    pub coil: &'a CoilComputedResults,
    pub magnet: Option<&'a MagnetComputedResults>,
    pub positioning: Option<&'a PositioningParams>,
    pub load: Option<&'a LoadParams>,
    /// Loaded figures already computed without a transformer
    pub load_results: Option<&'a LoadComputedResults>,
    pub transformer: Option<&'a TransformerParams>,
}

impl<'a> AnalysisInput<'a> {
    pub fn new(wire: &'a WireParams, coil: &'a CoilComputedResults) -> Self {
        AnalysisInput {
            wire,
            coil,
            magnet: None,
            positioning: None,
            load: None,
            load_results: None,
            transformer: None,
        }
    }

    fn enabled_transformer(&self) -> Option<&'a TransformerParams> {
        self.transformer.filter(|t| t.enabled)
    }
}

/// Stable sort by `Level::rank`; equal levels keep their order
pub fn sort_by_severity(messages: &mut [AnalysisMessage]) {
    messages.sort_by_key(|m| m.level.rank());
}

pub fn analyze(input: &AnalysisInput, cal: &Calibration) -> Vec<AnalysisMessage> {
    let mut messages = analyze_coil(input.wire, input.coil);
    messages.extend(analyze_magnet(input.magnet, input.positioning));

    let transformer = input.enabled_transformer();
    if let Some(load) = input.load {
        // with a transformer in circuit the loaded figures go through it
        let results = match (transformer, input.load_results) {
            (Some(t), _) => compute_loaded_results_with_transformer(input.coil, load, t, cal),
            (None, Some(r)) => r.clone(),
            (None, None) => compute_loaded_results(input.coil, load, cal),
        };
        messages.extend(analyze_load(load, &results));
    }
    if let Some(t) = transformer {
        let results = compute_transformer_results(t, input.load, cal);
        messages.extend(analyze_transformer(&results));
    }

    let recommendations = analyze_recommendations(input.coil, input.load, &messages);
    messages.extend(recommendations);

    sort_by_severity(&mut messages);
    debug!(n_messages = messages.len(), "analysis");
    messages
}
