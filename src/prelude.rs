//! pickupkit prelude.
//!
//! This module contains the most used types and functions that you can
//! import easily as a group.
//!
//! ```
//! use pickupkit::prelude::*;
//!
//! ```

#[doc(no_inline)]
pub use crate::analysis::{analyze, AnalysisInput, AnalysisMessage, Level};

#[doc(no_inline)]
pub use crate::calibration::{Calibration, SweepSpec};

#[doc(no_inline)]
pub use crate::coil::{
    compute_coil_results, CoilComputedResults, CoilGeometry, InsulationBuild, InsulationType,
    StrandType, WindingStyle, WireMaterial, WireParams,
};

#[doc(no_inline)]
pub use crate::complex::Complex;

#[doc(no_inline)]
pub use crate::error::PickupError;

#[doc(no_inline)]
pub use crate::frequency::{generate_log_frequencies, Frequency, FrequencyPoint};

#[doc(no_inline)]
pub use crate::magnet::{MagnetComputedResults, PositioningParams, StringPull};

#[doc(no_inline)]
pub use crate::network::{
    compute_loaded_results, compute_loaded_results_with_transformer, system_response, CoilLoad,
    LoadComputedResults, LoadParams, Unloaded,
};

#[doc(no_inline)]
pub use crate::transformer::{
    compute_transformer_results, CoreMaterial, CoreShape, TransformerComputedResults,
    TransformerParams,
};

#[doc(no_inline)]
pub use crate::unit::{parse_value, Scale};
