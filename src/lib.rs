//! Lumped-element model of a magnetic guitar pickup: coil, optional
//! transformer and downstream load, with frequency response, loaded
//! resonance and rule-based diagnostics.
pub mod analysis;
pub mod calibration;
pub mod coil;
pub mod complex;
pub mod consts;
pub mod error;
pub mod frequency;
pub mod magnet;
pub mod minimize;
pub mod network;
pub mod prelude;
pub mod transformer;
pub mod unit;
