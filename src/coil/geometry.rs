use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Bobbin outline; all dimensions in mm.
///
/// A form with any non-positive dimension is degenerate: every derived
/// quantity is 0.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "form", rename_all = "camelCase")]
pub enum CoilGeometry {
    /// Round bobbin, single pole or rod magnet
    #[serde(rename_all = "camelCase")]
    Cylindrical {
        inner_radius: f64,
        outer_radius: f64,
        height: f64,
    },
    /// Rounded-corner rectangle around a `width × depth` core
    #[serde(rename_all = "camelCase")]
    Rectangular {
        width: f64,
        depth: f64,
        height: f64,
        winding_depth: f64,
    },
    /// Stadium outline of a flatwork bobbin around a row of pole pieces
    #[serde(rename_all = "camelCase")]
    Flatwork {
        width: f64,
        depth: f64,
        height: f64,
        winding_depth: f64,
    },
}

impl Default for CoilGeometry {
    fn default() -> Self {
        CoilGeometry::Cylindrical {
            inner_radius: 3.5,
            outer_radius: 7.0,
            height: 11.0,
        }
    }
}

impl CoilGeometry {
    pub fn is_degenerate(&self) -> bool {
        match *self {
            CoilGeometry::Cylindrical {
                inner_radius,
                outer_radius,
                height,
            } => inner_radius <= 0.0 || outer_radius <= inner_radius || height <= 0.0,
            CoilGeometry::Rectangular {
                width,
                depth,
                height,
                winding_depth,
            }
            | CoilGeometry::Flatwork {
                width,
                depth,
                height,
                winding_depth,
            } => width <= 0.0 || depth <= 0.0 || height <= 0.0 || winding_depth <= 0.0,
        }
    }

    /// Winding length along the magnet axis (mm)
    pub fn height(&self) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        match *self {
            CoilGeometry::Cylindrical { height, .. }
            | CoilGeometry::Rectangular { height, .. }
            | CoilGeometry::Flatwork { height, .. } => height,
        }
    }

    /// Radial build of the winding (mm)
    pub fn winding_depth(&self) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        match *self {
            CoilGeometry::Cylindrical {
                inner_radius,
                outer_radius,
                ..
            } => outer_radius - inner_radius,
            CoilGeometry::Rectangular { winding_depth, .. }
            | CoilGeometry::Flatwork { winding_depth, .. } => winding_depth,
        }
    }

    /// Length of one turn at mid build (mm)
    pub fn mean_turn_length(&self) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        match *self {
            CoilGeometry::Cylindrical {
                inner_radius,
                outer_radius,
                ..
            } => 2.0 * PI * (inner_radius + outer_radius) / 2.0,
            CoilGeometry::Rectangular {
                width,
                depth,
                winding_depth,
                ..
            } => 2.0 * (width + depth) + PI * winding_depth,
            CoilGeometry::Flatwork {
                width,
                depth,
                winding_depth,
                ..
            } => 2.0 * (width - depth).max(0.0) + PI * (depth + winding_depth),
        }
    }

    /// Radius (mm) of the circle with the same mean turn length
    pub fn equivalent_radius(&self) -> f64 {
        self.mean_turn_length() / (2.0 * PI)
    }

    /// Cross-section available to the wire (mm²)
    pub fn window_area(&self) -> f64 {
        self.winding_depth() * self.height()
    }

    /// Volume occupied by the winding (mm³)
    pub fn volume(&self) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        match *self {
            CoilGeometry::Cylindrical {
                inner_radius,
                outer_radius,
                height,
            } => PI * (outer_radius.powi(2) - inner_radius.powi(2)) * height,
            CoilGeometry::Rectangular {
                width,
                depth,
                height,
                winding_depth: t,
            } => (2.0 * (width + depth) * t + PI * t * t) * height,
            CoilGeometry::Flatwork {
                width,
                depth,
                height,
                winding_depth: t,
            } => {
                let straight = 2.0 * (width - depth).max(0.0) * t;
                let ends = PI * ((depth / 2.0 + t).powi(2) - (depth / 2.0).powi(2));
                (straight + ends) * height
            }
        }
    }
}
