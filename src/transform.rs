//! Mapping artwork coordinates into font design space.
//!
//! Design space has the baseline at y = 0 with y increasing upward. The x
//! coordinate is never changed. Every transform here is affine, so curve
//! control points map exactly like on-curve points.

use kurbo::{Affine, Point};
use serde::{Deserialize, Serialize};

use crate::shape::Contour;

/// Direction of the artwork's vertical axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YAxis {
    /// y grows toward the bottom of the page, as in SVG
    #[default]
    Down,
    /// y grows toward the top of the page
    Up,
}

impl YAxis {
    /// The opposite direction
    pub fn inverted(self) -> YAxis {
        match self {
            YAxis::Down => YAxis::Up,
            YAxis::Up => YAxis::Down,
        }
    }
}

/// The coordinate system of a set of artwork files
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArtworkSpace {
    pub y_axis: YAxis,
    /// The artwork y coordinate of the font baseline
    pub baseline: f64,
}

impl ArtworkSpace {
    pub fn new(y_axis: YAxis, baseline: f64) -> Self {
        ArtworkSpace { y_axis, baseline }
    }

    /// The affine map from artwork space to design space
    pub fn to_design(&self) -> Affine {
        match self.y_axis {
            // y' = baseline - y
            YAxis::Down => Affine::new([1.0, 0.0, 0.0, -1.0, 0.0, self.baseline]),
            // y' = y - baseline
            YAxis::Up => Affine::translate((0.0, -self.baseline)),
        }
    }

    /// The affine map from design space back to artwork space
    pub fn to_artwork(&self) -> Affine {
        match self.y_axis {
            // Flipping about the baseline is its own inverse
            YAxis::Down => self.to_design(),
            YAxis::Up => Affine::translate((0.0, self.baseline)),
        }
    }

    pub fn point_to_design(&self, point: Point) -> Point {
        self.to_design() * point
    }

    pub fn point_to_artwork(&self, point: Point) -> Point {
        self.to_artwork() * point
    }

    /// Move a contour from artwork space into design space
    pub fn contour_to_design(&self, contour: &Contour) -> Contour {
        contour.transformed(self.to_design())
    }

    /// Move a contour from design space back into artwork space
    pub fn contour_to_artwork(&self, contour: &Contour) -> Contour {
        contour.transformed(self.to_artwork())
    }
}
