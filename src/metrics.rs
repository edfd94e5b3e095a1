//! Glyph bounds and horizontal metrics.
//!
//! Bounds here are the bounds of every point of the outline including curve
//! control points. That can be slightly larger than the true bounds of a
//! curve, and existing fonts built from this artwork were spaced with it, so
//! it is kept.
//!
//! Metrics are resolved per glyph from three tiers, highest priority first:
//! a manual override from the configuration, automatic sidebearings measured
//! from the outline (only when enabled for the run and only for glyphs with
//! outlines), and the font-wide default advance.

use kurbo::{Point, Rect};
use serde::Serialize;

use crate::{config::Config, shape::GlyphShape};

/// The bounding box of a set of points, or `None` if there are none
pub fn control_bounds(points: impl IntoIterator<Item = Point>) -> Option<Rect> {
    let mut points = points.into_iter();
    let first = points.next()?;
    Some(points.fold(Rect::from_points(first, first), |rect, pt| rect.union_pt(pt)))
}

/// Which tier a glyph's metrics came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MetricSource {
    /// An explicit override from the configuration
    Manual,
    /// Measured from the outline with the configured margin
    Auto,
    /// The font-wide default advance
    Default,
}

/// Horizontal metrics of one glyph
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GlyphMetrics {
    pub advance_width: f64,
    pub left_margin: f64,
    pub right_margin: f64,
    pub source: MetricSource,
}

impl GlyphMetrics {
    pub fn manual(advance_width: f64, left_margin: f64, right_margin: f64) -> Self {
        GlyphMetrics {
            advance_width,
            left_margin,
            right_margin,
            source: MetricSource::Manual,
        }
    }

    pub fn default_advance(advance_width: f64) -> Self {
        GlyphMetrics {
            advance_width,
            left_margin: 0.0,
            right_margin: 0.0,
            source: MetricSource::Default,
        }
    }

    /// Metrics which put `margin` on both sides of `bounds`
    pub fn auto(bounds: Rect, margin: f64) -> Self {
        GlyphMetrics {
            advance_width: bounds.width() + 2.0 * margin,
            left_margin: margin,
            right_margin: margin,
            source: MetricSource::Auto,
        }
    }
}

/// Resolve a glyph's metrics, positioning its outline if sidebearings are automatic
///
/// Under automatic sidebearings the contours are shifted so the left edge of
/// their bounds sits exactly at the margin; the shift is part of the final
/// outline. No other tier moves the outline.
pub fn resolve_metrics(glyph: &str, shape: &mut GlyphShape, config: &Config) -> GlyphMetrics {
    if let Some(manual) = config.manual_metrics(glyph) {
        log::debug!("{glyph}: using manual metrics");
        return GlyphMetrics::manual(manual.width, manual.left_margin, manual.right_margin);
    }
    if config.sidebearings.auto {
        // Blank glyphs have no bounds to measure
        if let Some(bounds) = shape.design_bounds.filter(|_| !shape.is_empty()) {
            let margin = config.sidebearings.margin;
            // Two steps, so the leftmost point lands on the margin exactly
            shape.shift_x(-bounds.min_x());
            shape.shift_x(margin);
            let metrics = GlyphMetrics::auto(shape.design_bounds.unwrap_or(bounds), margin);
            log::debug!(
                "{glyph}: auto sidebearings, advance {}",
                metrics.advance_width
            );
            return metrics;
        }
    }
    log::debug!("{glyph}: using default advance");
    GlyphMetrics::default_advance(config.default_advance)
}
