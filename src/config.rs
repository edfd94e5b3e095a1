use std::{collections::BTreeMap, path::Path};

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::{transform::YAxis, SvgFontError};

/// Explicit spacing for one glyph
///
/// Used verbatim, taking priority over both auto-calculated and default metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ManualMetrics {
    pub width: f64,
    #[serde(default)]
    pub left_margin: f64,
    #[serde(default)]
    pub right_margin: f64,
}

/// Settings for automatic sidebearings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SidebearingConfig {
    /// Whether auto-calculation is enabled for the run
    pub auto: bool,
    /// Margin placed on both sides of the artwork bounds
    pub margin: f64,
}

impl Default for SidebearingConfig {
    fn default() -> Self {
        SidebearingConfig {
            auto: false,
            margin: 50.0,
        }
    }
}

/// Build configuration
///
/// Unknown keys are ignored and missing keys take their defaults, so an empty
/// JSON object is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub family_name: String,
    pub style_name: String,
    pub units_per_em: u16,
    pub ascender: f64,
    pub descender: f64,
    pub x_height: f64,
    pub cap_height: f64,
    /// Advance width of glyphs which have neither manual nor automatic metrics
    pub default_advance: f64,
    /// Which way the Y axis points in the artwork
    pub y_axis: YAxis,
    /// The artwork Y coordinate which lands on the font baseline
    pub baseline_offset: f64,
    pub sidebearings: SidebearingConfig,
    /// Raise quadratic curves to cubics, for CFF-flavoured output
    pub cubic_only: bool,
    /// Add an empty `space` glyph if no artwork provides U+0020
    pub synthesize_space: bool,
    /// Per-glyph manual metric overrides, keyed by glyph name
    pub glyph_metrics: BTreeMap<SmolStr, ManualMetrics>,
    /// Kerning: left glyph name → right glyph name → adjustment
    pub kerning: BTreeMap<SmolStr, BTreeMap<SmolStr, i16>>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            family_name: "Untitled".to_string(),
            style_name: "Regular".to_string(),
            units_per_em: 1000,
            ascender: 800.0,
            descender: -200.0,
            x_height: 500.0,
            cap_height: 750.0,
            default_advance: 1000.0,
            y_axis: YAxis::Down,
            baseline_offset: 800.0,
            sidebearings: SidebearingConfig::default(),
            cubic_only: true,
            synthesize_space: true,
            glyph_metrics: BTreeMap::new(),
            kerning: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Load a configuration from a JSON file and validate it
    pub fn load(path: impl AsRef<Path>) -> Result<Config, SvgFontError> {
        let buffered = std::io::BufReader::new(std::fs::File::open(path.as_ref())?);
        let config: Config = serde_json::from_reader(buffered)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration from a JSON string and validate it
    pub fn from_json(json: &str) -> Result<Config, SvgFontError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the values serde cannot check for us
    pub fn validate(&self) -> Result<(), SvgFontError> {
        let invalid = |key: &str, reason: String| SvgFontError::InvalidConfig {
            key: key.to_string(),
            reason,
        };
        if !(16..=16384).contains(&self.units_per_em) {
            return Err(invalid(
                "units_per_em",
                format!("{} is outside 16..=16384", self.units_per_em),
            ));
        }
        if !self.default_advance.is_finite() || self.default_advance < 0.0 {
            return Err(invalid(
                "default_advance",
                format!("{} is not a non-negative number", self.default_advance),
            ));
        }
        if !self.baseline_offset.is_finite() {
            return Err(invalid("baseline_offset", "must be finite".to_string()));
        }
        let margin = self.sidebearings.margin;
        if !margin.is_finite() || margin < 0.0 {
            return Err(invalid(
                "sidebearings.margin",
                format!("{} is not a non-negative number", margin),
            ));
        }
        for (glyph, metrics) in &self.glyph_metrics {
            let values = [metrics.width, metrics.left_margin, metrics.right_margin];
            if values.iter().any(|v| !v.is_finite()) || metrics.width < 0.0 {
                return Err(invalid(
                    "glyph_metrics",
                    format!("metrics for {glyph} must be finite with a non-negative width"),
                ));
            }
        }
        Ok(())
    }

    /// The manual override for a glyph, if one is configured
    pub fn manual_metrics(&self, glyph: &str) -> Option<ManualMetrics> {
        self.glyph_metrics.get(glyph).copied()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(Config::from_json("{}").unwrap(), Config::default());
    }

    #[test]
    fn test_unknown_keys_ignored_and_partial_sections() {
        let config = Config::from_json(
            r#"{
                "frobnicate": true,
                "y_axis": "up",
                "baseline_offset": 200,
                "sidebearings": {"auto": true},
                "glyph_metrics": {"space": {"width": 250}},
                "kerning": {"uni0041": {"uni0056": -80}}
            }"#,
        )
        .unwrap();
        assert_eq!(config.y_axis, YAxis::Up);
        assert_eq!(config.baseline_offset, 200.0);
        assert!(config.sidebearings.auto);
        assert_eq!(config.sidebearings.margin, 50.0);
        assert_eq!(
            config.manual_metrics("space"),
            Some(ManualMetrics {
                width: 250.0,
                left_margin: 0.0,
                right_margin: 0.0
            })
        );
        assert_eq!(config.kerning["uni0041"]["uni0056"], -80);
    }

    #[test]
    fn test_validation() {
        assert!(matches!(
            Config::from_json(r#"{"units_per_em": 4}"#),
            Err(SvgFontError::InvalidConfig { key, .. }) if key == "units_per_em"
        ));
        assert!(matches!(
            Config::from_json(r#"{"sidebearings": {"margin": -5}}"#),
            Err(SvgFontError::InvalidConfig { key, .. }) if key == "sidebearings.margin"
        ));
        assert!(matches!(
            Config::from_json(r#"{"y_axis": "sideways"}"#),
            Err(SvgFontError::Json(_))
        ));
    }
}
