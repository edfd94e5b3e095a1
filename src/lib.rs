//! Build font glyphs from a directory of per-glyph SVG artwork.
//!
//! Each file in the artwork directory draws one glyph, and its file name says
//! which: `U+0041.svg`, `0041.svg` and `A.svg` all draw `uni0041`, while
//! `A-ss01.svg` draws its first stylistic set alternate `uni0041.ss01`. A
//! `notdef.svg` is required. The build reads every file, moves its outlines
//! into font design space, works out spacing, and generates the substitution
//! features and kerning which go with the glyphs.
//!
//! ```no_run
//! use svgfont::{build, Config};
//! let font = build("svgs".as_ref(), &Config::default())?;
//! for diagnostic in &font.diagnostics {
//!     eprintln!("{}: {}", diagnostic.subject, diagnostic.message);
//! }
//! # Ok::<(), svgfont::SvgFontError>(())
//! ```
#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod config;
mod diagnostics;
mod error;
pub mod features;
pub mod glyph;
pub mod identity;
pub mod kerning;
pub mod metrics;
mod pipeline;
mod serde_helpers;
pub mod shape;
pub mod svg;
pub mod transform;
#[cfg(feature = "ufo")]
pub mod ufo;

pub use crate::{
    config::{Config, ManualMetrics, SidebearingConfig},
    diagnostics::{Diagnostic, Diagnostics, Severity},
    error::{GeometryError, Issue, SvgFontError},
    features::{FeatureSet, Substitution},
    glyph::{BaseGlyphs, GlyphRecord, GlyphTable},
    identity::{classify, Classification, FeatureKind, FeatureTag},
    kerning::KerningPair,
    metrics::{GlyphMetrics, MetricSource},
    pipeline::{artwork_files, build, build_from_artwork, Artwork, FontBuild, FontInfo},
    shape::{Contour, ContourBuilder, GlyphShape, OutlinePen},
    transform::{ArtworkSpace, YAxis},
};
