//! The whole build, from a directory of artwork to glyphs, features and kerning.
//!
//! Each artwork file goes through its own independent stage (read, classify,
//! parse, transform, measure), in parallel when the `rayon` feature is on.
//! Results are then registered one at a time, in file name order: base
//! glyphs first, then alternates once every base glyph is known. Features
//! and kerning are worked out only after registration is complete.

use std::{
    borrow::Cow,
    fs, io,
    path::{Path, PathBuf},
};

#[cfg(feature = "rayon")]
use rayon::prelude::*;
use serde::Serialize;

use crate::{
    config::Config,
    diagnostics::Diagnostics,
    features::{self, FeatureSet},
    glyph::{BaseGlyphs, GlyphRecord, GlyphTable},
    identity::{classify_path, Classification, NOTDEF, SPACE},
    kerning::{self, KerningPair},
    metrics::resolve_metrics,
    shape::{shape_bounds, Contour, GlyphShape},
    svg::parse_svg,
    transform::ArtworkSpace,
    Issue, SvgFontError,
};

/// One artwork file
///
/// Either read from disk when the build gets to it, or supplied in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct Artwork {
    pub path: PathBuf,
    svg: Option<String>,
}

impl Artwork {
    /// Artwork to be read from `path` during the build
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Artwork {
            path: path.into(),
            svg: None,
        }
    }

    /// Artwork already in memory; `path` is still used to name the glyph
    pub fn from_svg(path: impl Into<PathBuf>, svg: impl Into<String>) -> Self {
        Artwork {
            path: path.into(),
            svg: Some(svg.into()),
        }
    }

    fn load(&self) -> io::Result<Cow<'_, str>> {
        match &self.svg {
            Some(svg) => Ok(Cow::Borrowed(svg)),
            None => fs::read_to_string(&self.path).map(Cow::Owned),
        }
    }
}

/// Font-wide values handed on to the assembler untouched
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FontInfo {
    pub family_name: String,
    pub style_name: String,
    pub units_per_em: u16,
    pub ascender: f64,
    pub descender: f64,
    pub x_height: f64,
    pub cap_height: f64,
}

impl From<&Config> for FontInfo {
    fn from(config: &Config) -> Self {
        FontInfo {
            family_name: config.family_name.clone(),
            style_name: config.style_name.clone(),
            units_per_em: config.units_per_em,
            ascender: config.ascender,
            descender: config.descender,
            x_height: config.x_height,
            cap_height: config.cap_height,
        }
    }
}

/// Everything the font assembler needs
#[derive(Debug, Clone, Serialize)]
pub struct FontBuild {
    pub font_info: FontInfo,
    /// Glyphs in glyph order
    pub glyphs: Vec<GlyphRecord>,
    pub features: FeatureSet,
    pub kerning: Vec<KerningPair>,
    pub diagnostics: Diagnostics,
}

impl FontBuild {
    pub fn glyph(&self, name: &str) -> Option<&GlyphRecord> {
        self.glyphs.iter().find(|g| g.name == name)
    }

    pub fn glyph_order(&self) -> Vec<&str> {
        self.glyphs.iter().map(|g| g.name.as_str()).collect()
    }

    pub fn to_json(&self) -> Result<String, SvgFontError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// List the `.svg` files of an artwork directory, sorted by name
pub fn artwork_files(dir: &Path) -> Result<Vec<PathBuf>, SvgFontError> {
    let wrap = |source: io::Error| SvgFontError::ArtworkDirectory {
        path: dir.to_path_buf(),
        source,
    };
    let mut files = vec![];
    for entry in fs::read_dir(dir).map_err(wrap)? {
        let path = entry.map_err(wrap)?.path();
        if path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
        {
            files.push(path);
        }
    }
    files.sort();
    log::info!("Found {} artwork files in {}", files.len(), dir.display());
    Ok(files)
}

/// Build a font from every `.svg` file in `dir`
pub fn build(dir: &Path, config: &Config) -> Result<FontBuild, SvgFontError> {
    let artwork = artwork_files(dir)?
        .into_iter()
        .map(Artwork::from_file)
        .collect();
    build_from_artwork(artwork, config)
}

/// Build a font from a set of artwork files
///
/// Fails only if the configuration is invalid or no artwork provides
/// `.notdef`; every other problem is recorded in the diagnostics and the
/// offending file or kerning pair is left out.
pub fn build_from_artwork(
    mut artwork: Vec<Artwork>,
    config: &Config,
) -> Result<FontBuild, SvgFontError> {
    config.validate()?;
    artwork.sort_by(|a, b| a.path.cmp(&b.path));
    let space = ArtworkSpace::new(config.y_axis, config.baseline_offset);
    let mut diagnostics = Diagnostics::new();

    let processed = process_all(&artwork, config, &space);

    // Phase one: base glyphs
    let mut bases = BaseGlyphs::new();
    let mut alternates = vec![];
    for result in processed {
        match result {
            Ok(record) if record.is_alternate() => alternates.push(record),
            Ok(record) => {
                if let Err(issue) = bases.register(record) {
                    diagnostics.push(issue);
                }
            }
            Err(issue) => diagnostics.push(issue),
        }
    }
    if config.synthesize_space && !bases.contains(SPACE) {
        log::info!("No artwork for U+0020, adding an empty space glyph");
        let mut shape = GlyphShape::empty();
        let metrics = resolve_metrics(SPACE, &mut shape, config);
        if let Err(issue) = bases.register(GlyphRecord::regular(
            SPACE.into(),
            Some(' '),
            shape,
            metrics,
            None,
        )) {
            diagnostics.push(issue);
        }
    }
    if !bases.contains(NOTDEF) {
        return Err(SvgFontError::MissingRequiredGlyph);
    }

    // Phase two: alternates, now that every base glyph is known
    let mut table = bases.seal();
    for record in alternates {
        if let Err(issue) = table.register_alternate(record) {
            diagnostics.push(issue);
        }
    }

    Ok(finish(table, config, diagnostics))
}

fn finish(table: GlyphTable, config: &Config, mut diagnostics: Diagnostics) -> FontBuild {
    let features = features::generate(table.alternates());
    let kerning = kerning::integrate(&config.kerning, &table, &mut diagnostics);
    let glyphs = table.into_ordered_records();
    log::info!(
        "Built {} glyphs with {} issues",
        glyphs.len(),
        diagnostics.len()
    );
    FontBuild {
        font_info: FontInfo::from(config),
        glyphs,
        features,
        kerning,
        diagnostics,
    }
}

fn process_all(
    artwork: &[Artwork],
    config: &Config,
    space: &ArtworkSpace,
) -> Vec<Result<GlyphRecord, Issue>> {
    #[cfg(feature = "rayon")]
    let iter = artwork.par_iter();
    #[cfg(not(feature = "rayon"))]
    let iter = artwork.iter();
    iter.map(|file| process(file, config, space)).collect()
}

/// The independent per-file stage
fn process(artwork: &Artwork, config: &Config, space: &ArtworkSpace) -> Result<GlyphRecord, Issue> {
    let path = &artwork.path;
    let classification = classify_path(path);
    let (glyph, codepoint) = match &classification {
        Classification::Unrecognized { reason } => {
            return Err(Issue::UnrecognizedFilename {
                path: path.clone(),
                reason: reason.clone(),
            })
        }
        Classification::Regular { glyph, codepoint } => (glyph.clone(), *codepoint),
        Classification::Alternate { glyph, .. } => (glyph.clone(), None),
    };
    let geometry_error = |reason: String| Issue::GeometryParse {
        path: path.clone(),
        reason,
    };
    let source = artwork
        .load()
        .map_err(|e| geometry_error(format!("could not read file: {e}")))?;
    let contours = parse_svg(&source).map_err(|e| geometry_error(e.to_string()))?;
    let artwork_bounds = shape_bounds(&contours);
    let contours: Vec<Contour> = contours
        .iter()
        .map(|contour| {
            let contour = space.contour_to_design(contour);
            if config.cubic_only {
                contour.raise_quadratics()
            } else {
                contour
            }
        })
        .collect();
    let mut shape = GlyphShape::new(contours, artwork_bounds);

    let metrics = resolve_metrics(&glyph, &mut shape, config);
    let source = Some(path.clone());
    let record = if let Classification::Alternate { base, tag, .. } = classification {
        GlyphRecord::alternate(glyph, base, tag, shape, metrics, source)
    } else {
        GlyphRecord::regular(glyph, codepoint, shape, metrics, source)
    };
    log::debug!(
        "{} -> {} ({} contours)",
        path.display(),
        record.name,
        record.shape.contours.len()
    );
    Ok(record)
}

