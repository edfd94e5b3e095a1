//! Handing a build to the font assembler as a UFO source.

use std::path::Path;

use kurbo::{PathEl, Point};
use norad::{ContourPoint, PointType};

use crate::{
    glyph::GlyphRecord,
    kerning::KerningPair,
    pipeline::{FontBuild, FontInfo},
    shape::Contour,
    SvgFontError,
};

/// Convert a build into an in-memory UFO
pub fn to_norad(build: &FontBuild) -> Result<norad::Font, SvgFontError> {
    let mut ufo = norad::Font::new();
    for record in &build.glyphs {
        ufo.default_layer_mut().insert_glyph(save_glyph(record));
    }
    save_kerning(&mut ufo.kerning, &build.kerning)?;
    save_info(&mut ufo.font_info, &build.font_info);
    ufo.lib = serde_json::from_value::<norad::Plist>(serde_json::json!({
        "public.glyphOrder": build.glyph_order(),
    }))?;
    ufo.features = build.features.to_fea();
    Ok(ufo)
}

/// Write a build to disk as a UFO
pub fn save(build: &FontBuild, path: impl AsRef<Path>) -> Result<(), SvgFontError> {
    let ufo = to_norad(build)?;
    ufo.save(path.as_ref())?;
    log::info!("Wrote {}", path.as_ref().display());
    Ok(())
}

fn save_glyph(record: &GlyphRecord) -> norad::Glyph {
    let mut glyph = norad::Glyph::new(record.name.as_str());
    glyph.width = record.metrics.advance_width;
    if let Some(codepoint) = record.codepoint {
        glyph.codepoints.insert(codepoint);
    }
    for contour in &record.shape.contours {
        glyph.contours.push(save_contour(contour));
    }
    glyph
}

fn contour_point(p: Point, typ: PointType) -> ContourPoint {
    ContourPoint::new(p.x, p.y, typ, false, None, None)
}

/// Convert a closed contour to UFO points
///
/// UFO contours are cyclic: the start point is written once, typed by the
/// segment which closes onto it.
pub(crate) fn save_contour(contour: &Contour) -> norad::Contour {
    let start = contour.start();
    let mut points = vec![];
    let mut closing = PointType::Line;
    for el in contour.elements() {
        match *el {
            PathEl::LineTo(p) => points.push(contour_point(p, PointType::Line)),
            PathEl::QuadTo(c, p) => {
                points.push(contour_point(c, PointType::OffCurve));
                points.push(contour_point(p, PointType::QCurve));
            }
            PathEl::CurveTo(c0, c1, p) => {
                points.push(contour_point(c0, PointType::OffCurve));
                points.push(contour_point(c1, PointType::OffCurve));
                points.push(contour_point(p, PointType::Curve));
            }
            PathEl::MoveTo(_) | PathEl::ClosePath => {}
        }
    }
    // An explicit segment back to the start replaces the implicit one
    if let Some(last) = points.last() {
        if last.typ != PointType::OffCurve && last.x == start.x && last.y == start.y {
            closing = last.typ.clone();
            points.pop();
        }
    }
    points.insert(0, contour_point(start, closing));
    norad::Contour::new(points, None)
}

fn save_kerning(
    norad_kerning: &mut norad::Kerning,
    pairs: &[KerningPair],
) -> Result<(), SvgFontError> {
    for pair in pairs {
        norad_kerning
            .entry(norad::Name::new(pair.left.as_str())?)
            .or_default()
            .insert(norad::Name::new(pair.right.as_str())?, pair.value as f64);
    }
    Ok(())
}

fn save_info(info: &mut norad::FontInfo, font_info: &FontInfo) {
    info.family_name = Some(font_info.family_name.clone());
    info.style_name = Some(font_info.style_name.clone());
    info.units_per_em = Some((font_info.units_per_em as u32).into());
    info.ascender = Some(font_info.ascender);
    info.descender = Some(font_info.descender);
    info.x_height = Some(font_info.x_height);
    info.cap_height = Some(font_info.cap_height);
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        config::Config,
        pipeline::{build_from_artwork, Artwork},
        shape::{ContourBuilder, OutlinePen},
    };
    use pretty_assertions::assert_eq;

    const SQUARE: &str = r#"<svg xmlns="http://www.w3.org/2000/svg"><path d="M100 700 L500 700 L500 300 L100 300 Z"/></svg>"#;

    fn sample_build() -> FontBuild {
        let mut config = Config::default();
        config.kerning.entry("uni0041".into()).or_default().insert("uni0042".into(), -40);
        build_from_artwork(
            vec![
                Artwork::from_svg("notdef.svg", SQUARE),
                Artwork::from_svg("A.svg", SQUARE),
                Artwork::from_svg("B.svg", SQUARE),
                Artwork::from_svg("A-ss01.svg", SQUARE),
            ],
            &config,
        )
        .unwrap()
    }

    #[test]
    fn test_to_norad() {
        let build = sample_build();
        let ufo = to_norad(&build).unwrap();
        let layer = ufo.default_layer();
        assert_eq!(layer.len(), 5);
        let a = layer.get_glyph("uni0041").unwrap();
        assert_eq!(a.width, 1000.0);
        assert_eq!(a.codepoints.iter().collect::<Vec<char>>(), vec!['A']);
        assert_eq!(a.contours.len(), 1);
        assert_eq!(a.contours[0].points.len(), 4);
        assert!(layer.get_glyph("uni0041.ss01").unwrap().codepoints.is_empty());
        assert_eq!(
            ufo.kerning
                .get(&norad::Name::new("uni0041").unwrap())
                .and_then(|r| r.get(&norad::Name::new("uni0042").unwrap()))
                .copied(),
            Some(-40.0)
        );
        assert!(ufo.features.contains("sub uni0041 by uni0041.ss01;"));
        let order: Vec<&str> = ufo
            .lib
            .get("public.glyphOrder")
            .and_then(|v| v.as_array())
            .unwrap()
            .iter()
            .flat_map(|v| v.as_string())
            .collect();
        assert_eq!(
            order,
            vec![".notdef", "space", "uni0041", "uni0042", "uni0041.ss01"]
        );
        assert_eq!(ufo.font_info.ascender, Some(800.0));
    }

    #[test]
    fn test_closing_curve_types_start_point() {
        let mut pen = ContourBuilder::new();
        pen.move_to(0.0, 0.0);
        pen.line_to(100.0, 0.0);
        pen.curve_to(100.0, 100.0, 0.0, 100.0, 0.0, 0.0);
        pen.close();
        let contour = save_contour(&pen.build().remove(0));
        let types: Vec<PointType> = contour.points.iter().map(|p| p.typ.clone()).collect();
        assert_eq!(
            types,
            vec![
                PointType::Curve,
                PointType::Line,
                PointType::OffCurve,
                PointType::OffCurve
            ]
        );
    }

    #[test]
    fn test_save_and_reload() {
        let build = sample_build();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Test.ufo");
        save(&build, &path).unwrap();
        let reloaded = norad::Font::load(&path).unwrap();
        assert_eq!(reloaded.default_layer().len(), 5);
        assert_eq!(reloaded.font_info.family_name.as_deref(), Some("Untitled"));
    }
}
