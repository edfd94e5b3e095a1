use std::collections::BTreeMap;

use serde::Serialize;
use smol_str::SmolStr;

use crate::{diagnostics::Diagnostics, glyph::GlyphTable, Issue};

/// A kerning adjustment between two glyphs, in font units
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KerningPair {
    pub left: SmolStr,
    pub right: SmolStr,
    pub value: i16,
}

/// Check configured kerning against the glyph table
///
/// A pair naming a glyph which does not exist is dropped with a warning.
/// The surviving pairs come out sorted by left then right glyph name.
pub fn integrate(
    kerning: &BTreeMap<SmolStr, BTreeMap<SmolStr, i16>>,
    glyphs: &GlyphTable,
    diagnostics: &mut Diagnostics,
) -> Vec<KerningPair> {
    let mut pairs = vec![];
    for (left, rights) in kerning {
        for (right, value) in rights {
            let missing: Vec<&str> = [left, right]
                .into_iter()
                .filter(|name| !glyphs.contains(name))
                .map(|name| name.as_str())
                .collect();
            if !missing.is_empty() {
                diagnostics.push(Issue::UnresolvedKerningReference {
                    left: left.to_string(),
                    right: right.to_string(),
                    missing: missing.join(", "),
                });
                continue;
            }
            pairs.push(KerningPair {
                left: left.clone(),
                right: right.clone(),
                value: *value,
            });
        }
    }
    log::info!("{} kerning pairs", pairs.len());
    pairs
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        diagnostics::Severity,
        glyph::{BaseGlyphs, GlyphRecord},
        metrics::GlyphMetrics,
        shape::GlyphShape,
    };
    use pretty_assertions::assert_eq;

    fn table(names: &[&str]) -> GlyphTable {
        let mut bases = BaseGlyphs::new();
        for name in names {
            bases
                .register(GlyphRecord::regular(
                    (*name).into(),
                    None,
                    GlyphShape::empty(),
                    GlyphMetrics::default_advance(500.0),
                    None,
                ))
                .unwrap();
        }
        bases.seal()
    }

    fn kerning(entries: &[(&str, &str, i16)]) -> BTreeMap<SmolStr, BTreeMap<SmolStr, i16>> {
        let mut map: BTreeMap<SmolStr, BTreeMap<SmolStr, i16>> = BTreeMap::new();
        for (left, right, value) in entries {
            map.entry((*left).into())
                .or_default()
                .insert((*right).into(), *value);
        }
        map
    }

    fn pair(left: &str, right: &str, value: i16) -> KerningPair {
        KerningPair {
            left: left.into(),
            right: right.into(),
            value,
        }
    }

    #[test]
    fn test_unknown_glyph_drops_only_that_pair() {
        let glyphs = table(&["uni0041", "uni0056", "uni0054", "uni006F"]);
        let kerning = kerning(&[
            ("uni0056", "uni0041", -80),
            ("uni0041", "uni0056", -75),
            ("uni0054", "uni006F", -60),
            ("uni0041", "uni00C5", -70),
        ]);
        let mut diagnostics = Diagnostics::new();
        let pairs = integrate(&kerning, &glyphs, &mut diagnostics);
        assert_eq!(
            pairs,
            vec![
                pair("uni0041", "uni0056", -75),
                pair("uni0054", "uni006F", -60),
                pair("uni0056", "uni0041", -80),
            ]
        );
        assert_eq!(diagnostics.len(), 1);
        let diagnostic = diagnostics.iter().next().unwrap();
        assert_eq!(diagnostic.severity, Severity::Warning);
        assert_eq!(diagnostic.subject, "uni0041 uni00C5");
        assert!(!diagnostics.has_errors());
    }

    #[test]
    fn test_both_sides_missing_is_one_warning() {
        let glyphs = table(&["uni0041"]);
        let kerning = kerning(&[("x", "y", 10)]);
        let mut diagnostics = Diagnostics::new();
        assert!(integrate(&kerning, &glyphs, &mut diagnostics).is_empty());
        assert_eq!(
            diagnostics.issues().collect::<Vec<_>>(),
            vec![&Issue::UnresolvedKerningReference {
                left: "x".into(),
                right: "y".into(),
                missing: "x, y".into(),
            }]
        );
    }
}
