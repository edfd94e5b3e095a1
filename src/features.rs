//! Substitution features for alternate glyphs.
//!
//! Every stylistic set or character variant tag found among the alternates
//! becomes its own feature. `salt` then offers every alternate of a base
//! glyph at once, and `aalt` pulls all of the above together by reference.

use std::collections::BTreeMap;

use serde::Serialize;
use smol_str::SmolStr;

use crate::{glyph::GlyphRecord, identity::FeatureTag};

/// One substitution rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Substitution {
    /// `sub base by replacement;`
    Single { base: SmolStr, replacement: SmolStr },
    /// `sub base from [alternates];`, alternates in tag order
    Choice {
        base: SmolStr,
        alternates: Vec<SmolStr>,
    },
}

impl Substitution {
    fn from_group(base: SmolStr, mut alternates: Vec<SmolStr>) -> Self {
        if alternates.len() == 1 {
            Substitution::Single {
                base,
                replacement: alternates.remove(0),
            }
        } else {
            Substitution::Choice { base, alternates }
        }
    }

    pub fn to_fea(&self) -> String {
        match self {
            Substitution::Single { base, replacement } => format!("sub {base} by {replacement};"),
            Substitution::Choice { base, alternates } => {
                format!("sub {base} from [{}];", alternates.join(" "))
            }
        }
    }
}

/// The rules of one `ssNN` or `cvNN` feature
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feature {
    pub tag: FeatureTag,
    /// Rules ordered by base glyph name
    pub rules: Vec<Substitution>,
}

/// Every generated substitution feature
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeatureSet {
    /// Per-tag features, `ss01` before `ss02` before `cv01`
    pub features: Vec<Feature>,
    /// `salt`: every alternate of each base glyph, across all tags
    pub stylistic_alternates: Vec<Substitution>,
}

impl FeatureSet {
    pub fn is_empty(&self) -> bool {
        self.features.is_empty() && self.stylistic_alternates.is_empty()
    }

    pub fn tags(&self) -> impl Iterator<Item = FeatureTag> + '_ {
        self.features.iter().map(|f| f.tag)
    }

    /// The features `aalt` refers to, in emission order
    pub fn access_all_alternates(&self) -> Vec<SmolStr> {
        if self.is_empty() {
            return vec![];
        }
        self.tags()
            .map(|tag| tag.as_smolstr())
            .chain(std::iter::once(SmolStr::new_static("salt")))
            .collect()
    }

    /// Render as OpenType feature file syntax
    pub fn to_fea(&self) -> String {
        let mut fea = String::new();
        if self.is_empty() {
            return fea;
        }
        let aalt: Vec<String> = self
            .access_all_alternates()
            .iter()
            .map(|name| format!("feature {name};"))
            .collect();
        push_feature(&mut fea, "aalt", &aalt);
        for feature in &self.features {
            let rules: Vec<String> = feature.rules.iter().map(|r| r.to_fea()).collect();
            push_feature(&mut fea, &feature.tag.to_string(), &rules);
        }
        let salt: Vec<String> = self
            .stylistic_alternates
            .iter()
            .map(|r| r.to_fea())
            .collect();
        push_feature(&mut fea, "salt", &salt);
        fea
    }
}

fn push_feature(fea: &mut String, name: &str, statements: &[String]) {
    fea.push_str(&format!("feature {name} {{\n"));
    for statement in statements {
        fea.push_str(&format!("    {statement}\n"));
    }
    fea.push_str(&format!("}} {name};\n\n"));
}

/// Build the substitution features for a set of alternate glyphs
///
/// Records which are not alternates are ignored, so a whole glyph table can
/// be passed in.
pub fn generate<'a>(glyphs: impl IntoIterator<Item = &'a GlyphRecord>) -> FeatureSet {
    let mut by_tag: BTreeMap<FeatureTag, BTreeMap<SmolStr, Vec<SmolStr>>> = BTreeMap::new();
    let mut by_base: BTreeMap<SmolStr, Vec<(FeatureTag, SmolStr)>> = BTreeMap::new();
    for glyph in glyphs {
        let Some(alternate) = &glyph.alternate else {
            continue;
        };
        by_tag
            .entry(alternate.tag)
            .or_default()
            .entry(alternate.base.clone())
            .or_default()
            .push(glyph.name.clone());
        by_base
            .entry(alternate.base.clone())
            .or_default()
            .push((alternate.tag, glyph.name.clone()));
    }

    let features: Vec<Feature> = by_tag
        .into_iter()
        .map(|(tag, groups)| Feature {
            tag,
            rules: groups
                .into_iter()
                .map(|(base, mut alternates)| {
                    alternates.sort();
                    Substitution::from_group(base, alternates)
                })
                .collect(),
        })
        .collect();

    let stylistic_alternates = by_base
        .into_iter()
        .map(|(base, mut tagged)| {
            tagged.sort();
            Substitution::from_group(base, tagged.into_iter().map(|(_, name)| name).collect())
        })
        .collect();

    log::info!("Generated {} alternate features", features.len());
    FeatureSet {
        features,
        stylistic_alternates,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        identity::{glyph_name_for, FeatureKind},
        metrics::GlyphMetrics,
        shape::GlyphShape,
    };
    use pretty_assertions::assert_eq;

    fn alternate(base: char, kind: FeatureKind, ordinal: u8) -> GlyphRecord {
        let tag = FeatureTag::new(kind, ordinal).unwrap();
        let base = glyph_name_for(base);
        GlyphRecord::alternate(
            smol_str::format_smolstr!("{base}.{tag}"),
            base,
            tag,
            GlyphShape::empty(),
            GlyphMetrics::default_advance(600.0),
            None,
        )
    }

    fn single(base: &str, replacement: &str) -> Substitution {
        Substitution::Single {
            base: base.into(),
            replacement: replacement.into(),
        }
    }

    #[test]
    fn test_two_variants_are_two_features() {
        let glyphs = [
            alternate('!', FeatureKind::CharacterVariant, 2),
            alternate('!', FeatureKind::CharacterVariant, 1),
        ];
        let set = generate(&glyphs);
        assert_eq!(set.features.len(), 2);
        assert_eq!(set.features[0].tag.to_string(), "cv01");
        assert_eq!(
            set.features[0].rules,
            vec![single("uni0021", "uni0021.cv01")]
        );
        assert_eq!(set.features[1].tag.to_string(), "cv02");
        assert_eq!(
            set.features[1].rules,
            vec![single("uni0021", "uni0021.cv02")]
        );
        assert_eq!(
            set.stylistic_alternates,
            vec![Substitution::Choice {
                base: "uni0021".into(),
                alternates: vec!["uni0021.cv01".into(), "uni0021.cv02".into()],
            }]
        );
    }

    #[test]
    fn test_single_stylistic_set() {
        let glyphs = [alternate('a', FeatureKind::StylisticSet, 1)];
        let set = generate(&glyphs);
        assert_eq!(set.features.len(), 1);
        assert_eq!(set.features[0].rules, vec![single("uni0061", "uni0061.ss01")]);
        assert_eq!(set.access_all_alternates(), vec!["ss01", "salt"]);
        assert_eq!(
            set.to_fea(),
            "feature aalt {\n    feature ss01;\n    feature salt;\n} aalt;\n\n\
             feature ss01 {\n    sub uni0061 by uni0061.ss01;\n} ss01;\n\n\
             feature salt {\n    sub uni0061 by uni0061.ss01;\n} salt;\n\n"
        );
    }

    #[test]
    fn test_tag_order() {
        let glyphs = [
            alternate('b', FeatureKind::CharacterVariant, 1),
            alternate('a', FeatureKind::StylisticSet, 2),
            alternate('b', FeatureKind::StylisticSet, 1),
            alternate('a', FeatureKind::StylisticSet, 1),
        ];
        let set = generate(&glyphs);
        let tags: Vec<String> = set.tags().map(|t| t.to_string()).collect();
        assert_eq!(tags, vec!["ss01", "ss02", "cv01"]);
        assert_eq!(
            set.features[0].rules,
            vec![
                single("uni0061", "uni0061.ss01"),
                single("uni0062", "uni0062.ss01")
            ]
        );
        assert_eq!(
            set.stylistic_alternates[1].to_fea(),
            "sub uni0062 from [uni0062.ss01 uni0062.cv01];"
        );
    }

    #[test]
    fn test_no_alternates_no_features() {
        let set = generate(std::iter::empty());
        assert!(set.is_empty());
        assert!(set.access_all_alternates().is_empty());
        assert_eq!(set.to_fea(), "");
    }
}
