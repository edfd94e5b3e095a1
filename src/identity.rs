//! Working out which glyph an artwork file draws, from its file name alone.
//!
//! A file stem is a codepoint token, optionally followed by an alternate
//! suffix:
//!
//! - `U+0041`, `0041` (4 to 6 hex digits) or a single literal character `A`
//!   name the glyph for that codepoint, tried in that order;
//! - `notdef` names the `.notdef` fallback glyph;
//! - a trailing `-ss01`..`-ss20` or `-cv01`..`-cv99` makes the file an
//!   alternate of the glyph named by the rest of the stem.

use std::{fmt, path::Path, sync::LazyLock};

use regex::Regex;
use serde::Serialize;
use smol_str::{format_smolstr, SmolStr};

pub(crate) const NOTDEF: &str = ".notdef";
pub(crate) const SPACE: &str = "space";

#[allow(clippy::unwrap_used)]
static ALTERNATE_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<base>.+)-(?P<kind>ss|cv)(?P<ordinal>[0-9]{2})$").unwrap()
});

#[allow(clippy::unwrap_used)]
static UNICODE_PREFIXED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[Uu]\+(?P<hex>[0-9A-Fa-f]{4,6})$").unwrap());

#[allow(clippy::unwrap_used)]
static BARE_HEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9A-Fa-f]{4,6}$").unwrap());

/// The two kinds of alternate feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum FeatureKind {
    /// `ss01`..`ss20`
    StylisticSet,
    /// `cv01`..`cv99`
    CharacterVariant,
}

impl FeatureKind {
    fn prefix(self) -> &'static str {
        match self {
            FeatureKind::StylisticSet => "ss",
            FeatureKind::CharacterVariant => "cv",
        }
    }

    fn max_ordinal(self) -> u8 {
        match self {
            FeatureKind::StylisticSet => 20,
            FeatureKind::CharacterVariant => 99,
        }
    }
}

/// A stylistic set or character variant feature tag
///
/// Ordered stylistic sets first, then character variants, each by ordinal,
/// which is the order features are emitted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureTag {
    kind: FeatureKind,
    ordinal: u8,
}

impl FeatureTag {
    /// A tag, if the ordinal is valid for the kind
    pub fn new(kind: FeatureKind, ordinal: u8) -> Option<FeatureTag> {
        (1..=kind.max_ordinal())
            .contains(&ordinal)
            .then_some(FeatureTag { kind, ordinal })
    }

    pub fn kind(&self) -> FeatureKind {
        self.kind
    }

    pub fn ordinal(&self) -> u8 {
        self.ordinal
    }

    pub fn as_smolstr(&self) -> SmolStr {
        format_smolstr!("{}{:02}", self.kind.prefix(), self.ordinal)
    }
}

impl fmt::Display for FeatureTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:02}", self.kind.prefix(), self.ordinal)
    }
}

impl Serialize for FeatureTag {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// What an artwork file name says about its glyph
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// A base glyph, with its codepoint (`None` only for `.notdef`)
    Regular {
        glyph: SmolStr,
        codepoint: Option<char>,
    },
    /// An alternate of `base`, reachable through `tag`
    Alternate {
        glyph: SmolStr,
        base: SmolStr,
        tag: FeatureTag,
    },
    /// A name matching none of the patterns
    Unrecognized { reason: String },
}

/// The canonical glyph name for a codepoint
pub fn glyph_name_for(codepoint: char) -> SmolStr {
    if codepoint == ' ' {
        SmolStr::new_static(SPACE)
    } else {
        format_smolstr!("uni{:04X}", codepoint as u32)
    }
}

enum BaseToken {
    Notdef,
    Codepoint(char),
}

fn parse_base_token(token: &str) -> Result<BaseToken, String> {
    if token == "notdef" {
        return Ok(BaseToken::Notdef);
    }
    let hex = if let Some(captures) = UNICODE_PREFIXED.captures(token) {
        captures.name("hex").map(|m| m.as_str())
    } else if BARE_HEX.is_match(token) {
        Some(token)
    } else {
        None
    };
    if let Some(hex) = hex {
        let value = u32::from_str_radix(hex, 16).map_err(|e| e.to_string())?;
        return char::from_u32(value)
            .map(BaseToken::Codepoint)
            .ok_or_else(|| format!("U+{value:04X} is not a Unicode scalar value"));
    }
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(BaseToken::Codepoint(c)),
        _ => Err(
            "expected U+XXXX, 4-6 hex digits, a single character or 'notdef', with an optional -ssNN/-cvNN suffix"
                .to_string(),
        ),
    }
}

/// Classify an artwork file stem (the file name without its extension)
pub fn classify(stem: &str) -> Classification {
    let unrecognized = |reason: String| Classification::Unrecognized { reason };
    if let Some(captures) = ALTERNATE_SUFFIX.captures(stem) {
        let (Some(base), Some(kind), Some(ordinal)) = (
            captures.name("base"),
            captures.name("kind"),
            captures.name("ordinal"),
        ) else {
            return unrecognized("malformed alternate suffix".to_string());
        };
        let kind = if kind.as_str() == "ss" {
            FeatureKind::StylisticSet
        } else {
            FeatureKind::CharacterVariant
        };
        let Some(tag) = ordinal
            .as_str()
            .parse::<u8>()
            .ok()
            .and_then(|n| FeatureTag::new(kind, n))
        else {
            return unrecognized(format!(
                "{}{} is not a valid feature tag",
                kind.prefix(),
                ordinal.as_str()
            ));
        };
        return match parse_base_token(base.as_str()) {
            Ok(BaseToken::Codepoint(c)) => {
                let base = glyph_name_for(c);
                Classification::Alternate {
                    glyph: format_smolstr!("{base}.{tag}"),
                    base,
                    tag,
                }
            }
            Ok(BaseToken::Notdef) => unrecognized(".notdef cannot have alternates".to_string()),
            Err(reason) => unrecognized(reason),
        };
    }
    match parse_base_token(stem) {
        Ok(BaseToken::Notdef) => Classification::Regular {
            glyph: SmolStr::new_static(NOTDEF),
            codepoint: None,
        },
        Ok(BaseToken::Codepoint(c)) => Classification::Regular {
            glyph: glyph_name_for(c),
            codepoint: Some(c),
        },
        Err(reason) => unrecognized(reason),
    }
}

/// Classify an artwork file by its path
pub fn classify_path(path: &Path) -> Classification {
    match path.file_stem().and_then(|s| s.to_str()) {
        Some(stem) => classify(stem),
        None => Classification::Unrecognized {
            reason: "file name is not valid UTF-8".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn regular(glyph: &str, codepoint: Option<char>) -> Classification {
        Classification::Regular {
            glyph: glyph.into(),
            codepoint,
        }
    }

    fn alternate(glyph: &str, base: &str, kind: FeatureKind, ordinal: u8) -> Classification {
        Classification::Alternate {
            glyph: glyph.into(),
            base: base.into(),
            tag: FeatureTag::new(kind, ordinal).unwrap(),
        }
    }

    #[rstest]
    #[case("U+0041", regular("uni0041", Some('A')))]
    #[case("u+00e9", regular("uni00E9", Some('é')))]
    #[case("0041", regular("uni0041", Some('A')))]
    #[case("1F600", regular("uni1F600", Some('😀')))]
    #[case("A", regular("uni0041", Some('A')))]
    #[case("0020", regular("space", Some(' ')))]
    #[case(" ", regular("space", Some(' ')))]
    #[case("notdef", regular(".notdef", None))]
    // Hex wins over a literal reading
    #[case("beef", regular("uniBEEF", Some('\u{BEEF}')))]
    fn test_regular(#[case] stem: &str, #[case] expected: Classification) {
        assert_eq!(classify(stem), expected);
    }

    #[rstest]
    #[case("U+0061-ss01", alternate("uni0061.ss01", "uni0061", FeatureKind::StylisticSet, 1))]
    #[case("0021-cv02", alternate("uni0021.cv02", "uni0021", FeatureKind::CharacterVariant, 2))]
    #[case("g-cv17", alternate("uni0067.cv17", "uni0067", FeatureKind::CharacterVariant, 17))]
    #[case("--ss20", alternate("uni002D.ss20", "uni002D", FeatureKind::StylisticSet, 20))]
    fn test_alternate(#[case] stem: &str, #[case] expected: Classification) {
        assert_eq!(classify(stem), expected);
    }

    #[rstest]
    #[case("hello")]
    #[case("U+D800")]
    #[case("110000")]
    #[case("0041-ss21")]
    #[case("0041-cv00")]
    #[case("notdef-ss01")]
    #[case("AB-ss01")]
    #[case("")]
    fn test_unrecognized(#[case] stem: &str) {
        assert!(matches!(
            classify(stem),
            Classification::Unrecognized { .. }
        ));
    }

    #[test]
    fn test_tag_order_and_display() {
        let ss02 = FeatureTag::new(FeatureKind::StylisticSet, 2).unwrap();
        let ss10 = FeatureTag::new(FeatureKind::StylisticSet, 10).unwrap();
        let cv01 = FeatureTag::new(FeatureKind::CharacterVariant, 1).unwrap();
        let mut tags = vec![cv01, ss10, ss02];
        tags.sort();
        assert_eq!(tags, vec![ss02, ss10, cv01]);
        assert_eq!(ss02.to_string(), "ss02");
        assert_eq!(cv01.as_smolstr(), "cv01");
    }

    #[test]
    fn test_classify_path_uses_stem() {
        assert_eq!(
            classify_path(Path::new("svgs/U+0042.svg")),
            regular("uni0042", Some('B'))
        );
    }
}
