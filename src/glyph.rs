use std::path::PathBuf;

use indexmap::IndexMap;
use serde::Serialize;
use smol_str::SmolStr;

use crate::{
    identity::{FeatureTag, NOTDEF, SPACE},
    metrics::GlyphMetrics,
    shape::GlyphShape,
    Issue,
};

/// Where an alternate glyph plugs into the substitution features
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlternateOf {
    /// The base glyph this alternate replaces
    pub base: SmolStr,
    pub tag: FeatureTag,
}

/// A resolved glyph, ready for assembly
///
/// Alternates never carry a codepoint; use [`GlyphRecord::regular`] and
/// [`GlyphRecord::alternate`] to keep it that way.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlyphRecord {
    pub name: SmolStr,
    pub codepoint: Option<char>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternate: Option<AlternateOf>,
    #[serde(rename = "contours", serialize_with = "crate::serde_helpers::shape_as_svg")]
    pub shape: GlyphShape,
    pub metrics: GlyphMetrics,
    /// The artwork file, or `None` for synthesized glyphs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
}

impl GlyphRecord {
    pub fn regular(
        name: SmolStr,
        codepoint: Option<char>,
        shape: GlyphShape,
        metrics: GlyphMetrics,
        source: Option<PathBuf>,
    ) -> Self {
        GlyphRecord {
            name,
            codepoint,
            alternate: None,
            shape,
            metrics,
            source,
        }
    }

    pub fn alternate(
        name: SmolStr,
        base: SmolStr,
        tag: FeatureTag,
        shape: GlyphShape,
        metrics: GlyphMetrics,
        source: Option<PathBuf>,
    ) -> Self {
        GlyphRecord {
            name,
            codepoint: None,
            alternate: Some(AlternateOf { base, tag }),
            shape,
            metrics,
            source,
        }
    }

    pub fn is_alternate(&self) -> bool {
        self.alternate.is_some()
    }

    fn source_path(&self) -> PathBuf {
        self.source.clone().unwrap_or_default()
    }
}

fn duplicate(existing: &GlyphRecord, rejected: &GlyphRecord) -> Issue {
    Issue::DuplicateGlyph {
        glyph: rejected.name.to_string(),
        path: rejected.source_path(),
        first: existing.source_path(),
    }
}

/// First registration phase: base glyphs only
///
/// A glyph name is registered at most once. A later record with the same
/// name is rejected and the first one kept. Registration takes `&mut self`,
/// so the check and the insert cannot interleave with another registration.
#[derive(Debug, Clone, Default)]
pub struct BaseGlyphs {
    records: IndexMap<SmolStr, GlyphRecord>,
}

impl BaseGlyphs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a base glyph, rejecting duplicate names
    pub fn register(&mut self, record: GlyphRecord) -> Result<(), Issue> {
        debug_assert!(!record.is_alternate(), "alternates register after sealing");
        if let Some(existing) = self.records.get(&record.name) {
            return Err(duplicate(existing, &record));
        }
        log::debug!("Registered {}", record.name);
        self.records.insert(record.name.clone(), record);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Close the base phase; from here on only alternates can be added
    pub fn seal(self) -> GlyphTable {
        log::info!("{} base glyphs registered", self.records.len());
        GlyphTable {
            records: self.records,
        }
    }
}

/// Second registration phase: every base glyph is known, alternates join
#[derive(Debug, Clone, Default)]
pub struct GlyphTable {
    records: IndexMap<SmolStr, GlyphRecord>,
}

impl GlyphTable {
    /// Register an alternate; its base glyph must already be present
    ///
    /// A record which is not an alternate only gets the duplicate check.
    pub fn register_alternate(&mut self, record: GlyphRecord) -> Result<(), Issue> {
        if let Some(existing) = self.records.get(&record.name) {
            return Err(duplicate(existing, &record));
        }
        if let Some(alternate) = &record.alternate {
            if !self
                .records
                .get(&alternate.base)
                .is_some_and(|base| !base.is_alternate())
            {
                return Err(Issue::OrphanAlternate {
                    glyph: record.name.to_string(),
                    path: record.source_path(),
                    base: alternate.base.to_string(),
                });
            }
            log::debug!(
                "Registered {} as {} of {}",
                record.name,
                alternate.tag,
                alternate.base
            );
        }
        self.records.insert(record.name.clone(), record);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&GlyphRecord> {
        self.records.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in registration order
    pub fn iter(&self) -> impl Iterator<Item = &GlyphRecord> {
        self.records.values()
    }

    pub fn alternates(&self) -> impl Iterator<Item = &GlyphRecord> {
        self.iter().filter(|r| r.is_alternate())
    }

    fn order_key(&self, record: &GlyphRecord) -> (u8, u32, Option<FeatureTag>) {
        match (&record.alternate, record.codepoint) {
            _ if record.name == NOTDEF => (0, 0, None),
            _ if record.name == SPACE => (1, 0, None),
            (None, Some(c)) => (2, c as u32, None),
            (None, None) => (2, u32::MAX, None),
            (Some(alt), _) => {
                let base = self
                    .get(&alt.base)
                    .and_then(|b| b.codepoint)
                    .map_or(u32::MAX, |c| c as u32);
                (3, base, Some(alt.tag))
            }
        }
    }

    /// Glyph names in final order: `.notdef`, `space`, base glyphs by
    /// codepoint, then alternates by base codepoint and feature tag
    pub fn glyph_order(&self) -> Vec<SmolStr> {
        let mut names: Vec<&GlyphRecord> = self.records.values().collect();
        names.sort_by_key(|r| (self.order_key(r), r.name.clone()));
        names.into_iter().map(|r| r.name.clone()).collect()
    }

    /// Consume the table, returning its records in glyph order
    pub fn into_ordered_records(mut self) -> Vec<GlyphRecord> {
        self.glyph_order()
            .iter()
            .filter_map(|name| self.records.swap_remove(name))
            .collect()
    }
}
