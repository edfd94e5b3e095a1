use std::{io, path::PathBuf};
use thiserror::Error;

/// Errors which stop a build
#[derive(Debug, Error)]
pub enum SvgFontError {
    #[error("IO Error: {0}")]
    /// IO error
    IO(#[from] io::Error),

    #[error("Could not read artwork directory {path:?}: {source}")]
    /// The artwork directory could not be listed
    ArtworkDirectory {
        /// The directory we tried to read
        path: PathBuf,
        /// The underlying error
        source: io::Error,
    },

    #[error("JSON conversion error: {0}")]
    /// JSON conversion error
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration value for {key}: {reason}")]
    /// A configuration value is out of range
    InvalidConfig {
        /// The configuration key
        key: String,
        /// Why the value was rejected
        reason: String,
    },

    #[error("Don't know how to write {path:?}; use a .ufo or .json output path")]
    /// The output path has an unsupported extension
    UnsupportedOutput {
        /// The requested output path
        path: PathBuf,
    },

    /// No artwork resolved to the `.notdef` glyph
    #[error("No artwork resolved to .notdef; every font needs a fallback glyph (add a notdef.svg)")]
    MissingRequiredGlyph,

    #[cfg(feature = "ufo")]
    #[error("Error in UFO naming: {0}")]
    /// A glyph name was not acceptable to the UFO writer
    UfoName(#[from] norad::error::NamingError),

    #[cfg(feature = "ufo")]
    #[error("Error writing UFO: {0}")]
    /// The UFO could not be written
    UfoWrite(#[from] norad::error::FontWriteError),
}

/// Recoverable problems found during a build
///
/// These never stop the build; they are collected into
/// [`Diagnostics`](crate::Diagnostics) and the offending file or pair is
/// left out of the output.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Issue {
    #[error("Could not parse drawing commands in {path:?}: {reason}")]
    /// Malformed drawing commands; the glyph is skipped
    GeometryParse {
        /// The artwork file
        path: PathBuf,
        /// What was wrong
        reason: String,
    },

    #[error("{path:?} resolves to glyph {glyph}, which was already registered from {first:?}; ignoring it")]
    /// A second file resolved to an already registered glyph name
    DuplicateGlyph {
        /// The glyph name both files resolve to
        glyph: String,
        /// The rejected file
        path: PathBuf,
        /// The file which registered the glyph first
        first: PathBuf,
    },

    #[error("{path:?} is an alternate of {base}, but no artwork provides {base}")]
    /// An alternate whose base glyph does not exist
    OrphanAlternate {
        /// The alternate's glyph name
        glyph: String,
        /// The alternate artwork file
        path: PathBuf,
        /// The missing base glyph name
        base: String,
    },

    #[error("Kerning pair {left} {right} refers to unknown glyph {missing}; dropping it")]
    /// A kerning pair names a glyph which is not in the font
    UnresolvedKerningReference {
        /// Left glyph name of the pair
        left: String,
        /// Right glyph name of the pair
        right: String,
        /// The name which did not resolve
        missing: String,
    },

    #[error("Cannot infer a glyph from the file name {path:?}: {reason}")]
    /// The file name does not follow any recognized pattern
    UnrecognizedFilename {
        /// The artwork file
        path: PathBuf,
        /// Why it was not recognized
        reason: String,
    },
}

/// Why an artwork document could not be turned into contours
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("not a well-formed XML document: {0}")]
    /// The document is not XML
    Xml(#[from] roxmltree::Error),

    #[error("root element is <{0}>, expected <svg>")]
    /// The document is XML but not SVG
    NotSvg(String),

    #[error("bad path data: {0}")]
    /// A `d` attribute could not be parsed
    PathData(#[from] kurbo::SvgParseError),

    #[error("invalid {attribute} on <{element}>: {value:?}")]
    /// A geometry attribute is not a usable number or point list
    Attribute {
        /// The element carrying the attribute
        element: String,
        /// The attribute name
        attribute: String,
        /// The raw attribute value
        value: String,
    },
}
