use serde::Serialize;

use crate::Issue;

/// How serious a recorded issue is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Severity {
    /// Something was skipped but the output is still what the user asked for
    Warning,
    /// Artwork was provided but could not be used
    Error,
}

impl Issue {
    /// The severity this issue is reported with
    pub fn severity(&self) -> Severity {
        match self {
            Issue::GeometryParse { .. } | Issue::OrphanAlternate { .. } => Severity::Error,
            Issue::DuplicateGlyph { .. }
            | Issue::UnresolvedKerningReference { .. }
            | Issue::UnrecognizedFilename { .. } => Severity::Warning,
        }
    }

    /// The file or kerning pair the issue is about
    pub fn subject(&self) -> String {
        match self {
            Issue::GeometryParse { path, .. }
            | Issue::DuplicateGlyph { path, .. }
            | Issue::OrphanAlternate { path, .. }
            | Issue::UnrecognizedFilename { path, .. } => path.display().to_string(),
            Issue::UnresolvedKerningReference { left, right, .. } => format!("{left} {right}"),
        }
    }
}

/// One entry of the diagnostics list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    /// Whether the build lost artwork or only skipped something optional
    pub severity: Severity,
    /// The offending file path or kerning pair
    pub subject: String,
    /// Human-readable reason
    pub message: String,
    /// The structured issue, for callers which match on the kind
    #[serde(skip)]
    pub issue: Issue,
}

impl From<Issue> for Diagnostic {
    fn from(issue: Issue) -> Self {
        Diagnostic {
            severity: issue.severity(),
            subject: issue.subject(),
            message: issue.to_string(),
            issue,
        }
    }
}

/// Every file or pair which was skipped during a build, in the order found
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an issue, logging it at the matching level
    pub fn push(&mut self, issue: Issue) {
        let diagnostic = Diagnostic::from(issue);
        match diagnostic.severity {
            Severity::Warning => log::warn!("{}", diagnostic.message),
            Severity::Error => log::error!("{}", diagnostic.message),
        }
        self.0.push(diagnostic);
    }

    pub fn extend(&mut self, issues: impl IntoIterator<Item = Issue>) {
        for issue in issues {
            self.push(issue);
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.0.iter().any(|d| d.severity == Severity::Error)
    }

    /// The recorded issues themselves
    pub fn issues(&self) -> impl Iterator<Item = &Issue> {
        self.0.iter().map(|d| &d.issue)
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
