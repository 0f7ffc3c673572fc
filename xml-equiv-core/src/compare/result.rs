use serde::Serialize;

use crate::compare::path::MismatchPath;
use crate::name::QualifiedName;

/// The first point where two trees stop being equivalent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mismatch {
    /// Element the mismatch was found on.
    pub path: MismatchPath,
    #[serde(flatten)]
    pub kind: MismatchKind,
}

/// What differed. Each variant carries the values needed to describe the
/// difference without looking at the trees again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum MismatchKind {
    /// Element names (namespace URI or local name) differ.
    TagMismatch {
        got: QualifiedName,
        expected: QualifiedName,
    },
    /// Attribute expected but absent.
    MissingAttribute { key: QualifiedName },
    /// Attribute present but not expected.
    UnexpectedAttribute { key: QualifiedName },
    AttributeValueMismatch {
        key: QualifiedName,
        got: String,
        expected: String,
    },
    /// Normalized direct text differs. `None` means no text.
    TextMismatch {
        got: Option<String>,
        expected: Option<String>,
    },
    ChildCountMismatch { got: usize, expected: usize },
}

impl Mismatch {
    pub fn new(path: MismatchPath, kind: MismatchKind) -> Self {
        Self { path, kind }
    }

    /// Full location, including the attribute segment for attribute kinds.
    pub fn location(&self) -> MismatchPath {
        match &self.kind {
            MismatchKind::MissingAttribute { key }
            | MismatchKind::UnexpectedAttribute { key }
            | MismatchKind::AttributeValueMismatch { key, .. } => self.path.attribute(key),
            MismatchKind::TagMismatch { .. }
            | MismatchKind::TextMismatch { .. }
            | MismatchKind::ChildCountMismatch { .. } => self.path.clone(),
        }
    }
}

impl std::fmt::Display for Mismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&crate::format::format_text(self))
    }
}

impl std::error::Error for Mismatch {}
