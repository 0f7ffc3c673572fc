use std::fmt::{self, Display, Formatter};

use serde::{Serialize, Serializer};

/// A namespace-resolved element or attribute name.
///
/// Identity is the `(namespace, local)` pair. The lexical prefix a document
/// used to spell the name is never part of it. The derived ordering sorts
/// names without a namespace first, then by namespace URI, then by local
/// name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QualifiedName {
    /// Namespace URI, `None` when the name is in no namespace.
    pub namespace: Option<String>,
    /// Local part of the name.
    pub local: String,
}

impl QualifiedName {
    /// Create a name in no namespace.
    pub fn new(local: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local: local.into(),
        }
    }

    /// Create a name bound to `namespace`.
    pub fn with_namespace(namespace: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local: local.into(),
        }
    }

    /// Parse Clark notation (`{uri}local`) or a bare local name.
    pub fn from_clark(raw: &str) -> Self {
        if let Some(rest) = raw.strip_prefix('{') {
            if let Some((uri, local)) = rest.split_once('}') {
                return Self::with_namespace(uri, local);
            }
        }
        Self::new(raw)
    }
}

impl Display for QualifiedName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(uri) => write!(f, "{{{uri}}}{}", self.local),
            None => f.write_str(&self.local),
        }
    }
}

impl Serialize for QualifiedName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
