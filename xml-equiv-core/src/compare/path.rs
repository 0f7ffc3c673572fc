use std::fmt::{self, Display, Formatter};

use serde::{Serialize, Serializer};

use crate::name::QualifiedName;

/// One step of a [`MismatchPath`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// An element. `index` is the 0-based position among siblings with the
    /// same name; the document root has none.
    Element {
        name: QualifiedName,
        index: Option<usize>,
    },
    Attribute(QualifiedName),
    /// Text following the element before its next sibling.
    Tail,
}

/// Location of a mismatch, from the document root down.
///
/// Renders as `/root/child[0]/{urn:x}item[2]`, with a trailing `/@name`
/// segment when it points at an attribute and `/tail()` when it points at
/// the text after an element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MismatchPath {
    segments: Vec<PathSegment>,
}

impl MismatchPath {
    /// Path to the document root element.
    pub fn root(name: &QualifiedName) -> Self {
        Self {
            segments: vec![PathSegment::Element {
                name: name.clone(),
                index: None,
            }],
        }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub(crate) fn push_child(&mut self, name: &QualifiedName, index: usize) {
        self.segments.push(PathSegment::Element {
            name: name.clone(),
            index: Some(index),
        });
    }

    pub(crate) fn pop(&mut self) {
        self.segments.pop();
    }

    /// This path extended with an attribute segment.
    pub fn attribute(&self, name: &QualifiedName) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Attribute(name.clone()));
        Self { segments }
    }

    /// This path extended with a tail-text segment.
    pub fn tail(&self) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Tail);
        Self { segments }
    }
}

impl Display for MismatchPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            match segment {
                PathSegment::Element { name, index: None } => write!(f, "/{name}")?,
                PathSegment::Element {
                    name,
                    index: Some(index),
                } => write!(f, "/{name}[{index}]")?,
                PathSegment::Attribute(name) => write!(f, "/@{name}")?,
                PathSegment::Tail => f.write_str("/tail()")?,
            }
        }
        Ok(())
    }
}

impl Serialize for MismatchPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::MismatchPath;
    use crate::name::QualifiedName;

    #[test]
    fn renders_root_children_and_attributes() {
        let mut path = MismatchPath::root(&QualifiedName::new("root"));
        path.push_child(&QualifiedName::with_namespace("urn:x", "item"), 2);

        assert_eq!(path.to_string(), "/root/{urn:x}item[2]");
        assert_eq!(
            path.attribute(&QualifiedName::new("id")).to_string(),
            "/root/{urn:x}item[2]/@id"
        );
        assert_eq!(path.tail().to_string(), "/root/{urn:x}item[2]/tail()");

        path.pop();
        assert_eq!(path.to_string(), "/root");
    }
}
