use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use thiserror::Error;

use crate::document::{NodeKind, XmlElement, XmlNode};
use crate::name::QualifiedName;

/// Returned when something other than an element is handed to [`normalize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("expected an element node, found {found}")]
pub struct NotAnElement {
    pub found: NodeKind,
}

/// An element reduced to what equivalence comparison looks at.
///
/// Namespace declarations are dropped, attributes are keyed by resolved name
/// (so their order is irrelevant), text is trimmed, and child order is kept.
///
/// Text in mixed content stays attached to its position: `text` is what
/// precedes the first child element, and each child carries the text that
/// follows it, up to the next sibling element, as its `tail`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedElement {
    pub name: QualifiedName,
    /// Attributes in canonical (namespace URI, local name) order.
    pub attributes: BTreeMap<QualifiedName, String>,
    /// Trimmed leading text, `None` when empty or whitespace-only.
    pub text: Option<String>,
    /// Trimmed text following this element inside its parent. Always `None`
    /// on the root.
    pub tail: Option<String>,
    pub children: Vec<NormalizedElement>,
}

/// Normalize a parsed node. Only element nodes are accepted.
pub fn normalize(node: &XmlNode) -> Result<NormalizedElement, NotAnElement> {
    match node {
        XmlNode::Element(element) => Ok(NormalizedElement::from_element(element)),
        other => Err(NotAnElement {
            found: other.kind(),
        }),
    }
}

impl NormalizedElement {
    /// Create a normalized element with no attributes, children, or text.
    pub fn new(name: QualifiedName) -> Self {
        Self {
            name,
            attributes: BTreeMap::new(),
            text: None,
            tail: None,
            children: Vec::new(),
        }
    }

    /// Normalize a parsed element and its subtree.
    pub fn from_element(element: &XmlElement) -> Self {
        let mut attributes = BTreeMap::new();
        for attr in element
            .attributes
            .iter()
            .filter(|attr| !attr.is_namespace_declaration)
        {
            attributes.insert(attr.name.clone(), attr.value.clone());
        }

        let mut text = None;
        let mut children: Vec<NormalizedElement> = Vec::new();
        let mut pending = String::new();
        for node in &element.children {
            match node {
                XmlNode::Element(child) => {
                    let run = trimmed(&std::mem::take(&mut pending));
                    match children.last_mut() {
                        Some(previous) => previous.tail = run,
                        None => text = run,
                    }
                    children.push(NormalizedElement::from_element(child));
                }
                XmlNode::Text(run) => pending.push_str(run),
                XmlNode::Comment(_) | XmlNode::ProcessingInstruction(_) => {}
            }
        }
        let run = trimmed(&pending);
        match children.last_mut() {
            Some(previous) => previous.tail = run,
            None => text = run,
        }

        Self {
            name: element.name.clone(),
            attributes,
            text,
            tail: None,
            children,
        }
    }

    /// Return the first child with the provided name.
    pub fn child(&self, name: &QualifiedName) -> Option<&NormalizedElement> {
        self.children.iter().find(|child| &child.name == name)
    }

    /// Return all children with the provided name, in document order.
    pub fn children_named(&self, name: &QualifiedName) -> Vec<&NormalizedElement> {
        self.children
            .iter()
            .filter(|child| &child.name == name)
            .collect()
    }

    pub fn attribute(&self, name: &QualifiedName) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

// Edges only; internal whitespace is significant.
fn trimmed(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

impl Display for NormalizedElement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.name)?;
        for (key, value) in &self.attributes {
            write!(f, " {}=\"{}\"", key, value)?;
        }

        if self.children.is_empty() && self.text.is_none() {
            return write!(f, "/>");
        }

        write!(f, ">")?;
        if let Some(text) = &self.text {
            write!(f, "{}", text)?;
        }
        for child in &self.children {
            write!(f, "{}", child)?;
            if let Some(tail) = &child.tail {
                write!(f, "{}", tail)?;
            }
        }
        write!(f, "</{}>", self.name)
    }
}
