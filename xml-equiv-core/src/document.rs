use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use crate::name::QualifiedName;

/// A node of a parsed (not yet normalized) XML document.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    /// Character data, with entity references already expanded. CDATA
    /// sections are reported as text too.
    Text(String),
    Comment(String),
    ProcessingInstruction(String),
}

/// Kind of an [`XmlNode`], used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Element,
    Text,
    Comment,
    ProcessingInstruction,
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NodeKind::Element => "element",
            NodeKind::Text => "text",
            NodeKind::Comment => "comment",
            NodeKind::ProcessingInstruction => "processing instruction",
        })
    }
}

impl XmlNode {
    pub fn kind(&self) -> NodeKind {
        match self {
            XmlNode::Element(_) => NodeKind::Element,
            XmlNode::Text(_) => NodeKind::Text,
            XmlNode::Comment(_) => NodeKind::Comment,
            XmlNode::ProcessingInstruction(_) => NodeKind::ProcessingInstruction,
        }
    }

    pub fn as_element(&self) -> Option<&XmlElement> {
        match self {
            XmlNode::Element(element) => Some(element),
            _ => None,
        }
    }
}

/// An attribute exactly as it appeared on an element.
#[derive(Debug, Clone, PartialEq)]
pub struct RawAttribute {
    /// Resolved name. Namespace declarations resolve into the
    /// `http://www.w3.org/2000/xmlns/` namespace.
    pub name: QualifiedName,
    /// Name as written in the source (`prefix:local`).
    pub lexical: String,
    pub value: String,
    /// `true` for `xmlns` and `xmlns:*` pseudo-attributes.
    pub is_namespace_declaration: bool,
}

/// A parsed XML element, carrying everything the parser saw.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    pub name: QualifiedName,
    /// Prefix the source used for the element name, if any.
    pub prefix: Option<String>,
    /// Attributes in document order, namespace declarations included.
    pub attributes: Vec<RawAttribute>,
    /// Namespace bindings in scope on this element, inherited ones included.
    /// The `None` key is the default namespace.
    pub namespaces: BTreeMap<Option<String>, String>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    /// Create an element with no attributes, bindings, or children.
    pub fn new(name: QualifiedName) -> Self {
        Self {
            name,
            prefix: None,
            attributes: Vec::new(),
            namespaces: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Element name as written in the source.
    pub fn lexical_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}:{}", self.name.local),
            None => self.name.local.clone(),
        }
    }

    /// Look up an attribute value by its lexical (`prefix:local`) name.
    pub fn attribute(&self, lexical: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| !attr.is_namespace_declaration && attr.lexical == lexical)
            .map(|attr| attr.value.as_str())
    }

    /// Namespace URI bound to `prefix` on this element (`None` = default).
    pub fn namespace_for_prefix(&self, prefix: Option<&str>) -> Option<&str> {
        self.namespaces
            .get(&prefix.map(ToString::to_string))
            .map(String::as_str)
    }

    /// Child elements in document order, skipping text and other nodes.
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(XmlNode::as_element)
    }

    /// Text appearing before the first child element, unmodified.
    pub fn leading_text(&self) -> Option<String> {
        let mut out: Option<String> = None;
        for child in &self.children {
            match child {
                XmlNode::Element(_) => break,
                XmlNode::Text(text) => out.get_or_insert_with(String::new).push_str(text),
                XmlNode::Comment(_) | XmlNode::ProcessingInstruction(_) => {}
            }
        }
        out
    }

    /// Concatenated text of this element and all its descendants.
    pub fn string_value(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_text(element: &XmlElement, out: &mut String) {
    for child in &element.children {
        match child {
            XmlNode::Text(text) => out.push_str(text),
            XmlNode::Element(inner) => collect_text(inner, out),
            XmlNode::Comment(_) | XmlNode::ProcessingInstruction(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{XmlElement, XmlNode};
    use crate::name::QualifiedName;

    #[test]
    fn leading_text_stops_at_first_child_element() {
        let mut root = XmlElement::new(QualifiedName::new("root"));
        root.children.push(XmlNode::Text("head ".to_string()));
        root.children.push(XmlNode::Comment("ignored".to_string()));
        root.children.push(XmlNode::Text("more".to_string()));
        root.children
            .push(XmlNode::Element(XmlElement::new(QualifiedName::new("child"))));
        root.children.push(XmlNode::Text("tail".to_string()));

        assert_eq!(root.leading_text().as_deref(), Some("head more"));
        assert_eq!(root.string_value(), "head moretail");
    }
}
