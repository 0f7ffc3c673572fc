use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use thiserror::Error;

use crate::name::QualifiedName;
use crate::tree::NormalizedElement;

/// Namespace bound to the reserved `xml` prefix. It is never declared.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Errors that can occur while writing XML from a [`NormalizedElement`] tree.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Failed to serialize XML bytes.
    #[error("failed to write XML: {0}")]
    Xml(#[from] quick_xml::Error),
    /// Failed to write output file.
    #[error("failed to write XML file: {0}")]
    Io(#[from] std::io::Error),
}

/// Serialize a normalized tree into indented XML bytes.
///
/// Every namespace in the tree gets a generated `nsN` prefix declared on the
/// root element, numbered in order of first appearance. The XML namespace
/// keeps its reserved `xml` prefix.
pub fn write(node: &NormalizedElement) -> Result<Vec<u8>, WriteError> {
    let prefixes = assign_prefixes(node);
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    write_node(&mut writer, node, &prefixes, true)?;
    Ok(writer.into_inner())
}

/// Serialize a normalized tree and write it to `path`.
pub fn write_file(node: &NormalizedElement, path: &Path) -> Result<(), WriteError> {
    let bytes = write(node)?;
    fs::write(path, bytes)?;
    Ok(())
}

fn assign_prefixes(root: &NormalizedElement) -> BTreeMap<String, String> {
    let mut prefixes = BTreeMap::new();
    let mut pending = vec![root];
    while let Some(node) = pending.pop() {
        let names = std::iter::once(&node.name).chain(node.attributes.keys());
        for uri in names
            .filter_map(|name| name.namespace.as_ref())
            .filter(|uri| uri.as_str() != XML_NAMESPACE)
        {
            if !prefixes.contains_key(uri) {
                let prefix = format!("ns{}", prefixes.len());
                prefixes.insert(uri.clone(), prefix);
            }
        }
        pending.extend(node.children.iter().rev());
    }
    prefixes
}

fn lexical(name: &QualifiedName, prefixes: &BTreeMap<String, String>) -> String {
    match name.namespace.as_deref() {
        Some(XML_NAMESPACE) => format!("xml:{}", name.local),
        Some(uri) => match prefixes.get(uri) {
            Some(prefix) => format!("{prefix}:{}", name.local),
            None => name.local.clone(),
        },
        None => name.local.clone(),
    }
}

fn write_node(
    writer: &mut Writer<Vec<u8>>,
    node: &NormalizedElement,
    prefixes: &BTreeMap<String, String>,
    is_root: bool,
) -> Result<(), quick_xml::Error> {
    let tag = lexical(&node.name, prefixes);
    let mut start = BytesStart::new(tag.as_str());

    if is_root {
        let mut declarations: Vec<(&String, &String)> = prefixes.iter().collect();
        declarations.sort_by(|a, b| a.1.len().cmp(&b.1.len()).then_with(|| a.1.cmp(b.1)));
        for (uri, prefix) in declarations {
            let key = format!("xmlns:{prefix}");
            start.push_attribute((key.as_str(), uri.as_str()));
        }
    }

    for (key, value) in &node.attributes {
        let key = lexical(key, prefixes);
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if node.children.is_empty() && node.text.is_none() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;

    if let Some(text) = &node.text {
        writer.write_event(Event::Text(BytesText::new(text)))?;
    }

    for child in &node.children {
        write_node(writer, child, prefixes, false)?;
        if let Some(tail) = &child.tail {
            writer.write_event(Event::Text(BytesText::new(tail)))?;
        }
    }

    writer.write_event(Event::End(BytesEnd::new(tag.as_str())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::write;
    use crate::parser::parse;
    use crate::tree::NormalizedElement;

    #[test]
    fn generates_prefixes_in_order_of_appearance() {
        let root = parse(br#"<a:r xmlns:a="urn:one" xmlns:b="urn:two"><b:c a:k="v"/></a:r>"#)
            .expect("parse");
        let written = write(&NormalizedElement::from_element(&root)).expect("write");
        let text = String::from_utf8(written).expect("utf-8");

        assert!(text.starts_with(r#"<ns0:r xmlns:ns0="urn:one" xmlns:ns1="urn:two">"#));
        assert!(text.contains(r#"<ns1:c ns0:k="v"/>"#));
    }

    #[test]
    fn xml_namespace_keeps_reserved_prefix() {
        let root = parse(br#"<r xml:lang="en" xmlns:a="urn:a" a:k="v">x</r>"#).expect("parse");
        let written = write(&NormalizedElement::from_element(&root)).expect("write");
        let text = String::from_utf8(written).expect("utf-8");

        assert_eq!(text, r#"<r xmlns:ns0="urn:a" xml:lang="en" ns0:k="v">x</r>"#);
    }
}
