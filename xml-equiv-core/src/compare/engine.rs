use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};

use thiserror::Error;

use crate::compare::path::MismatchPath;
use crate::compare::result::{Mismatch, MismatchKind};
use crate::document::XmlNode;
use crate::name::QualifiedName;
use crate::parser::{parse, ParseError};
use crate::tree::{normalize, NormalizedElement, NotAnElement};

/// Which of the two inputs an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Got,
    Expected,
}

impl Display for Side {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Got => "got",
            Side::Expected => "expected",
        })
    }
}

/// Everything that can stop two inputs from being found equivalent.
#[derive(Debug, Error)]
pub enum EquivalenceError {
    /// One input was not well-formed XML; comparison never started.
    #[error("failed to parse {side} document: {source}")]
    Parse { side: Side, source: ParseError },
    /// One input was not an element node; comparison never started.
    #[error("{side} input is not an element: {source}")]
    NotAnElement { side: Side, source: NotAnElement },
    #[error("{0}")]
    Mismatch(#[from] Mismatch),
}

/// Compare two normalized trees and return the first mismatch found.
///
/// Checks run in a fixed order at every element: name, attributes, text,
/// tail text, child count, then each child pair by position. The walk stops
/// at the first failure.
pub fn compare(got: &NormalizedElement, expected: &NormalizedElement) -> Result<(), Mismatch> {
    let mut path = MismatchPath::root(&expected.name);
    compare_node(got, expected, &mut path)
}

/// Normalize two parsed nodes and compare them.
pub fn compare_nodes(got: &XmlNode, expected: &XmlNode) -> Result<(), EquivalenceError> {
    let got = normalize(got).map_err(|source| EquivalenceError::NotAnElement {
        side: Side::Got,
        source,
    })?;
    let expected = normalize(expected).map_err(|source| EquivalenceError::NotAnElement {
        side: Side::Expected,
        source,
    })?;
    compare(&got, &expected)?;
    Ok(())
}

/// Parse, normalize, and compare two XML documents.
pub fn compare_documents(got: &[u8], expected: &[u8]) -> Result<(), EquivalenceError> {
    let got = parse(got).map_err(|source| EquivalenceError::Parse {
        side: Side::Got,
        source,
    })?;
    let expected = parse(expected).map_err(|source| EquivalenceError::Parse {
        side: Side::Expected,
        source,
    })?;
    compare_nodes(&XmlNode::Element(got), &XmlNode::Element(expected))
}

fn compare_node(
    got: &NormalizedElement,
    expected: &NormalizedElement,
    path: &mut MismatchPath,
) -> Result<(), Mismatch> {
    if got.name != expected.name {
        return Err(Mismatch::new(
            path.clone(),
            MismatchKind::TagMismatch {
                got: got.name.clone(),
                expected: expected.name.clone(),
            },
        ));
    }

    compare_attributes(got, expected, path)?;

    if got.text != expected.text {
        return Err(Mismatch::new(
            path.clone(),
            MismatchKind::TextMismatch {
                got: got.text.clone(),
                expected: expected.text.clone(),
            },
        ));
    }

    if got.tail != expected.tail {
        return Err(Mismatch::new(
            path.tail(),
            MismatchKind::TextMismatch {
                got: got.tail.clone(),
                expected: expected.tail.clone(),
            },
        ));
    }

    if got.children.len() != expected.children.len() {
        return Err(Mismatch::new(
            path.clone(),
            MismatchKind::ChildCountMismatch {
                got: got.children.len(),
                expected: expected.children.len(),
            },
        ));
    }

    let mut seen: HashMap<&QualifiedName, usize> = HashMap::new();
    for (got_child, expected_child) in got.children.iter().zip(&expected.children) {
        let counter = seen.entry(&expected_child.name).or_insert(0);
        let index = *counter;
        *counter += 1;

        path.push_child(&expected_child.name, index);
        compare_node(got_child, expected_child, path)?;
        path.pop();
    }

    Ok(())
}

// Missing keys are reported before unexpected ones, and both before value
// differences. Within each pass keys are visited in canonical order.
fn compare_attributes(
    got: &NormalizedElement,
    expected: &NormalizedElement,
    path: &MismatchPath,
) -> Result<(), Mismatch> {
    if let Some(key) = expected
        .attributes
        .keys()
        .find(|key| !got.attributes.contains_key(*key))
    {
        return Err(Mismatch::new(
            path.clone(),
            MismatchKind::MissingAttribute { key: key.clone() },
        ));
    }

    if let Some(key) = got
        .attributes
        .keys()
        .find(|key| !expected.attributes.contains_key(*key))
    {
        return Err(Mismatch::new(
            path.clone(),
            MismatchKind::UnexpectedAttribute { key: key.clone() },
        ));
    }

    for (key, expected_value) in &expected.attributes {
        if let Some(got_value) = got.attributes.get(key) {
            if got_value != expected_value {
                return Err(Mismatch::new(
                    path.clone(),
                    MismatchKind::AttributeValueMismatch {
                        key: key.clone(),
                        got: got_value.clone(),
                        expected: expected_value.clone(),
                    },
                ));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::compare;
    use crate::compare::result::MismatchKind;
    use crate::name::QualifiedName;
    use crate::parser::parse;
    use crate::tree::NormalizedElement;

    fn tree(xml: &str) -> NormalizedElement {
        NormalizedElement::from_element(&parse(xml.as_bytes()).expect("parse"))
    }

    #[test]
    fn missing_attribute_wins_over_unexpected_and_value_mismatch() {
        let got = tree(r#"<r a="x" z="1"/>"#);
        let expected = tree(r#"<r a="y" m="1"/>"#);

        let mismatch = compare(&got, &expected).expect_err("differs");
        assert_eq!(
            mismatch.kind,
            MismatchKind::MissingAttribute {
                key: QualifiedName::new("m")
            }
        );
    }

    #[test]
    fn attribute_checks_precede_text_and_children() {
        let got = tree(r#"<r a="1">text<c/></r>"#);
        let expected = tree(r#"<r a="2">other</r>"#);

        let mismatch = compare(&got, &expected).expect_err("differs");
        assert!(matches!(
            mismatch.kind,
            MismatchKind::AttributeValueMismatch { .. }
        ));
    }

    #[test]
    fn text_moved_across_a_child_is_a_tail_mismatch() {
        let got = tree("<r>ab<c/></r>");
        let expected = tree("<r>a<c/>b</r>");

        let mismatch = compare(&got, &expected).expect_err("differs");
        assert_eq!(
            mismatch.kind,
            MismatchKind::TextMismatch {
                got: Some("ab".to_string()),
                expected: Some("a".to_string()),
            }
        );

        let mismatch = compare(&tree("<r>a<c/></r>"), &expected).expect_err("differs");
        assert_eq!(mismatch.path.to_string(), "/r/c[0]/tail()");
        assert_eq!(
            mismatch.kind,
            MismatchKind::TextMismatch {
                got: None,
                expected: Some("b".to_string()),
            }
        );
    }

    #[test]
    fn sibling_index_counts_same_named_children_only() {
        let got = tree("<r><a/><b/><a><x/></a></r>");
        let expected = tree("<r><a/><b/><a><y/></a></r>");

        let mismatch = compare(&got, &expected).expect_err("differs");
        assert_eq!(mismatch.path.to_string(), "/r/a[1]/y[0]");
        assert_eq!(
            mismatch.kind,
            MismatchKind::TagMismatch {
                got: QualifiedName::new("x"),
                expected: QualifiedName::new("y"),
            }
        );
    }
}
