use thiserror::Error;
use tracing::debug;
use xml_equiv_core::{
    compare, parse, parse_fragment, write, NormalizedElement, QualifiedName, XmlElement, XmlNode,
};

use crate::config::AssertConfig;

/// A failed assertion, carrying the message a test runner should show.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AssertionFailure {
    pub message: String,
}

impl AssertionFailure {
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        debug!(%message, "assertion failed");
        Self { message }
    }
}

/// What an attribute assertion accepts as the attribute's value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AttributeExpectation {
    /// Any value, the attribute only has to exist.
    #[default]
    Present,
    Equals(String),
    OneOf(Vec<String>),
}

impl AttributeExpectation {
    /// Build an expectation from two optional selectors, rejecting the case
    /// where both are given.
    pub fn from_options(
        value: Option<String>,
        values: Option<Vec<String>>,
    ) -> Result<Self, AssertionFailure> {
        match (value, values) {
            (Some(_), Some(_)) => Err(AssertionFailure::new(
                "expected value and expected values are mutually exclusive",
            )),
            (Some(value), None) => Ok(Self::Equals(value)),
            (None, Some(values)) => Ok(Self::OneOf(values)),
            (None, None) => Ok(Self::Present),
        }
    }
}

/// What a node assertion accepts as the element's leading text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TextExpectation {
    #[default]
    Any,
    Equals(String),
    OneOf(Vec<String>),
}

/// Expected shape of an element node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeExpectation {
    /// Lexical (`prefix:local`) or Clark (`{uri}local`) tag name.
    pub tag: Option<String>,
    pub text: TextExpectation,
}

impl NodeExpectation {
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = TextExpectation::Equals(text.into());
        self
    }

    pub fn text_in<I, S>(mut self, accepted: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.text = TextExpectation::OneOf(accepted.into_iter().map(Into::into).collect());
        self
    }
}

/// Entry point for XML assertions.
///
/// Every assertion returns `Err(AssertionFailure)` instead of panicking, so it
/// can be used from any test framework. The [`assert_xml!`](crate::assert_xml)
/// macro turns a failure into a panic.
#[derive(Debug, Clone, Default)]
pub struct XmlAssert {
    config: AssertConfig,
}

impl XmlAssert {
    pub fn new(config: AssertConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AssertConfig {
        &self.config
    }

    /// Assert `data` is a well-formed XML document and return its root.
    pub fn document(&self, data: &[u8]) -> Result<XmlElement, AssertionFailure> {
        let root = parse(data).map_err(|err| {
            AssertionFailure::new(format!("Input is not a valid XML document: {err}"))
        })?;
        debug!(root = %root.name, "parsed XML document");
        Ok(root)
    }

    /// Assert `partial` is a sequence of XML elements and return the wrapper
    /// element holding them.
    ///
    /// The wrapper is `root_tag` or the configured default partial tag. A
    /// partial that parses but contains no element fails too.
    pub fn partial(
        &self,
        partial: &str,
        root_tag: Option<&str>,
    ) -> Result<XmlElement, AssertionFailure> {
        let tag = root_tag.unwrap_or(&self.config.default_partial_tag);
        let root = parse_fragment(partial, tag).map_err(|err| {
            AssertionFailure::new(format!("Input is not a valid partial XML document: {err}"))
        })?;

        if root.child_elements().next().is_none() {
            return Err(AssertionFailure::new(
                "Input does not have any elements to check.",
            ));
        }
        Ok(root)
    }

    /// Assert `prefix` is in scope on `node` and bound to `uri`. `None`
    /// checks the default namespace.
    pub fn namespace(
        &self,
        node: &XmlElement,
        prefix: Option<&str>,
        uri: &str,
    ) -> Result<(), AssertionFailure> {
        let shown = prefix.unwrap_or("(default)");
        match node.namespace_for_prefix(prefix) {
            None => Err(AssertionFailure::new(format!(
                "Namespace prefix '{shown}' is not declared on element {}",
                node.lexical_name()
            ))),
            Some(bound) if bound != uri => Err(AssertionFailure::new(format!(
                "Namespace prefix '{shown}' on element {} is bound to '{bound}', expected '{uri}'",
                node.lexical_name()
            ))),
            Some(_) => Ok(()),
        }
    }

    /// Assert `node` carries `attribute` (lexical `prefix:local` name) with a
    /// value accepted by `expectation`.
    pub fn has_attribute(
        &self,
        node: &XmlElement,
        attribute: &str,
        expectation: &AttributeExpectation,
    ) -> Result<(), AssertionFailure> {
        let value = node.attribute(attribute).ok_or_else(|| {
            AssertionFailure::new(format!(
                "Attribute '{attribute}' not found on element {}",
                node.lexical_name()
            ))
        })?;

        match expectation {
            AttributeExpectation::Present => Ok(()),
            AttributeExpectation::Equals(expected) if value != expected => {
                Err(AssertionFailure::new(format!(
                    "Attribute '{attribute}' on element {}: expected '{expected}', got '{value}'",
                    node.lexical_name()
                )))
            }
            AttributeExpectation::OneOf(accepted) if !accepted.iter().any(|v| v == value) => {
                Err(AssertionFailure::new(format!(
                    "Attribute '{attribute}' on element {} has value '{value}', expected one of {accepted:?}",
                    node.lexical_name()
                )))
            }
            AttributeExpectation::Equals(_) | AttributeExpectation::OneOf(_) => Ok(()),
        }
    }

    /// Assert `node` is an element matching `expectation`, and return it.
    pub fn node<'a>(
        &self,
        node: &'a XmlNode,
        expectation: &NodeExpectation,
    ) -> Result<&'a XmlElement, AssertionFailure> {
        let element = node.as_element().ok_or_else(|| {
            AssertionFailure::new(format!("Expected an element node, got {}", node.kind()))
        })?;

        if let Some(tag) = &expectation.tag {
            if !tag_matches(element, tag) {
                return Err(AssertionFailure::new(format!(
                    "Element tag is '{}' ({}), expected '{tag}'",
                    element.lexical_name(),
                    element.name
                )));
            }
        }

        let text = element.leading_text();
        match &expectation.text {
            TextExpectation::Any => {}
            TextExpectation::Equals(expected) => {
                if text.as_deref() != Some(expected.as_str()) {
                    return Err(AssertionFailure::new(format!(
                        "Element {} text is {text:?}, expected '{expected}'",
                        element.lexical_name()
                    )));
                }
            }
            TextExpectation::OneOf(accepted) => {
                if !text.as_ref().is_some_and(|t| accepted.contains(t)) {
                    return Err(AssertionFailure::new(format!(
                        "Element {} text is {text:?}, expected one of {accepted:?}",
                        element.lexical_name()
                    )));
                }
            }
        }

        Ok(element)
    }

    /// Assert two XML outputs are equivalent: same meaning regardless of
    /// attribute order, edge whitespace in text, or namespace prefixes.
    pub fn equivalent_outputs(&self, data: &[u8], expected: &[u8]) -> Result<(), AssertionFailure> {
        let got = parse(data).map_err(|err| {
            AssertionFailure::new(format!("Given output is not a valid XML document: {err}"))
        })?;
        let reference = parse(expected).map_err(|err| {
            AssertionFailure::new(format!("Expected output is not a valid XML document: {err}"))
        })?;

        let got = NormalizedElement::from_element(&got);
        let reference = NormalizedElement::from_element(&reference);
        compare(&got, &reference).map_err(|mismatch| {
            AssertionFailure::new(format!(
                "Output are not equivalent: {mismatch}\nGiven: {}\nExpected: {}",
                String::from_utf8_lossy(data),
                String::from_utf8_lossy(expected)
            ))
        })
    }
}

fn tag_matches(element: &XmlElement, tag: &str) -> bool {
    if tag.starts_with('{') {
        QualifiedName::from_clark(tag) == element.name
    } else {
        element.lexical_name() == tag
    }
}

/// Pretty-print an element for inclusion in failure messages.
pub(crate) fn render_element(node: &XmlElement) -> String {
    let normalized = NormalizedElement::from_element(node);
    match write(&normalized) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(_) => normalized.to_string(),
    }
}
