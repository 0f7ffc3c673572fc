//! XPath-based assertions.
//!
//! No XPath engine ships with this crate. Callers plug one in by
//! implementing [`XPathEvaluator`]; the assertions only decide what the
//! evaluated results mean.

use std::collections::{BTreeMap, HashSet};

use thiserror::Error;
use tracing::debug;
use xml_equiv_core::{QualifiedName, XmlElement};

use crate::assertions::{render_element, AssertionFailure, XmlAssert};

/// Prefix → namespace URI bindings visible to an XPath expression.
pub type Namespaces = BTreeMap<String, String>;

/// One item of a node-set result.
#[derive(Debug, Clone, PartialEq)]
pub enum XPathItem {
    Element(XmlElement),
    Attribute { name: QualifiedName, value: String },
    Text(String),
}

impl XPathItem {
    pub fn string_value(&self) -> String {
        match self {
            XPathItem::Element(element) => element.string_value(),
            XPathItem::Attribute { value, .. } => value.clone(),
            XPathItem::Text(text) => text.clone(),
        }
    }
}

/// Result of evaluating an XPath expression.
#[derive(Debug, Clone, PartialEq)]
pub enum XPathValue {
    Nodes(Vec<XPathItem>),
    Boolean(bool),
    Number(f64),
    String(String),
}

impl XPathValue {
    /// XPath boolean conversion of the result.
    pub fn is_truthy(&self) -> bool {
        match self {
            XPathValue::Nodes(items) => !items.is_empty(),
            XPathValue::Boolean(value) => *value,
            XPathValue::Number(value) => *value != 0.0 && !value.is_nan(),
            XPathValue::String(value) => !value.is_empty(),
        }
    }

    /// Number of results. A scalar counts as one.
    pub fn len(&self) -> usize {
        match self {
            XPathValue::Nodes(items) => items.len(),
            XPathValue::Boolean(_) | XPathValue::Number(_) | XPathValue::String(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// String value of each result, in order.
    pub fn string_values(&self) -> Vec<String> {
        match self {
            XPathValue::Nodes(items) => items.iter().map(XPathItem::string_value).collect(),
            XPathValue::Boolean(value) => vec![value.to_string()],
            XPathValue::Number(value) => vec![value.to_string()],
            XPathValue::String(value) => vec![value.clone()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum XPathError {
    #[error("invalid XPath expression: {0}")]
    Syntax(String),
    #[error("XPath evaluation failed: {0}")]
    Evaluation(String),
}

/// An XPath engine evaluating expressions against parsed elements.
pub trait XPathEvaluator {
    fn evaluate(
        &self,
        node: &XmlElement,
        expression: &str,
        namespaces: &Namespaces,
    ) -> Result<XPathValue, XPathError>;
}

/// Namespace bindings in scope on `node`, with the default namespace exposed
/// under `default_prefix` (XPath has no syntax for an unprefixed default).
pub fn namespace_map(node: &XmlElement, default_prefix: &str) -> Namespaces {
    node.namespaces
        .iter()
        .map(|(prefix, uri)| {
            let prefix = prefix.clone().unwrap_or_else(|| default_prefix.to_string());
            (prefix, uri.clone())
        })
        .collect()
}

impl XmlAssert {
    /// Assert every expression in `xpaths` yields a non-empty or true result.
    pub fn xpaths_exist(
        &self,
        evaluator: &dyn XPathEvaluator,
        node: &XmlElement,
        xpaths: &[&str],
    ) -> Result<(), AssertionFailure> {
        for xpath in xpaths {
            let result = self.evaluate(evaluator, node, xpath)?;
            if !result.is_truthy() {
                return Err(not_found(node, xpath));
            }
        }
        Ok(())
    }

    /// Assert every expression in `xpaths` yields exactly one result.
    pub fn xpaths_only_one(
        &self,
        evaluator: &dyn XPathEvaluator,
        node: &XmlElement,
        xpaths: &[&str],
    ) -> Result<(), AssertionFailure> {
        for xpath in xpaths {
            let result = self.evaluate(evaluator, node, xpath)?;
            let count = result.len();
            if count == 0 {
                return Err(not_found(node, xpath));
            }
            if count > 1 {
                return Err(AssertionFailure::new(format!(
                    "Too many results found ({count}) for XPath on element {}:\nXPath: {xpath}\nElement:\n{}",
                    node.lexical_name(),
                    render_element(node)
                )));
            }
        }
        Ok(())
    }

    /// Assert no expression in `xpaths` yields the same value twice.
    ///
    /// Element results are distinct nodes and never collide; attribute, text,
    /// and scalar results are compared by value.
    pub fn xpaths_unique_value(
        &self,
        evaluator: &dyn XPathEvaluator,
        node: &XmlElement,
        xpaths: &[&str],
    ) -> Result<(), AssertionFailure> {
        for xpath in xpaths {
            let result = self.evaluate(evaluator, node, xpath)?;
            let values: Vec<String> = match &result {
                XPathValue::Nodes(items) => items
                    .iter()
                    .filter(|item| !matches!(item, XPathItem::Element(_)))
                    .map(XPathItem::string_value)
                    .collect(),
                scalar => scalar.string_values(),
            };

            let mut seen = HashSet::new();
            if !values.iter().all(|value| seen.insert(value)) {
                return Err(AssertionFailure::new(format!(
                    "Value is not unique for element {}:\nXPath: {xpath}\nElement:\n{}",
                    node.lexical_name(),
                    render_element(node)
                )));
            }
        }
        Ok(())
    }

    /// Assert every value `xpath` yields is one of `values`.
    pub fn xpath_values(
        &self,
        evaluator: &dyn XPathEvaluator,
        node: &XmlElement,
        xpath: &str,
        values: &[&str],
    ) -> Result<(), AssertionFailure> {
        let result = self.evaluate(evaluator, node, xpath)?;
        for found in result.string_values() {
            if !values.contains(&found.as_str()) {
                return Err(AssertionFailure::new(format!(
                    "Invalid value found for node {}\nXPath: {xpath}\nValue found: {found}\nElement:\n{}",
                    node.lexical_name(),
                    render_element(node)
                )));
            }
        }
        Ok(())
    }

    fn evaluate(
        &self,
        evaluator: &dyn XPathEvaluator,
        node: &XmlElement,
        xpath: &str,
    ) -> Result<XPathValue, AssertionFailure> {
        let namespaces = namespace_map(node, &self.config().default_ns_prefix);
        debug!(xpath, namespaces = namespaces.len(), "evaluating XPath");
        evaluator
            .evaluate(node, xpath, &namespaces)
            .map_err(|err| {
                AssertionFailure::new(format!(
                    "Invalid XPath expression for element {}: {err}\nXPath: {xpath}\nElement:\n{}",
                    node.lexical_name(),
                    render_element(node)
                ))
            })
    }
}

fn not_found(node: &XmlElement, xpath: &str) -> AssertionFailure {
    AssertionFailure::new(format!(
        "No result found for XPath for element {}\nXPath: {xpath}\nElement:\n{}",
        node.lexical_name(),
        render_element(node)
    ))
}
