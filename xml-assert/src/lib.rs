//! Assertions for testing code that produces XML.
//!
//! [`XmlAssert`] bundles the assertions: well-formedness, partial documents,
//! namespaces, attributes, node shape, XPath results, schema validity, and
//! semantic equivalence of two outputs. Every assertion returns
//! `Result<_, AssertionFailure>`; the [`assert_xml!`] and
//! [`assert_xml_equivalent!`] macros panic with the failure message instead,
//! which is what a `#[test]` wants.
//!
//! ```
//! use xml_assert::{assert_xml_equivalent, XmlAssert};
//!
//! assert_xml_equivalent!(
//!     r#"<root><tag bar="foo" foo="bar"> foo </tag></root>"#,
//!     "<root>\n  <tag foo=\"bar\" bar=\"foo\">foo</tag>\n</root>"
//! );
//!
//! let xml = XmlAssert::default();
//! let root = xml_assert::assert_xml!(xml.document(b"<root a=\"1\"/>"));
//! assert_eq!(root.attribute("a"), Some("1"));
//! ```
//!
//! XPath evaluation and schema validation are delegated to engines the
//! caller supplies through [`xpath::XPathEvaluator`] and
//! [`schema::SchemaEngine`].

pub mod assertions;
pub mod config;
pub mod inspect;
pub mod report;
pub mod schema;
pub mod xpath;

pub use assertions::{
    AssertionFailure, AttributeExpectation, NodeExpectation, TextExpectation, XmlAssert,
};
pub use config::{embedded_config, load_config, AssertConfig, ConfigLoadError};

/// Unwrap an assertion result, panicking with the failure message.
#[macro_export]
macro_rules! assert_xml {
    ($result:expr $(,)?) => {
        match $result {
            ::std::result::Result::Ok(value) => value,
            ::std::result::Result::Err(failure) => panic!("{}", failure),
        }
    };
}

/// Panic unless two XML outputs are equivalent.
#[macro_export]
macro_rules! assert_xml_equivalent {
    ($got:expr, $expected:expr $(,)?) => {
        $crate::assert_xml!($crate::XmlAssert::default().equivalent_outputs(
            ::std::convert::AsRef::<[u8]>::as_ref(&$got),
            ::std::convert::AsRef::<[u8]>::as_ref(&$expected),
        ))
    };
}
