//! Semantic equivalence comparison of XML documents.
//!
//! Two documents are equivalent when they differ only in attribute order,
//! leading/trailing whitespace of text, or the prefixes used to spell
//! namespaces. Documents are parsed with [`parse`], reduced to
//! [`NormalizedElement`] trees, and walked in lock-step by [`compare`], which
//! reports the first [`Mismatch`] it finds.
//!
//! ```
//! use xml_equiv_core::compare_documents;
//!
//! let got = br#"<root><tag foo="bar" bar="foo"> foo </tag></root>"#;
//! let expected = b"<root>\n<tag bar=\"foo\" foo=\"bar\">foo</tag>\n</root>";
//! assert!(compare_documents(got, expected).is_ok());
//! ```

pub mod compare;
pub mod document;
pub mod format;
pub mod name;
pub mod parser;
pub mod tree;
pub mod writer;

pub use compare::{
    compare, compare_documents, compare_nodes, EquivalenceError, Mismatch, MismatchKind,
    MismatchPath, PathSegment, Side,
};
pub use document::{NodeKind, RawAttribute, XmlElement, XmlNode};
pub use format::{format_json, format_text};
pub use name::QualifiedName;
pub use parser::{parse, parse_file, parse_fragment, ParseError, MAX_DEPTH};
pub use tree::{normalize, NormalizedElement, NotAnElement};
pub use writer::{write, write_file, WriteError};
