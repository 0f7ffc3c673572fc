//! Schema validation assertions.
//!
//! Validation itself is delegated to a [`SchemaEngine`] supplied by the
//! caller (DTD, XML Schema or RelaxNG implementation).

use std::fmt::{self, Display, Formatter};
use std::fs;
use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;
use xml_equiv_core::XmlElement;

use crate::assertions::{AssertionFailure, XmlAssert};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    Dtd,
    XmlSchema,
    RelaxNg,
}

impl Display for SchemaKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SchemaKind::Dtd => "DTD",
            SchemaKind::XmlSchema => "XMLSchema",
            SchemaKind::RelaxNg => "RelaxNG",
        })
    }
}

/// Where schema text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaSource {
    Inline(String),
    File(PathBuf),
}

impl SchemaSource {
    /// Schema text, reading the file if needed.
    pub fn load(&self, kind: SchemaKind) -> Result<String, SchemaError> {
        match self {
            SchemaSource::Inline(text) => Ok(text.clone()),
            SchemaSource::File(path) => {
                fs::read_to_string(path).map_err(|source| SchemaError::Io {
                    kind,
                    path: path.display().to_string(),
                    source,
                })
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to read {kind} from {path}: {source}")]
    Io {
        kind: SchemaKind,
        path: String,
        source: std::io::Error,
    },
    #[error("invalid {kind}: {message}")]
    Invalid { kind: SchemaKind, message: String },
}

/// Outcome of validating one element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationReport {
    /// Violation messages in the order the engine reported them.
    pub violations: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// A compiled schema.
pub trait SchemaValidator {
    fn validate(&self, node: &XmlElement) -> ValidationReport;
}

/// Compiles schema text into a validator.
pub trait SchemaEngine {
    fn compile(
        &self,
        kind: SchemaKind,
        schema: &str,
    ) -> Result<Box<dyn SchemaValidator>, SchemaError>;
}

impl XmlAssert {
    /// Assert `node` is valid against the schema read from `source`.
    ///
    /// Fails with the last violation the engine reported.
    pub fn valid(
        &self,
        engine: &dyn SchemaEngine,
        kind: SchemaKind,
        source: &SchemaSource,
        node: &XmlElement,
    ) -> Result<(), AssertionFailure> {
        let validator = source
            .load(kind)
            .and_then(|text| engine.compile(kind, &text))
            .map_err(|err| AssertionFailure::new(format!("No valid {kind} given: {err}")))?;

        let report = validator.validate(node);
        debug!(%kind, violations = report.violations.len(), "schema validation finished");
        match report.violations.last() {
            None => Ok(()),
            Some(last) => Err(AssertionFailure::new(last.clone())),
        }
    }
}
