use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use thiserror::Error;

use crate::document::{RawAttribute, XmlElement, XmlNode};
use crate::name::QualifiedName;

/// Namespace that `xmlns` / `xmlns:*` pseudo-attributes live in.
pub const XMLNS_NAMESPACE: &str = "http://www.w3.org/2000/xmlns/";

/// Deepest element nesting [`parse`] accepts, counting the root as 1.
///
/// Normalization and comparison recurse once per level, so deeper input is
/// rejected up front instead of exhausting the stack.
pub const MAX_DEPTH: usize = 256;

/// Errors that can occur while parsing XML into an [`XmlElement`] tree.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Input XML could not be decoded or tokenized.
    #[error("failed to parse XML at byte {position}: {source}")]
    Xml {
        position: u64,
        source: quick_xml::Error,
    },
    /// Input bytes were not valid UTF-8 for name/text extraction.
    #[error("invalid UTF-8 at byte {position}: {source}")]
    Utf8 {
        position: u64,
        source: std::str::Utf8Error,
    },
    /// A name used a prefix with no namespace binding in scope.
    #[error("unknown namespace prefix '{prefix}' at byte {position}")]
    UnknownPrefix { position: u64, prefix: String },
    /// Structural issue in XML document.
    #[error("malformed XML at byte {position}: {message}")]
    Malformed { position: u64, message: String },
    /// Failed to read input file.
    #[error("failed to read XML file: {0}")]
    Io(#[from] std::io::Error),
}

impl ParseError {
    /// Byte offset the error was detected at, when it came from the input.
    pub fn position(&self) -> Option<u64> {
        match self {
            ParseError::Xml { position, .. }
            | ParseError::Utf8 { position, .. }
            | ParseError::UnknownPrefix { position, .. }
            | ParseError::Malformed { position, .. } => Some(*position),
            ParseError::Io(_) => None,
        }
    }
}

/// Parse XML bytes into the root [`XmlElement`] of the document.
pub fn parse(xml: &[u8]) -> Result<XmlElement, ParseError> {
    let mut reader = NsReader::from_reader(xml);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|source| ParseError::Xml {
                position: position(&reader),
                source,
            })?;

        match event {
            Event::Start(e) => {
                check_depth(&stack, position(&reader))?;
                let element = build_element(&e, &reader, stack.last())?;
                stack.push(element);
            }
            Event::Empty(e) => {
                check_depth(&stack, position(&reader))?;
                let element = build_element(&e, &reader, stack.last())?;
                attach(element, &mut stack, &mut root, position(&reader))?;
            }
            Event::Text(e) => {
                let text = e
                    .unescape()
                    .map_err(|source| ParseError::Xml {
                        position: position(&reader),
                        source,
                    })?
                    .into_owned();
                push_text(text, &mut stack, position(&reader))?;
            }
            Event::CData(e) => {
                let text = utf8(e.as_ref(), position(&reader))?.to_string();
                push_text(text, &mut stack, position(&reader))?;
            }
            Event::Comment(e) => {
                if let Some(current) = stack.last_mut() {
                    let text = utf8(&e, position(&reader))?.to_string();
                    current.children.push(XmlNode::Comment(text));
                }
            }
            Event::PI(e) => {
                if let Some(current) = stack.last_mut() {
                    let text = utf8(&e, position(&reader))?.to_string();
                    current.children.push(XmlNode::ProcessingInstruction(text));
                }
            }
            Event::End(_) => {
                let element = stack.pop().ok_or_else(|| ParseError::Malformed {
                    position: position(&reader),
                    message: "encountered closing tag without open tag".to_string(),
                })?;
                attach(element, &mut stack, &mut root, position(&reader))?;
            }
            Event::Eof => break,
            Event::Decl(_) | Event::DocType(_) => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(ParseError::Malformed {
            position: position(&reader),
            message: "unclosed element(s) at end of document".to_string(),
        });
    }

    root.ok_or_else(|| ParseError::Malformed {
        position: position(&reader),
        message: "no root element found".to_string(),
    })
}

/// Parse an XML file into its root [`XmlElement`].
pub fn parse_file(path: &Path) -> Result<XmlElement, ParseError> {
    let bytes = fs::read(path)?;
    parse(&bytes)
}

/// Parse a partial document by wrapping it in a `<wrapper>` element.
///
/// Error positions are relative to the wrapped text.
pub fn parse_fragment(partial: &str, wrapper: &str) -> Result<XmlElement, ParseError> {
    let consolidated = format!("<{wrapper}>{partial}</{wrapper}>");
    parse(consolidated.as_bytes())
}

fn position(reader: &NsReader<&[u8]>) -> u64 {
    reader.buffer_position() as u64
}

fn check_depth(stack: &[XmlElement], position: u64) -> Result<(), ParseError> {
    if stack.len() >= MAX_DEPTH {
        return Err(ParseError::Malformed {
            position,
            message: format!("maximum nesting depth of {MAX_DEPTH} exceeded"),
        });
    }
    Ok(())
}

fn attach(
    element: XmlElement,
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    position: u64,
) -> Result<(), ParseError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(XmlNode::Element(element));
    } else if root.is_none() {
        *root = Some(element);
    } else {
        return Err(ParseError::Malformed {
            position,
            message: "multiple top-level elements found".to_string(),
        });
    }
    Ok(())
}

fn push_text(text: String, stack: &mut [XmlElement], position: u64) -> Result<(), ParseError> {
    match stack.last_mut() {
        Some(current) => {
            current.children.push(XmlNode::Text(text));
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(ParseError::Malformed {
            position,
            message: "text content outside of root element".to_string(),
        }),
    }
}

fn build_element(
    e: &BytesStart<'_>,
    reader: &NsReader<&[u8]>,
    parent: Option<&XmlElement>,
) -> Result<XmlElement, ParseError> {
    let position = position(reader);

    let (resolved, local) = reader.resolve_element(e.name());
    let name = QualifiedName {
        namespace: resolved_namespace(resolved, position)?,
        local: utf8(local.as_ref(), position)?.to_string(),
    };

    let mut element = XmlElement::new(name);
    element.prefix = match e.name().prefix() {
        Some(prefix) => Some(utf8(prefix.as_ref(), position)?.to_string()),
        None => None,
    };
    element.namespaces = parent
        .map(|p| p.namespaces.clone())
        .unwrap_or_else(BTreeMap::new);

    for attr in e.attributes() {
        let attr = attr.map_err(|err| ParseError::Xml {
            position,
            source: quick_xml::Error::from(err),
        })?;
        let lexical = utf8(attr.key.as_ref(), position)?.to_string();
        let value = attr
            .decode_and_unescape_value(reader.decoder())
            .map_err(|source| ParseError::Xml { position, source })?
            .into_owned();

        if let Some(binding) = namespace_binding(&lexical) {
            let prefix = binding.map(ToString::to_string);
            if value.is_empty() {
                element.namespaces.remove(&prefix);
            } else {
                element.namespaces.insert(prefix, value.clone());
            }
            element.attributes.push(RawAttribute {
                name: QualifiedName::with_namespace(XMLNS_NAMESPACE, binding.unwrap_or("xmlns")),
                lexical,
                value,
                is_namespace_declaration: true,
            });
            continue;
        }

        let (resolved, local) = reader.resolve_attribute(attr.key);
        let name = QualifiedName {
            namespace: resolved_namespace(resolved, position)?,
            local: utf8(local.as_ref(), position)?.to_string(),
        };
        element.attributes.push(RawAttribute {
            name,
            lexical,
            value,
            is_namespace_declaration: false,
        });
    }

    Ok(element)
}

/// `Some(None)` for `xmlns`, `Some(Some(prefix))` for `xmlns:prefix`.
fn namespace_binding(lexical: &str) -> Option<Option<&str>> {
    if lexical == "xmlns" {
        Some(None)
    } else {
        lexical.strip_prefix("xmlns:").map(Some)
    }
}

fn resolved_namespace(
    resolved: ResolveResult<'_>,
    position: u64,
) -> Result<Option<String>, ParseError> {
    match resolved {
        ResolveResult::Bound(Namespace(uri)) => Ok(Some(utf8(uri, position)?.to_string())),
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Unknown(prefix) => Err(ParseError::UnknownPrefix {
            position,
            prefix: String::from_utf8_lossy(&prefix).into_owned(),
        }),
    }
}

fn utf8(bytes: &[u8], position: u64) -> Result<&str, ParseError> {
    std::str::from_utf8(bytes).map_err(|source| ParseError::Utf8 { position, source })
}
