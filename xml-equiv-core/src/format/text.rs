use crate::compare::{Mismatch, MismatchKind};

/// Format a mismatch as a one-line human readable message.
pub fn format_text(mismatch: &Mismatch) -> String {
    let path = &mismatch.path;
    match &mismatch.kind {
        MismatchKind::TagMismatch { got, expected } => {
            format!("tag at {path}: expected '{expected}', got '{got}'")
        }
        MismatchKind::MissingAttribute { key } => {
            format!("attribute '{key}' at {path}: expected but missing")
        }
        MismatchKind::UnexpectedAttribute { key } => {
            format!("attribute '{key}' at {path}: not expected")
        }
        MismatchKind::AttributeValueMismatch { key, got, expected } => {
            format!("attribute '{key}' at {path}: expected '{expected}', got '{got}'")
        }
        MismatchKind::TextMismatch { got, expected } => format!(
            "text at {path}: expected '{}', got '{}'",
            expected.as_deref().unwrap_or_default(),
            got.as_deref().unwrap_or_default()
        ),
        MismatchKind::ChildCountMismatch { got, expected } => {
            format!("child count at {path}: expected {expected}, got {got}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::format_text;
    use crate::compare::{Mismatch, MismatchKind, MismatchPath};
    use crate::name::QualifiedName;

    #[test]
    fn attribute_value_message_names_key_path_and_values() {
        let mut path = MismatchPath::root(&QualifiedName::new("root"));
        path.push_child(&QualifiedName::new("child"), 0);
        let mismatch = Mismatch::new(
            path,
            MismatchKind::AttributeValueMismatch {
                key: QualifiedName::new("id"),
                got: "b".to_string(),
                expected: "a".to_string(),
            },
        );

        assert_eq!(
            format_text(&mismatch),
            "attribute 'id' at /root/child[0]: expected 'a', got 'b'"
        );
    }

    #[test]
    fn missing_text_renders_as_empty() {
        let mismatch = Mismatch::new(
            MismatchPath::root(&QualifiedName::new("root")),
            MismatchKind::TextMismatch {
                got: None,
                expected: Some("foo".to_string()),
            },
        );

        assert_eq!(
            format_text(&mismatch),
            "text at /root: expected 'foo', got ''"
        );
    }
}
