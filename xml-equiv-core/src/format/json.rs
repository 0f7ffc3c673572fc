use serde::Serialize;

use crate::compare::{Mismatch, MismatchPath};

#[derive(Serialize)]
struct MismatchReport<'a> {
    #[serde(flatten)]
    mismatch: &'a Mismatch,
    location: MismatchPath,
    message: String,
}

/// Format a mismatch as pretty-printed JSON, tagged by `type`.
pub fn format_json(mismatch: &Mismatch) -> Result<String, serde_json::Error> {
    let report = MismatchReport {
        mismatch,
        location: mismatch.location(),
        message: mismatch.to_string(),
    };
    serde_json::to_string_pretty(&report)
}

#[cfg(test)]
mod tests {
    use super::format_json;
    use crate::compare::{Mismatch, MismatchKind, MismatchPath};
    use crate::name::QualifiedName;

    #[test]
    fn json_is_tagged_and_carries_location() {
        let mismatch = Mismatch::new(
            MismatchPath::root(&QualifiedName::new("root")),
            MismatchKind::MissingAttribute {
                key: QualifiedName::with_namespace("urn:x", "id"),
            },
        );
        let json = format_json(&mismatch).expect("serializable");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");

        assert_eq!(value["type"], "MissingAttribute");
        assert_eq!(value["path"], "/root");
        assert_eq!(value["key"], "{urn:x}id");
        assert_eq!(value["location"], "/root/@{urn:x}id");
    }

    #[test]
    fn absent_text_serializes_as_null() {
        let mismatch = Mismatch::new(
            MismatchPath::root(&QualifiedName::new("r")).tail(),
            MismatchKind::TextMismatch {
                got: None,
                expected: Some("b".to_string()),
            },
        );
        let json = format_json(&mismatch).expect("serializable");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");

        assert_eq!(value["type"], "TextMismatch");
        assert_eq!(value["path"], "/r/tail()");
        assert!(value["got"].is_null());
        assert_eq!(value["message"], "text at /r/tail(): expected 'b', got ''");
    }
}
