use colored::Colorize;
use xml_equiv_core::{format_text, Mismatch, MismatchKind};

/// Render a mismatch for terminal output.
pub fn render_mismatch(mismatch: &Mismatch) -> String {
    let mut out = Vec::new();
    out.push(format!("{} {}", "!".red().bold(), format_text(mismatch)));
    out.push(format!("  location: {}", mismatch.location().to_string().yellow()));

    match &mismatch.kind {
        MismatchKind::TagMismatch { got, expected } => {
            push_pair(&mut out, &expected.to_string(), &got.to_string());
        }
        MismatchKind::AttributeValueMismatch { got, expected, .. } => {
            push_pair(&mut out, expected, got);
        }
        MismatchKind::TextMismatch { got, expected } => push_pair(
            &mut out,
            expected.as_deref().unwrap_or_default(),
            got.as_deref().unwrap_or_default(),
        ),
        MismatchKind::ChildCountMismatch { got, expected } => {
            push_pair(&mut out, &expected.to_string(), &got.to_string());
        }
        MismatchKind::MissingAttribute { .. } | MismatchKind::UnexpectedAttribute { .. } => {}
    }

    out.join("\n")
}

/// Render the success line.
pub fn render_equivalent() -> String {
    "equivalent".green().to_string()
}

fn push_pair(out: &mut Vec<String>, expected: &str, got: &str) {
    out.push(format!("  {} {expected}", "expected:".green()));
    out.push(format!("  {}      {got}", "got:".red()));
}
