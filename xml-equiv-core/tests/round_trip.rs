use std::path::PathBuf;

use pretty_assertions::assert_eq;
use xml_equiv_core::{compare, parse, parse_file, write, write_file, NormalizedElement};

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

#[test]
fn normalizing_written_output_is_idempotent() {
    let source = parse_file(&fixture("fixtures/catalog_got.xml")).expect("initial parse");
    let first = NormalizedElement::from_element(&source);

    let written = write(&first).expect("write should succeed");
    let second = NormalizedElement::from_element(&parse(&written).expect("re-parse"));

    assert_eq!(first, second);
    assert!(compare(&second, &first).is_ok());
}

#[test]
fn write_file_round_trip_preserves_namespaces() {
    let source = parse_file(&fixture("fixtures/catalog_expected.xml")).expect("parse");
    let normalized = NormalizedElement::from_element(&source);

    let out_dir = tempfile::tempdir().expect("tempdir should be created");
    let out_path = out_dir.path().join("roundtrip.xml");
    write_file(&normalized, &out_path).expect("write_file should succeed");

    let reparsed = parse_file(&out_path).expect("parse_file should succeed");
    assert_eq!(reparsed.lexical_name(), "ns0:catalog");
    assert_eq!(NormalizedElement::from_element(&reparsed), normalized);
}

#[test]
fn reserved_xml_attributes_and_tails_survive_round_trip() {
    let source = parse(
        br#"<doc xmlns:x="urn:x" xml:lang="en"><p xml:space="preserve">Hello <x:b>big</x:b> world</p>after</doc>"#,
    )
    .expect("parse");
    let first = NormalizedElement::from_element(&source);

    let written = write(&first).expect("write should succeed");
    let text = String::from_utf8(written.clone()).expect("utf-8");
    assert!(!text.contains("XML/1998/namespace"));
    assert!(text.contains(r#"xml:lang="en""#));

    let second = NormalizedElement::from_element(&parse(&written).expect("re-parse"));
    assert_eq!(first, second);
    assert_eq!(second.children[0].tail.as_deref(), Some("after"));
}
