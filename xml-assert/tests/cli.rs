use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

fn xml_assert() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("xml-assert"));
    cmd.arg("--no-color");
    cmd
}

#[test]
fn equiv_accepts_reformatted_and_reprefixed_catalog() {
    xml_assert()
        .arg("equiv")
        .arg(fixture("fixtures/catalog_got.xml"))
        .arg(fixture("fixtures/catalog_expected.xml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("equivalent"));
}

#[test]
fn equiv_reports_first_difference_and_fails() {
    xml_assert()
        .arg("equiv")
        .arg(fixture("fixtures/catalog_got.xml"))
        .arg(fixture("fixtures/catalog_changed.xml"))
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "attribute 'lang' at /{urn:example:catalog}catalog/{urn:example:catalog}book[1]: expected 'de', got 'fr'",
        ))
        .stdout(predicate::str::contains("location:"))
        .stderr(predicate::str::contains("documents are not equivalent"));
}

#[test]
fn equiv_json_outputs_tagged_mismatch() {
    xml_assert()
        .arg("equiv")
        .arg(fixture("fixtures/catalog_got.xml"))
        .arg(fixture("fixtures/catalog_changed.xml"))
        .arg("--format")
        .arg("json")
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"type\": \"AttributeValueMismatch\""))
        .stdout(predicate::str::contains("\"location\""))
        .stdout(predicate::str::contains("\"expected\": \"de\""));
}

#[test]
fn equiv_quiet_only_sets_exit_status() {
    xml_assert()
        .arg("equiv")
        .arg("--quiet")
        .arg(fixture("fixtures/catalog_got.xml"))
        .arg(fixture("fixtures/catalog_changed.xml"))
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::is_empty());
}

#[test]
fn equiv_names_the_malformed_side() {
    xml_assert()
        .arg("equiv")
        .arg(fixture("fixtures/catalog_got.xml"))
        .arg(fixture("fixtures/malformed.xml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse expected document"));
}

#[test]
fn check_reports_root_or_fails() {
    xml_assert()
        .arg("check")
        .arg(fixture("fixtures/catalog_got.xml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("ok root=cat:catalog"));

    xml_assert()
        .arg("check")
        .arg(fixture("fixtures/malformed.xml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not well-formed"));
}

#[test]
fn inspect_prints_normalized_outline() {
    xml_assert()
        .arg("inspect")
        .arg(fixture("fixtures/catalog_got.xml"))
        .arg("--depth")
        .arg("1")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "{urn:example:catalog}catalog @version=\"2\"",
        ))
        .stdout(predicate::str::contains(
            "  {urn:example:catalog}book @isbn=\"0-1\" @lang=\"en\" text=\"The Rust Book\"",
        ))
        .stdout(predicate::str::contains("updated").not());
}

#[test]
fn attr_checks_value_on_nested_element() {
    xml_assert()
        .arg("attr")
        .arg(fixture("fixtures/catalog_got.xml"))
        .arg("isbn")
        .arg("--at")
        .arg("cat:book")
        .arg("--value")
        .arg("0-1")
        .assert()
        .success()
        .stdout(predicate::str::contains("ok cat:book@isbn"));

    xml_assert()
        .arg("attr")
        .arg(fixture("fixtures/catalog_got.xml"))
        .arg("version")
        .arg("--one-of")
        .arg("3")
        .arg("4")
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected one of"));
}

#[test]
fn attr_rejects_value_together_with_one_of() {
    xml_assert()
        .arg("attr")
        .arg(fixture("fixtures/catalog_got.xml"))
        .arg("version")
        .arg("--value")
        .arg("2")
        .arg("--one-of")
        .arg("2")
        .arg("3")
        .assert()
        .failure()
        .stderr(predicate::str::contains("mutually exclusive"));
}

#[test]
fn attr_reports_missing_element_path() {
    xml_assert()
        .arg("attr")
        .arg(fixture("fixtures/catalog_got.xml"))
        .arg("isbn")
        .arg("--at")
        .arg("cat:missing")
        .assert()
        .failure()
        .stderr(predicate::str::contains("element 'cat:missing' not found"));
}

#[test]
fn config_file_is_loaded_and_validated() {
    let dir = tempdir().expect("tempdir");
    let good = dir.path().join("good.toml");
    fs::write(&good, "color = false\n").expect("write config");

    xml_assert()
        .arg("--config")
        .arg(&good)
        .arg("check")
        .arg(fixture("fixtures/catalog_expected.xml"))
        .assert()
        .success();

    let bad = dir.path().join("bad.toml");
    fs::write(&bad, "colour = false\n").expect("write config");

    xml_assert()
        .arg("--config")
        .arg(&bad)
        .arg("check")
        .arg(fixture("fixtures/catalog_expected.xml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse config file"));
}
