use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use xml_assert::inspect::render_tree;
use xml_assert::report::{render_equivalent, render_mismatch};
use xml_assert::{embedded_config, load_config, AssertConfig, AttributeExpectation, XmlAssert};
use xml_equiv_core::{
    compare_documents, format_json, parse_file, EquivalenceError, NormalizedElement, XmlElement,
};

mod cli;

use cli::{AttrArgs, CheckArgs, Cli, Command, EquivArgs, InspectArgs, OutputFormat};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let cli = Cli::parse();
    let config = resolve_config(cli.config.as_deref())?;
    if cli.no_color || !config.color {
        colored::control::set_override(false);
    }
    let xml = XmlAssert::new(config);

    match cli.command {
        Command::Equiv(args) => run_equiv(args),
        Command::Check(args) => run_check(&xml, args),
        Command::Inspect(args) => run_inspect(args),
        Command::Attr(args) => run_attr(&xml, args),
    }
}

fn resolve_config(path: Option<&Path>) -> Result<AssertConfig> {
    match path {
        Some(path) => {
            let config = load_config(path)?;
            debug!(path = %path.display(), "loaded config");
            Ok(config)
        }
        None => Ok(embedded_config()),
    }
}

fn run_equiv(args: EquivArgs) -> Result<()> {
    let got = read(&args.got)?;
    let expected = read(&args.expected)?;

    let mismatch = match compare_documents(&got, &expected) {
        Ok(()) => {
            if !args.quiet {
                match args.format {
                    OutputFormat::Text => println!("{}", render_equivalent()),
                    OutputFormat::Json => println!("{{\"equivalent\": true}}"),
                }
            }
            return Ok(());
        }
        Err(EquivalenceError::Mismatch(mismatch)) => mismatch,
        Err(err) => {
            return Err(err).with_context(|| {
                format!(
                    "failed to compare {} with {}",
                    args.got.display(),
                    args.expected.display()
                )
            })
        }
    };

    if args.quiet {
        debug!(%mismatch, "documents are not equivalent");
        std::process::exit(1);
    }
    match args.format {
        OutputFormat::Text => println!("{}", render_mismatch(&mismatch)),
        OutputFormat::Json => println!(
            "{}",
            format_json(&mismatch).context("failed to serialize mismatch report")?
        ),
    }
    bail!("documents are not equivalent: {mismatch}");
}

fn run_check(xml: &XmlAssert, args: CheckArgs) -> Result<()> {
    let data = read(&args.file)?;
    let root = xml
        .document(&data)
        .with_context(|| format!("{} is not well-formed", args.file.display()))?;
    println!("ok root={}", root.lexical_name());
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    let root = parse_file(&args.file)
        .with_context(|| format!("failed to parse {}", args.file.display()))?;
    print!(
        "{}",
        render_tree(&NormalizedElement::from_element(&root), args.depth)
    );
    Ok(())
}

fn run_attr(xml: &XmlAssert, args: AttrArgs) -> Result<()> {
    let root = parse_file(&args.file)
        .with_context(|| format!("failed to parse {}", args.file.display()))?;
    let target = match &args.at {
        Some(path) => descend(&root, path)
            .with_context(|| format!("element '{path}' not found in {}", args.file.display()))?,
        None => &root,
    };

    let expectation = AttributeExpectation::from_options(args.value, args.one_of)?;
    xml.has_attribute(target, &args.name, &expectation)?;
    println!("ok {}@{}", target.lexical_name(), args.name);
    Ok(())
}

fn descend<'a>(root: &'a XmlElement, path: &str) -> Option<&'a XmlElement> {
    let mut current = root;
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        current = current
            .child_elements()
            .find(|child| child.lexical_name() == segment)?;
    }
    Some(current)
}

fn read(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}
