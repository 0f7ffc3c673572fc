use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "xml-assert")]
#[command(about = "Check XML documents for semantic equivalence and shape")]
pub struct Cli {
    /// Optional TOML config file overriding the embedded defaults.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Compare two XML files and report the first difference.
    Equiv(EquivArgs),
    /// Check that a file is a well-formed XML document.
    Check(CheckArgs),
    /// Show the normalized structure of a single XML file.
    Inspect(InspectArgs),
    /// Check an attribute on an element of a file.
    Attr(AttrArgs),
}

#[derive(Parser, Debug)]
pub struct EquivArgs {
    /// Document under test.
    pub got: PathBuf,
    /// Reference document.
    pub expected: PathBuf,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Only set the exit status.
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Parser, Debug)]
pub struct CheckArgs {
    pub file: PathBuf,
}

#[derive(Parser, Debug)]
pub struct InspectArgs {
    pub file: PathBuf,
    #[arg(long, default_value_t = 3)]
    pub depth: usize,
}

#[derive(Parser, Debug)]
pub struct AttrArgs {
    pub file: PathBuf,
    /// Attribute name in `prefix:local` notation.
    pub name: String,
    /// Slash-separated lexical child path from the root, for example `items/item`.
    #[arg(long)]
    pub at: Option<String>,
    /// Required attribute value.
    #[arg(long)]
    pub value: Option<String>,
    /// Accepted attribute values.
    #[arg(long, num_args = 1..)]
    pub one_of: Option<Vec<String>>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
