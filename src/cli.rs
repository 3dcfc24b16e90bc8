use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand};

use crate::schema::Metric;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Normalize note performance exports and republish them as dashboard data",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Assemble the dashboard dataset and write it as JSON
    Build(BuildArgs),
    /// Embed the dataset into the dashboard page, optionally pushing it with git
    Publish(PublishArgs),
    /// Show the first few normalized notes in a formatted table
    Preview(PreviewArgs),
    /// Rank title keywords of the best-performing notes
    Keywords(KeywordsArgs),
    /// Show which input column each canonical field resolved to
    Columns(ColumnsArgs),
    /// Write the built-in pipeline configuration as YAML
    Config(ConfigArgs),
}

#[derive(Debug, Clone, Args)]
#[command(group(
    ArgGroup::new("source")
        .required(true)
        .args(["input", "dir"])
))]
pub struct InputArgs {
    /// Exported table to read (.xlsx, .xls, .ods, .csv, .tsv or `-` for stdin)
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,
    /// Folder to search for the newest export instead of naming a file
    #[arg(long = "dir")]
    pub dir: Option<PathBuf>,
    /// Worksheet to read from a workbook (defaults to the first sheet)
    #[arg(long)]
    pub sheet: Option<String>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of delimited input (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// YAML pipeline configuration overriding the built-in tables
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct BuildArgs {
    #[command(flatten)]
    pub source: InputArgs,
    /// Output JSON file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct PublishArgs {
    #[command(flatten)]
    pub source: InputArgs,
    /// Dashboard page containing the `const rawData = {...};` block
    #[arg(short = 'd', long = "document")]
    pub document: PathBuf,
    /// Commit and push the updated page with git
    #[arg(long)]
    pub push: bool,
    /// Commit message (defaults to a timestamped message)
    #[arg(short = 'm', long = "message", requires = "push")]
    pub message: Option<String>,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub source: InputArgs,
    /// Number of notes to display
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
}

#[derive(Debug, Args)]
pub struct KeywordsArgs {
    #[command(flatten)]
    pub source: InputArgs,
    /// Metric used to pick the best-performing notes
    #[arg(long, value_enum, default_value_t = Metric::Likes)]
    pub metric: Metric,
    /// Number of top notes whose titles are analyzed
    #[arg(long)]
    pub selection: Option<usize>,
    /// Number of keywords to display
    #[arg(long)]
    pub top: Option<usize>,
}

#[derive(Debug, Args)]
pub struct ColumnsArgs {
    #[command(flatten)]
    pub source: InputArgs,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Destination YAML file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
