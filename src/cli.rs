use crate::ast::Node;
use crate::config::load_config;
use crate::layout::{size_tree, text_measure_for};
use crate::layout_dump::{LayoutDump, write_dump};
use crate::source::SourceGen;
use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "llay",
    version,
    about = "Size the boxes of a sequence-style program diagram"
)]
pub struct Args {
    /// Input tree (.json) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file for the layout dump. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Config file (JSON5) overriding the default sizing constants
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Measure text with the built-in glyph table instead of system fonts
    #[arg(long = "fastText")]
    pub fast_text: bool,

    /// Pretty-print the dump
    #[arg(long = "pretty")]
    pub pretty: bool,

    /// Log sizing decisions to stderr (repeat for more detail)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = load_config(args.config.as_deref())?;
    if args.fast_text {
        config.sizing.text.fast_text_metrics = true;
    }
    if args.pretty {
        config.dump.pretty = true;
    }

    let input = read_input(args.input.as_deref())?;
    let mut tree: Node = serde_json::from_str(&input).context("input is not a valid node tree")?;

    let metrics = text_measure_for(&config.sizing.text);
    size_tree(&mut tree, &config.sizing, &*metrics, &SourceGen);

    let dump = LayoutDump::from_tree(&tree, &config.dump);
    tracing::debug!(boxes = dump.boxes.len(), "writing layout dump");
    write_dump(&dump, args.output.as_deref(), config.dump.pretty)
        .with_context(|| match &args.output {
            Some(path) => format!("failed to write {}", path.display()),
            None => "failed to write to stdout".to_string(),
        })
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_long_flags() {
        let args = Args::try_parse_from([
            "llay",
            "-i",
            "tree.json",
            "--configFile",
            "sizing.json5",
            "--fastText",
            "-vv",
        ])
        .expect("args");
        assert_eq!(args.input.as_deref(), Some(Path::new("tree.json")));
        assert_eq!(args.config.as_deref(), Some(Path::new("sizing.json5")));
        assert!(args.fast_text);
        assert!(!args.pretty);
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn missing_input_file_reports_path() {
        let err = read_input(Some(Path::new("/nonexistent/tree.json"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/tree.json"));
    }
}
