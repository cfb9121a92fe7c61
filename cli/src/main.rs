//! attrproc CLI: driving adapter for the span attribute processor.
//!
//! Subcommands:
//! - `check <config>`: validate a processor config
//! - `process <config> <spans>`: run a batch through the processor, print the result
//! - `explain <config> <spans>`: print each span's scope decision
//!
//! `<spans>` is a JSON array of spans; `-` reads it from stdin.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use attrproc::{AttributeProcessor, ExportResult, ProcessorConfig, Span, SpanExporter};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

const USAGE_EXAMPLES: &str = "\
EXAMPLES:
    # Validate a config
    attrproc check redact.yaml

    # Apply a config to a batch of spans
    attrproc process redact.yaml spans.json

    # See why each span was or was not processed
    RUST_LOG=attrproc=trace attrproc explain redact.yaml spans.json";

#[derive(Parser)]
#[command(version, about, long_about = None, after_help = USAGE_EXAMPLES)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a processor config
    Check {
        /// Config file (.json, otherwise YAML)
        config: PathBuf,
    },

    /// Apply a processor config to a batch of spans and print the result
    Process {
        /// Config file (.json, otherwise YAML)
        config: PathBuf,

        /// JSON array of spans, or `-` for stdin
        spans: PathBuf,
    },

    /// Print the scope decision for every span in a batch
    Explain {
        /// Config file (.json, otherwise YAML)
        config: PathBuf,

        /// JSON array of spans, or `-` for stdin
        spans: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    match Args::parse().command {
        Command::Check { config } => cmd_check(&config),
        Command::Process { config, spans } => cmd_process(&config, &spans),
        Command::Explain { config, spans } => cmd_explain(&config, &spans),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Commands
// ═══════════════════════════════════════════════════════════════════════════════

fn cmd_check(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let validated = attrproc::validate(config)
        .with_context(|| format!("config invalid: {}", config_path.display()))?;

    println!(
        "Config valid ({}: {} action(s))",
        display_name(validated.name()),
        validated.actions().len()
    );
    Ok(())
}

fn cmd_process(config_path: &Path, spans_path: &Path) -> Result<()> {
    let processor = build_processor(config_path, StdoutExporter)?;
    let batch = load_spans(spans_path)?;

    match processor.export(batch) {
        ExportResult::Success => Ok(()),
        ExportResult::Failure(reason) => bail!("export failed: {reason}"),
    }
}

fn cmd_explain(config_path: &Path, spans_path: &Path) -> Result<()> {
    let processor = build_processor(config_path, StdoutExporter)?;
    let batch = load_spans(spans_path)?;

    let traces: Vec<_> = batch.iter().map(|span| processor.explain(span)).collect();
    println!("{}", serde_json::to_string_pretty(&traces)?);
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// Exporter
// ═══════════════════════════════════════════════════════════════════════════════

/// Writes each batch to stdout as a pretty-printed JSON array.
struct StdoutExporter;

impl SpanExporter for StdoutExporter {
    fn export(&self, batch: Vec<Span>) -> ExportResult {
        let json = match serde_json::to_string_pretty(&batch) {
            Ok(json) => json,
            Err(e) => return ExportResult::Failure(e.to_string()),
        };
        let mut stdout = io::stdout().lock();
        match writeln!(stdout, "{json}") {
            Ok(()) => ExportResult::Success,
            Err(e) => ExportResult::Failure(e.to_string()),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Loading
// ═══════════════════════════════════════════════════════════════════════════════

fn build_processor<E: SpanExporter>(
    config_path: &Path,
    exporter: E,
) -> Result<AttributeProcessor<E>> {
    let config = load_config(config_path)?;
    AttributeProcessor::from_config(config, exporter)
        .with_context(|| format!("config invalid: {}", config_path.display()))
}

fn load_config(path: &Path) -> Result<ProcessorConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read \"{}\"", path.display()))?;
    parse_config(path, &content)
}

fn parse_config(path: &Path, content: &str) -> Result<ProcessorConfig> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let parsed = if is_json {
        ProcessorConfig::from_json(content)
    } else {
        // Default to YAML (handles .yaml and .yml)
        ProcessorConfig::from_yaml(content)
    };
    parsed.with_context(|| format!("failed to parse \"{}\"", path.display()))
}

fn load_spans(path: &Path) -> Result<Vec<Span>> {
    let content = if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read spans from stdin")?;
        buf
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("failed to read \"{}\"", path.display()))?
    };
    let spans = parse_spans(&content)
        .with_context(|| format!("invalid spans in \"{}\"", path.display()))?;
    tracing::debug!(path = %path.display(), spans = spans.len(), "loaded spans");
    Ok(spans)
}

fn parse_spans(content: &str) -> Result<Vec<Span>> {
    Ok(serde_json::from_str(content)?)
}

fn display_name(name: &str) -> &str {
    if name.is_empty() {
        "<unnamed>"
    } else {
        name
    }
}
