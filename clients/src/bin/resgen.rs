//! `resgen`: generates resource wrapper classes from ontology files.
//!
//! Each ontology class becomes one source file, written to a subdirectory
//! named after the class's namespace abbreviation. For example `nao:Tag` is
//! written to `nao/tag.rs` (or `nao/tag.h` with `--target qt`).
//!
//! **Usage:**
//! ```text
//! resgen [-o <path>] [-q] [--target rust|qt] [--config <file>] <ontology>...
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use resgen_codegen::{GeneratorConfig, Target};
use resgen_ontology::OntologyLoader;
use tracing_subscriber::EnvFilter;

/// Generate resource wrapper classes from ontologies.
#[derive(Parser)]
#[command(
    name = "resgen",
    about = "Generate resource wrapper classes from ontology files"
)]
struct Args {
    /// Destination folder (default: the current directory).
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Don't print status messages to stdout.
    #[arg(short, long)]
    quiet: bool,

    /// Output language: `rust` or `qt`.
    #[arg(long)]
    target: Option<Target>,

    /// TOML configuration file; command-line flags override its values.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Ontology files to use (.ttl, .nt, .trig or .nq).
    #[arg(value_name = "ONTOLOGY", required = true)]
    ontologies: Vec<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => GeneratorConfig::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => GeneratorConfig::default(),
    };
    if let Some(output) = args.output {
        config.output_dir = output;
    }
    if args.quiet {
        config.verbose = false;
    }
    if let Some(target) = args.target {
        config.target = target;
    }

    init_tracing(config.verbose);

    if config.verbose {
        let sources: Vec<String> = args
            .ontologies
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        println!("Generating from ontology files {}", sources.join(","));
        println!("Writing {} files to {}.", config.target, config.output_dir.display());
    }

    let store = OntologyLoader::load(&args.ontologies).context("Failed to load ontologies")?;
    let report = resgen_codegen::generate(&store, &config).with_context(|| {
        format!(
            "Failed to generate classes into {}",
            config.output_dir.display()
        )
    })?;

    if config.verbose {
        println!(
            "Generated {} classes with {} property accessors",
            report.class_count, report.accessor_count
        );
        println!(
            "Files: {} written, {} unchanged",
            report.files.len() - report.unchanged,
            report.unchanged
        );
        println!("Generation complete.");
    }
    Ok(())
}

/// `RUST_LOG` wins; otherwise `info` when verbose and `warn` when quiet.
fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
