//! Model IR Dump CLI
//!
//! Reads an OpenAPI / JSON Schema document, assembles every named schema and
//! prints the resulting model IR as JSON. Failures and diagnostics go to
//! stderr; the exit code is non-zero when any model failed.

use anyhow::{Context, Result};
use clap::Parser;
use schema_model::config::OutputFormat;
use schema_model::{GeneratorConfig, ModelAssembler, ModelDescriptor, PolicyPreset, SchemaTable};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema-model")]
#[command(about = "Dump the resolved model IR of a schema document")]
struct Cli {
    /// Schema document (JSON)
    input: PathBuf,

    /// Only these schemas (repeatable)
    #[arg(short, long)]
    schema: Vec<String>,

    /// Policy preset, overriding the config file
    #[arg(short, long, value_parser = parse_preset)]
    preset: Option<PolicyPreset>,

    /// Config file
    #[arg(short, long)]
    config: Option<String>,

    /// Assemble on one thread
    #[arg(long)]
    sequential: bool,

    /// Print diagnostics to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn parse_preset(s: &str) -> std::result::Result<PolicyPreset, String> {
    serde_json::from_value(serde_json::Value::String(s.to_lowercase()))
        .map_err(|_| format!("unknown preset '{}' (java, neutral, rust, typescript)", s))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(2);
        }
    }
}

/// Returns whether every requested model assembled
fn run(cli: Cli) -> Result<bool> {
    let mut config = GeneratorConfig::load_from(cli.config.as_deref()).context("loading configuration")?;
    if let Some(preset) = cli.preset {
        config.policy.preset = preset;
    }
    if cli.sequential {
        config.assembly.parallel = false;
    }

    let content = fs::read_to_string(&cli.input)
        .with_context(|| format!("reading {}", cli.input.display()))?;
    let table = SchemaTable::from_json_str(&content)
        .with_context(|| format!("parsing {}", cli.input.display()))?;

    let policy = config.policy.to_policy();
    let assembler = ModelAssembler::new(&table, &policy).with_settings(config.assembly);

    let mut ok = true;
    let models: Vec<ModelDescriptor> = if cli.schema.is_empty() {
        let report = assembler.assemble_all();
        for failure in &report.failures {
            eprintln!("error: {}", failure.error);
        }
        if cli.verbose {
            eprint!("{}", report.diagnostics());
        }
        ok = report.is_success();
        report.models.iter().map(|m| m.as_ref().clone()).collect()
    } else {
        let mut models = Vec::new();
        for name in &cli.schema {
            match assembler.assemble_named(name) {
                Ok(model) => {
                    if cli.verbose && !model.diagnostics.is_empty() {
                        eprint!("{}", model.diagnostics);
                    }
                    models.push(model.as_ref().clone());
                }
                Err(e) => {
                    eprintln!("error: {}", e);
                    ok = false;
                }
            }
        }
        models
    };

    let json = match config.output.format {
        OutputFormat::Pretty => serde_json::to_string_pretty(&models)?,
        OutputFormat::Compact => serde_json::to_string(&models)?,
    };
    println!("{}", json);

    Ok(ok)
}
