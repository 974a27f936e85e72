#![deny(unsafe_code)]
//! CLI binary for the faultline geometry producers.
//!
//! Subcommands:
//! - `render <engine>`: build an engine, run N ticks, write a PNG
//! - `replay <seed.json>`: rebuild a recorded run and write a PNG
//! - `list`: print available engines (with parameter schemas under `--json`)
//!
//! Set `RUST_LOG=info` (or `debug` for per-particle events) to trace the
//! generation pipeline on stderr.

mod error;

use clap::{Parser, Subcommand};
use error::CliError;
use faultline_core::seed::DEFAULT_DT;
use faultline_core::{Engine, Seed};
use faultline_engines::EngineKind;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "faultline", about = "Procedural terrain and particle geometry CLI")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build an engine, run N ticks and write a PNG snapshot.
    Render {
        /// Engine name ("terrain" or "particles").
        engine: String,

        /// PRNG seed for deterministic output.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Number of fixed ticks to run before the snapshot.
        #[arg(short, long, default_value_t = 600)]
        steps: usize,

        /// Tick length in seconds.
        #[arg(long, default_value_t = DEFAULT_DT)]
        dt: f64,

        /// Engine parameters as a JSON string.
        #[arg(long, default_value = "{}")]
        params: String,

        /// Snapshot edge length in pixels (particles only; terrain uses one
        /// pixel per vertex).
        #[arg(long, default_value_t = 256)]
        size: usize,

        /// Output file path.
        #[arg(short, long, default_value = "output.png")]
        output: PathBuf,

        /// Also write the run description as a seed file for `replay`.
        #[arg(long)]
        save_seed: Option<PathBuf>,
    },
    /// Rebuild a run from a seed file and write a PNG snapshot.
    Replay {
        /// Path to a seed JSON file.
        seed_file: PathBuf,

        /// Snapshot edge length in pixels (particles only).
        #[arg(long, default_value_t = 256)]
        size: usize,

        /// Output file path.
        #[arg(short, long, default_value = "output.png")]
        output: PathBuf,
    },
    /// List available engines.
    List,
}

fn read_seed(path: &Path) -> Result<Seed, CliError> {
    let text = fs::read_to_string(path)
        .map_err(|e| CliError::Io(format!("cannot read {}: {e}", path.display())))?;
    serde_json::from_str(&text)
        .map_err(|e| CliError::Input(format!("invalid seed file {}: {e}", path.display())))
}

fn write_seed(seed: &Seed, path: &Path) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(seed)?;
    fs::write(path, text).map_err(|e| CliError::Io(format!("cannot write {}: {e}", path.display())))
}

/// Runs `seed`, writes the snapshot and reports the result.
fn render_seed(seed: &Seed, size: usize, output: &Path, json_mode: bool) -> Result<(), CliError> {
    let engine = EngineKind::replay(seed)?;
    faultline_engines::snapshot::write_png(&engine, size, output)?;
    let summary = engine.summary();
    log::debug!("{} summary: {summary}", engine.name());

    if json_mode {
        let info = json!({
            "engine": seed.engine,
            "seed": seed.seed,
            "steps": seed.steps,
            "dt": seed.dt,
            "output": output.display().to_string(),
            "summary": summary,
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        eprintln!(
            "rendered {} ({} steps of {:.4}s, seed {}) -> {}",
            seed.engine,
            seed.steps,
            seed.dt,
            seed.seed,
            output.display()
        );
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let engines = EngineKind::list_engines();
            if cli.json {
                let mut schemas = serde_json::Map::new();
                for name in engines {
                    let engine = EngineKind::from_name(name, 0, &json!({}))?;
                    schemas.insert(name.to_string(), engine.param_schema());
                }
                let info = json!({
                    "engines": engines,
                    "params": Value::Object(schemas),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Engines:");
                for name in engines {
                    println!("  {name}");
                }
            }
        }
        Command::Render {
            engine,
            seed,
            steps,
            dt,
            params,
            size,
            output,
            save_seed,
        } => {
            let params: Value = serde_json::from_str(&params)
                .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
            let run = Seed {
                engine,
                params,
                seed,
                steps,
                dt,
            };
            render_seed(&run, size, &output, cli.json)?;
            if let Some(path) = save_seed {
                write_seed(&run, &path)?;
                log::info!("wrote seed file {}", path.display());
            }
        }
        Command::Replay {
            seed_file,
            size,
            output,
        } => {
            let seed = read_seed(&seed_file)?;
            render_seed(&seed, size, &output, cli.json)?;
        }
    }

    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
