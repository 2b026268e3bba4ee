// src/main.rs

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;
use serde_json::{json, Map, Value};

use octatilt::model::symmetry::{AsGiven, MoyoPrimitive, SymmetryPrimitive};
use octatilt::utils::{logger, report};
use octatilt::{Structure, TiltingConfig, TiltingEngine};

/// Octatilt - octahedral tilting angles of perovskite structures
#[derive(Parser, Debug)]
#[command(name = "octatilt", version, about)]
struct Cli {
    /// Structures to analyze (JSON: lattice, atoms, optional periodicity)
    #[arg(value_name = "STRUCTURE", required_unless_present = "write_config")]
    inputs: Vec<PathBuf>,

    /// Settings file; defaults to the per-user settings.json
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Input cells are already refined; skip symmetry standardization
    #[arg(long)]
    as_given: bool,

    /// Print {file: {index: [alpha, beta, gamma]}} instead of text
    #[arg(long)]
    json: bool,

    /// Debug output on stderr
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Errors only on stderr
    #[arg(short, long)]
    quiet: bool,

    /// Store the effective settings in the per-user settings file and exit
    #[arg(long)]
    write_config: bool,
}

fn read_structure(path: &Path) -> Result<Structure, String> {
    let file = File::open(path).map_err(|e| format!("cannot open {}: {}", path.display(), e))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| format!("cannot parse {}: {}", path.display(), e))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else if cli.quiet {
        LevelFilter::Error
    } else {
        LevelFilter::Info
    };
    if let Err(e) = logger::init(level) {
        eprintln!("Logger init failed: {}", e);
    }

    let config = match &cli.config {
        Some(path) => match TiltingConfig::load_from(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::error!("{} ({})", e, path.display());
                return ExitCode::FAILURE;
            }
        },
        None => TiltingConfig::load(),
    };

    if cli.write_config {
        return match config.save() {
            Ok(path) => {
                log::info!("Config saved to {:?}", path);
                ExitCode::SUCCESS
            }
            Err(e) => {
                log::error!("Failed to save config: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    let primitive: Box<dyn SymmetryPrimitive> = if cli.as_given {
        Box::new(AsGiven)
    } else {
        Box::new(MoyoPrimitive)
    };
    let engine = TiltingEngine::with_primitive(config, primitive);

    // Unreadable inputs count as failures but do not stop the others
    let mut names = Vec::new();
    let mut structures = Vec::new();
    let mut failures = 0;
    for path in &cli.inputs {
        match read_structure(path) {
            Ok(s) => {
                names.push(path.display().to_string());
                structures.push(s);
            }
            Err(e) => {
                log::error!("{}", e);
                failures += 1;
            }
        }
    }

    let results = engine.analyze_many(&structures);
    let mut json_out = Map::new();

    for (name, result) in names.iter().zip(results) {
        match result {
            Ok(analysis) => {
                if cli.json {
                    json_out.insert(name.clone(), json!(analysis.angles));
                } else {
                    println!("File: {}", name);
                    print!("{}", report::tilting_summary(&analysis));
                    print!("{}", report::tilting_table(&analysis));
                    println!();
                }
            }
            Err(e) => {
                log::error!("{}: {}", name, e);
                if cli.json {
                    json_out.insert(name.clone(), json!({ "error": e.to_string() }));
                }
                failures += 1;
            }
        }
    }

    if cli.json {
        match serde_json::to_string_pretty(&Value::Object(json_out)) {
            Ok(text) => println!("{}", text),
            Err(e) => log::error!("Failed to serialize results: {}", e),
        }
    }

    if failures == cli.inputs.len() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
