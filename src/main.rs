//! Attach Layout CLI
//!
//! Usage:
//!   attach-layout [OPTIONS] [FILE]
//!
//! Options:
//!   -c, --config <FILE>  Layout configuration (TOML format)
//!   --strict             Fail when references remain pending
//!   -v, --verbose        Log deferral and resolution
//!   -h, --help           Print help

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use attach_layout::{LayoutConfig, Scene, SceneError};

#[derive(Parser)]
#[command(name = "attach-layout")]
#[command(about = "Replay a layout scene and print what reaches the native side")]
struct Cli {
    /// Scene file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Layout configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Exit with an error when references remain pending
    #[arg(long)]
    strict: bool,

    /// Log deferral and resolution of references
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = match &cli.config {
        Some(path) => match LayoutConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => LayoutConfig::default(),
    };

    let source = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => buffer,
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let report = match Scene::from_json(&source).and_then(|scene| scene.replay(config)) {
        Ok(report) => report,
        Err(e) => {
            report_error(&e);
            std::process::exit(1);
        }
    };

    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }

    if cli.strict && !report.pending.is_empty() {
        for p in &report.pending {
            eprintln!("Error: '{}' of {} did not resolve", p.edge, p.widget);
        }
        std::process::exit(1);
    }
}

fn report_error(error: &SceneError) {
    if let SceneError::Layout { source, .. } = error {
        if let (Some(selector), Some(key)) = (source.selector_error(), source.key()) {
            eprint!("{}", selector.format(key));
        }
    }
    eprintln!("Error: {}", error);
}
