//! authoring-admin: run publication lifecycle scripts against an in-memory store
//!
//! Used for demos and smoke checks of lifecycle definitions.

mod script;

use std::path::PathBuf;

use anyhow::{Context, Result};
use authoring_lifecycle::adapters::InMemoryLifecycleRegistry;
use authoring_lifecycle::LifecycleConfig;
use authoring_telemetry::{init_logging, TelemetryConfig};
use clap::{Parser, Subcommand};

use crate::script::{default_lifecycles, Runner, Script};

/// authoring-admin: publication lifecycle operator tool
#[derive(Parser, Debug)]
#[command(name = "authoring-admin")]
#[command(about = "Run publication lifecycle scripts against an in-memory store")]
struct Args {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Execute a JSON script and print the resulting item reports
    Run {
        /// Script file
        #[arg(short, long)]
        script: PathBuf,

        /// Lifecycle definitions file; a single default lifecycle otherwise
        #[arg(short, long)]
        lifecycles: Option<PathBuf>,

        /// User performing the transitions
        #[arg(short, long, default_value = "admin")]
        user: String,
    },
    /// List the states advertised to editors
    States,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let telemetry = TelemetryConfig::from_env().with_json_logs(args.json_logs);
    init_logging(&telemetry).context("cannot initialize logging")?;

    let config = LifecycleConfig::from_env();
    match args.command {
        Command::Run {
            script,
            lifecycles,
            user,
        } => {
            let registry = match lifecycles {
                Some(path) => InMemoryLifecycleRegistry::from_json_file(&path)
                    .with_context(|| format!("cannot load lifecycles from {}", path.display()))?,
                None => default_lifecycles(&config)?,
            };
            let script = Script::from_file(&script)?;
            let reports = Runner::new(config, registry, &user).run(&script)?;
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
        Command::States => {
            println!("{} ({})", config.lifecycle_name, config.lifecycle_type);
            for state in authoring_lifecycle::POSSIBLE_STATES {
                println!("  {state}");
            }
        }
    }
    Ok(())
}
