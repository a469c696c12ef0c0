//! status-badge-host: native messaging host for the status badge extension.
//!
//! The extension's background shim forwards platform events and runtime
//! messages here over stdio and performs whatever badge calls, tab queries and
//! replies come back.
//!
//! ## Subcommands
//!
//! - `serve` (default): native messaging loop on stdin/stdout
//! - `replay`: run a JSON-lines signal trace and print the resulting commands
//! - `check-config`: validate the config file and print the badge palette

mod config;
mod framing;
mod logging;
mod replay;
mod serve;

use clap::{Parser, Subcommand};
use status_badge_core::BadgeEngine;
use status_badge_protocol::PROTOCOL_VERSION;
use std::io;
use std::path::PathBuf;

use config::{load_config, resolve_config_path, HostConfig};

#[derive(Parser)]
#[command(name = "status-badge-host")]
#[command(about = "Tracks top-level response status per tab and drives the extension badge")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.status-badge/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,

    /// Calling extension origin, supplied by the browser
    #[arg(value_name = "ORIGIN", hide = true)]
    origin: Option<String>,

    /// Native window handle, supplied by the browser on Windows
    #[arg(long, hide = true)]
    parent_window: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the native messaging loop on stdin/stdout
    Serve,

    /// Replay a JSON-lines file of host signals and print the commands
    Replay {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Validate the config file and print the badge palette
    CheckConfig,
}

fn main() {
    let cli = Cli::parse();
    let _logging_guard = logging::init();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            tracing::info!(
                origin = ?cli.origin,
                protocol_version = PROTOCOL_VERSION,
                "Status badge host started"
            );
            let mut engine = BadgeEngine::new(load_or_default(cli.config).badge);
            if let Err(err) = serve::run(&mut engine, io::stdin().lock(), io::stdout().lock()) {
                tracing::error!(error = %err, "Message channel failed");
                std::process::exit(1);
            }
        }
        Commands::Replay { file } => {
            let mut engine = BadgeEngine::new(load_or_default(cli.config).badge);
            let mut stdout = io::stdout().lock();
            if let Err(err) = replay::replay_file(&mut engine, &file, &mut stdout) {
                tracing::error!(error = %err, file = %file.display(), "Replay failed");
                eprintln!("{}", err);
                std::process::exit(1);
            }
        }
        Commands::CheckConfig => {
            let loaded = resolve_config_path(cli.config).and_then(|path| {
                let config = load_config(&path)?;
                Ok((path, config))
            });
            match loaded {
                Ok((path, config)) => {
                    println!("config: {}", path.display());
                    match toml::to_string_pretty(&config) {
                        Ok(rendered) => print!("{}", rendered),
                        Err(err) => {
                            eprintln!("Failed to render config: {}", err);
                            std::process::exit(1);
                        }
                    }
                }
                Err(err) => {
                    eprintln!("{}", err);
                    std::process::exit(1);
                }
            }
        }
    }
}

/// Serving must not fail on a bad config file; fall back to defaults.
fn load_or_default(explicit: Option<PathBuf>) -> HostConfig {
    match resolve_config_path(explicit).and_then(|path| load_config(&path)) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(error = %err, "Failed to load config; using defaults");
            HostConfig::default()
        }
    }
}
