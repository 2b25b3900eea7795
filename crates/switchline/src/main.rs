// SPDX-FileCopyrightText: 2026 Switchline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Switchline - call queue coordination and status broadcasting.
//!
//! This is the binary entry point for the Switchline service.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};

mod serve;
mod shutdown;

/// Switchline - call queue coordination and status broadcasting.
#[derive(Parser, Debug)]
#[command(name = "switchline", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Switchline service.
    Serve,
    /// Manage Switchline configuration.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the effective configuration as TOML.
    Show,
    /// Load and validate a configuration file, reporting any errors.
    Check {
        /// Path to the TOML file. Defaults to the XDG hierarchy.
        file: Option<std::path::PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve) => {
            let config = load_or_exit();
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("switchline serve failed: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config { action }) => run_config(action),
        None => {
            println!("switchline: use --help for available commands");
        }
    }
}

fn load_or_exit() -> switchline_config::SwitchlineConfig {
    match switchline_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            switchline_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

fn run_config(action: ConfigAction) {
    match action {
        ConfigAction::Show => {
            let config = load_or_exit();
            match toml::to_string_pretty(&config) {
                Ok(rendered) => print!("{rendered}"),
                Err(e) => {
                    eprintln!("failed to render config: {e}");
                    std::process::exit(1);
                }
            }
        }
        ConfigAction::Check { file } => {
            let result = match file {
                Some(path) => match std::fs::read_to_string(&path) {
                    Ok(content) => switchline_config::load_and_validate_str(&content),
                    Err(e) => {
                        eprintln!("cannot read {}: {e}", path.display());
                        std::process::exit(1);
                    }
                },
                None => switchline_config::load_and_validate(),
            };
            match result {
                Ok(_) => println!("configuration OK"),
                Err(errors) => {
                    switchline_config::render_errors(&errors);
                    std::process::exit(1);
                }
            }
        }
    }
}
