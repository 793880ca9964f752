// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scout - a pest-control lead-capture chat service.
//!
//! This is the binary entry point: the HTTP gateway, a terminal chat widget,
//! and configuration checks.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod chat;
mod serve;
mod shutdown;

use clap::{Parser, Subcommand};
use colored::Colorize;
use scout_config::model::ScoutConfig;

/// Scout - a pest-control lead-capture chat service.
#[derive(Parser, Debug)]
#[command(name = "scout", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP gateway.
    Serve,
    /// Chat with a running server from the terminal.
    Chat {
        /// Forget the persisted session and start a new conversation.
        #[arg(long)]
        reset: bool,
        /// Server base URL (overrides `widget.server_url`).
        #[arg(long, value_name = "URL")]
        server: Option<String>,
    },
    /// Inspect Scout configuration.
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Load and validate the configuration, then print a summary.
    Check,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match scout_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            scout_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => {
            init_tracing(&config.chat.log_level);
            serve::run_serve(config).await
        }
        Some(Commands::Chat { reset, server }) => {
            init_tracing("warn");
            let mut config = config;
            if let Some(server) = server {
                config.widget.server_url = server;
            }
            chat::run_chat(config, reset).await
        }
        Some(Commands::Config {
            action: ConfigCommands::Check,
        }) => {
            print_config_summary(&config);
            Ok(())
        }
        None => {
            println!("scout: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {e}", "error".red());
        std::process::exit(1);
    }
}

fn print_config_summary(config: &ScoutConfig) {
    println!("{}", "configuration ok".green());
    println!("  server      {}:{}", config.server.host, config.server.port);
    println!("  base url    {}", config.server.base_url());
    println!("  model       {}", config.anthropic.default_model);
    println!("  database    {}", config.storage.database_path);
    println!(
        "  media       {} (served at {})",
        config.media.upload_dir, config.media.url_prefix
    );
    println!("  max steps   {}", config.chat.max_steps);
    if config.anthropic.api_key.is_none() {
        println!(
            "  {}",
            "anthropic.api_key is unset; `scout serve` reads ANTHROPIC_API_KEY".yellow()
        );
    }
}

/// Initializes the tracing subscriber with the given log level.
///
/// `RUST_LOG` takes precedence when set. Output goes to stderr so the
/// terminal widget's conversation stays readable.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("scout={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}
