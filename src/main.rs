//! Hudline - a per-user status line engine.

#![allow(dead_code)]

mod cli;
mod config;
mod core;
mod format;
mod hud;
mod logger;
mod utils;
mod world;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::{HudConfig, init_config};

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    logger::set_verbose(cli.verbose);

    let config = init_config(HudConfig::load(cli)?);

    match &cli.command {
        Commands::Init { force } => cli::init::new_config(&config, *force),
        Commands::Run { users, cycles } => cli::run::run_loop(*users, *cycles),
        Commands::Check { format, user, json } => {
            cli::check::run_check(format.as_deref(), user.as_deref(), *json, &config)
        }
    }
}
