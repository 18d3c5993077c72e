//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Hudline status line engine CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: hudline.toml)
    #[arg(short = 'C', long, default_value = "hudline.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Write a starter configuration file
    #[command(visible_alias = "i")]
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },

    /// Run the refresh loop over simulated users
    #[command(visible_alias = "r")]
    Run {
        /// Number of simulated users to attach
        #[arg(short, long, default_value_t = 4)]
        users: usize,

        /// Stop after this many cycles (0 = run until interrupted)
        #[arg(short = 'n', long, default_value_t = 0)]
        cycles: u64,
    },

    /// Render one frame from a format template and report on it
    #[command(visible_alias = "c")]
    Check {
        /// Status line template to check instead of the stored one
        #[arg(short, long)]
        format: Option<String>,

        /// Load this user's stored settings first
        #[arg(short, long)]
        user: Option<String>,

        /// Emit the report as JSON
        #[arg(short, long)]
        json: bool,
    },
}

#[allow(unused)]
impl Cli {
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Commands::Init { .. })
    }
    pub const fn is_run(&self) -> bool {
        matches!(self.command, Commands::Run { .. })
    }
    pub const fn is_check(&self) -> bool {
        matches!(self.command, Commands::Check { .. })
    }
}
