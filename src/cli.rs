use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stratum")]
#[command(version)]
#[command(about = "Check, configure and render middleware system configuration", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check declared objectives against a system
    Check(CheckArgs),

    /// Bring a system in line with declared objectives
    Configure(ApplyArgs),

    /// Undo declared objectives on a system
    Purge(ApplyArgs),

    /// Render a configuration template
    Render(RenderArgs),

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ============================================================================
// Objectives
// ============================================================================

/// Which system to run against and which declarations to use
#[derive(Args)]
pub struct TargetArgs {
    /// System from config.toml (defaults to `default_system`)
    #[arg(short, long)]
    pub system: Option<String>,

    /// Inventory file to check against instead of the system's own
    #[arg(long, value_name = "FILE")]
    pub inventory: Option<PathBuf>,

    /// Declaration files, or directories of them
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

#[derive(Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Print the results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Dry run - show what would be done
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

// ============================================================================
// Render
// ============================================================================

#[derive(Args)]
pub struct RenderArgs {
    /// Template file to render
    pub template: PathBuf,

    /// System whose properties fill the template
    #[arg(short, long)]
    pub system: Option<String>,

    /// Organization whose properties override the system's
    #[arg(short, long)]
    pub organization: Option<String>,

    /// Set a variable (KEY=VALUE), overriding configured ones
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub set: Vec<(String, String)>,

    /// Write the result to FILE instead of stdout
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Parse a `KEY=VALUE` pair
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

// ============================================================================
// Config Commands
// ============================================================================

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show config file location and configured systems
    Show,
}
