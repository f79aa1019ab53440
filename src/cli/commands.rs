//! Command definitions for the interval timer CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::plan::validation::MAX_REPETITIONS;
use crate::plan::MAX_NAME_LENGTH;

// ============================================================================
// CLI Structure
// ============================================================================

/// Interval Timer CLI - segment-based workout timer
#[derive(Parser, Debug)]
#[command(
    name = "interval-timer",
    version,
    about = "Segment-based interval workout timer",
    long_about = "Plan interval workouts (simple work/rest cycles, built-in presets or \n\
                  custom segment lists) and run them in the terminal.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding stored plans
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Path to the config file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Manage workout plans
    Plans {
        #[command(subcommand)]
        command: PlanCommands,
    },

    /// Make a plan the active one
    Activate {
        /// Plan id (stored or built-in)
        id: String,
    },

    /// Clear the active plan
    Deactivate,

    /// Show the active plan
    Active,

    /// Run a workout in the foreground
    Run(RunArgs),

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Plan management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum PlanCommands {
    /// List stored plans
    List,

    /// Show one plan and its segment sequence
    Show {
        /// Plan id (stored or built-in)
        id: String,
    },

    /// List the built-in presets
    Presets,

    /// Add or replace a plan from a JSON file ("-" reads stdin)
    Add {
        #[arg(short, long, value_name = "PATH")]
        file: PathBuf,
    },

    /// Add a simple work/rest plan
    AddSimple(AddSimpleArgs),

    /// Delete a stored plan
    Delete {
        /// Plan id
        id: String,
    },
}

// ============================================================================
// Command Arguments
// ============================================================================

/// Arguments for the add-simple command
#[derive(Args, Debug, Clone)]
pub struct AddSimpleArgs {
    /// Plan name
    #[arg(short, long, value_parser = validate_plan_name)]
    pub name: String,

    /// Work duration in seconds (1-3600)
    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(u32).range(1..=3600)
    )]
    pub work: u32,

    /// Rest duration in seconds (1-3600)
    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(u32).range(1..=3600)
    )]
    pub rest: u32,

    /// Number of work intervals (1-100)
    #[arg(
        long,
        default_value = "1",
        value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_REPETITIONS))
    )]
    pub reps: u32,

    /// Seconds before the end of a segment to sound the alert (1-60)
    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(u32).range(1..=60)
    )]
    pub alert: Option<u32>,

    /// Optional description
    #[arg(short, long)]
    pub description: Option<String>,
}

/// Arguments for the run command
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Plan id to run instead of the active plan
    #[arg(short, long)]
    pub plan: Option<String>,

    /// Disable the terminal bell
    #[arg(long)]
    pub no_bell: bool,
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Validates the plan name.
///
/// - Must not be blank
/// - Must not exceed 100 characters
fn validate_plan_name(s: &str) -> Result<String, String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err("Plan name is required".to_string());
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(format!(
            "Plan name must be {} characters or less",
            MAX_NAME_LENGTH
        ));
    }
    Ok(trimmed.to_string())
}

// ============================================================================
// Tests
// ============================================================================
