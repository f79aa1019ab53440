//! CLI module for the interval timer.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `display`: Output formatting and display logic
//! - `session`: Foreground workout loop

pub mod commands;
pub mod display;
pub mod session;

pub use commands::{AddSimpleArgs, Cli, Commands, PlanCommands, RunArgs};
pub use display::Display;
pub use session::{run_session, Control, SessionOutcome};
