//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the storyboard binary.

mod commands;
mod generate;
mod voices;

pub use commands::{Cli, Commands, GenerateArgs};
pub use generate::run_generate;
pub use voices::list_voices;
