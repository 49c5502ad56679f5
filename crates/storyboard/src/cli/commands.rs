//! CLI command definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use storyboard::SpeechLanguage;

/// Storyboard - turn a prompt into an illustrated, narrated short story
#[derive(Parser, Debug)]
#[command(name = "storyboard")]
#[command(about = "Turn a prompt into an illustrated, narrated short story", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a new sequence from a prompt
    Generate(GenerateArgs),

    /// List the available narration voices
    Voices {
        /// Only show voices for this language (e.g. british-english)
        #[arg(long)]
        language: Option<SpeechLanguage>,
    },
}

/// Options for the generate command
#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// What the story is about
    #[arg(long)]
    pub prompt: String,

    /// Animate every scene into a clip of this many seconds (5 or 10)
    #[arg(long)]
    pub animate: Option<u32>,

    /// Narrate every scene's dialogue
    #[arg(long)]
    pub speech: bool,

    /// Voice id for narration (see `storyboard voices`)
    #[arg(long)]
    pub voice: Option<String>,

    /// Compose the first animated and narrated scene into one clip
    #[arg(long)]
    pub compose: bool,

    /// Burn captions into the composed clip (implies --compose)
    #[arg(long)]
    pub caption: bool,

    /// Read configuration from this file instead of the default locations
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the finished sequence as JSON
    #[arg(long)]
    pub json: bool,
}
