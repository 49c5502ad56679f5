//! Storyboard - AI storyboard generation
//!
//! Turns a one-line prompt into a short illustrated story: a narrative,
//! one image per scene, and on request an animated clip, narrated speech,
//! a composed clip and burned-in captions for it.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use storyboard::{Storyboard, StoryboardConfig, VideoDuration, http_collaborators};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = StoryboardConfig::load()?;
//!     let board = Storyboard::new(http_collaborators(&config)?, config.storyboard.clone())?;
//!
//!     let id = board.create_sequence("a cat's day").await?;
//!     board.animate_scene(id, 0, VideoDuration::Five).await?;
//!     println!("{:?}", board.sequence(id));
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `storyboard_core` - sequences, scenes, task keys, voices
//! - `storyboard_error` - error types
//! - `storyboard_interface` - collaborator service traits
//! - `storyboard_cache` - in-flight request de-duplication
//! - `storyboard_config` - layered TOML configuration
//! - `storyboard_models` - HTTP adapters for the hosted services
//! - `storyboard_orchestrator` - task tracking and the generation intents
//!
//! This crate re-exports everything for convenience.

pub use storyboard_cache::*;
pub use storyboard_config::*;
pub use storyboard_core::*;
pub use storyboard_error::*;
pub use storyboard_interface::*;
pub use storyboard_models::*;
pub use storyboard_orchestrator::*;
