//! Configuration for the Storyboard generation engine.
//!
//! Settings are layered:
//! - Bundled defaults (`storyboard.toml` compiled into the library)
//! - `~/.config/storyboard/storyboard.toml`
//! - `./storyboard.toml`
//!
//! Later sources win. Credentials never live here; they are read from the
//! environment by the adapters.

#![warn(missing_docs)]

mod settings;

pub use settings::{
    CaptionSettings, FalSettings, NarrativeSettings, StoryboardConfig, StoryboardSettings,
};
