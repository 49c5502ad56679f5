//! Generation orchestration for the Storyboard engine.
//!
//! [`Storyboard`] owns the sequence collection and turns user intents into
//! collaborator calls, applying each result to the latest state when it
//! arrives. [`TaskTracker`] enforces at most one in-flight task per
//! `(sequence, scene, kind)` key, and [`DeduplicatingNarrative`] collapses
//! identical concurrent narrative requests.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod dedup;
mod notices;
mod storyboard;
mod tracker;

pub use dedup::DeduplicatingNarrative;
pub use notices::{Notice, Notices};
pub use storyboard::{Storyboard, StoryboardSnapshot, Transition};
pub use tracker::{CreateGuard, TaskGuard, TaskTracker};
