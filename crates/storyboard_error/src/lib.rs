//! Error types for the Storyboard engine.
//!
//! This crate provides the foundation error types used throughout the Storyboard workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! The orchestration layer cares about three families:
//! - [`ValidationError`] - a precondition failed before any network call
//! - [`UpstreamError`] - an external collaborator failed, could not be
//!   reached, or returned malformed data
//! - [`InFlightError`] - the task key is already being worked on
//!
//! A result that arrives after its sequence was deleted is not an error; the
//! orchestrator reports it as a discarded transition.
//!
//! # Examples
//!
//! ```
//! use storyboard_error::{StoryboardResult, ValidationError, ValidationErrorKind};
//!
//! fn check(prompt: &str) -> StoryboardResult<()> {
//!     if prompt.trim().is_empty() {
//!         Err(ValidationError::new(ValidationErrorKind::EmptyPrompt))?
//!     }
//!     Ok(())
//! }
//!
//! assert!(check("   ").is_err());
//! assert!(check("a cat's day").is_ok());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod in_flight;
mod json;
mod upstream;
mod validation;

pub use config::ConfigError;
pub use error::{StoryboardError, StoryboardErrorKind, StoryboardResult};
pub use in_flight::InFlightError;
pub use json::JsonError;
pub use upstream::{UpstreamError, UpstreamErrorKind};
pub use validation::{ValidationError, ValidationErrorKind};
