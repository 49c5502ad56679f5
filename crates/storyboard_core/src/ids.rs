//! Sequence identifiers.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Opaque, stable identifier for a [`crate::Sequence`].
///
/// Generated once when the sequence is created and never recomputed from
/// content; every state update locates its target by this id.
///
/// # Examples
///
/// ```
/// use storyboard_core::SequenceId;
///
/// let a = SequenceId::new();
/// let b = SequenceId::new();
/// assert_ne!(a, b);
///
/// let parsed: SequenceId = a.to_string().parse().unwrap();
/// assert_eq!(parsed, a);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(transparent)]
pub struct SequenceId(Uuid);

impl SequenceId {
    /// Generate a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SequenceId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for SequenceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}
