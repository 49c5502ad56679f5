//! Keys identifying in-flight generation tasks.

use crate::SequenceId;
use serde::{Deserialize, Serialize};

/// Kind of exclusive generation work.
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
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TaskKind {
    /// Replace a scene's image
    RegenerateImage,
    /// Turn a scene's image into a clip
    Animate,
    /// Speak a scene's dialogue
    SynthesizeSpeech,
    /// Merge a scene's clip and speech
    Compose,
    /// Burn captions into the composed clip
    Caption,
}

/// `(sequence, scene, kind)`: at most one task per key may run at a time.
///
/// # Examples
///
/// ```
/// use storyboard_core::{SequenceId, TaskKey, TaskKind};
///
/// let id = SequenceId::new();
/// let key = TaskKey::new(id, 2, TaskKind::Animate);
/// assert!(key.to_string().starts_with("animate for scene 2"));
/// assert_ne!(key, TaskKey::new(id, 2, TaskKind::RegenerateImage));
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
#[display("{} for scene {} of sequence {}", kind, scene_index, sequence_id)]
pub struct TaskKey {
    /// Target sequence
    sequence_id: SequenceId,
    /// Target scene
    scene_index: usize,
    /// Kind of work
    kind: TaskKind,
}

impl TaskKey {
    /// Build a task key.
    pub fn new(sequence_id: SequenceId, scene_index: usize, kind: TaskKind) -> Self {
        Self {
            sequence_id,
            scene_index,
            kind,
        }
    }

    /// Target sequence.
    pub fn sequence_id(&self) -> SequenceId {
        self.sequence_id
    }

    /// Target scene.
    pub fn scene_index(&self) -> usize {
        self.scene_index
    }

    /// Kind of work.
    pub fn kind(&self) -> TaskKind {
        self.kind
    }
}
