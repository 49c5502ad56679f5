//! Core data types for the Storyboard generation engine.
//!
//! A [`Sequence`] is one storyboard: the user's base prompt, the generated
//! narrative, and a fixed, ordered set of [`SceneArtifact`]s. Sequences are
//! values: every change produces a new sequence, and the process-wide
//! [`SequenceCollection`] is replaced whole on each transition.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod collection;
mod duration;
mod ids;
mod scene;
mod sequence;
mod task;
mod voice;

pub use collection::SequenceCollection;
pub use duration::VideoDuration;
pub use ids::SequenceId;
pub use scene::{SceneArtifact, SceneImage, ScenePatch, SceneState, VideoClip};
pub use sequence::{ComposedClip, Sequence, SequenceState};
pub use task::{TaskKey, TaskKind};
pub use voice::{DEFAULT_VOICE, SpeechLanguage, Voice, VoiceOption, voice_catalog};
