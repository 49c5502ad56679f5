//! The sequence aggregate.

use crate::{SceneArtifact, ScenePatch, SequenceId, VideoDuration};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use storyboard_error::{ValidationError, ValidationErrorKind};

/// A scene's video and audio merged into one playable clip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct ComposedClip {
    /// Composed clip location
    url: String,
    /// Index of the scene whose tracks were composed
    source_scene: usize,
    /// Duration used for composition
    duration: VideoDuration,
    /// Captioned rendition, once captioning succeeds
    captioned_url: Option<String>,
}

impl ComposedClip {
    /// Create a composed clip without captions.
    pub fn new(url: impl Into<String>, source_scene: usize, duration: VideoDuration) -> Self {
        Self {
            url: url.into(),
            source_scene,
            duration,
            captioned_url: None,
        }
    }
}

/// Sequence-level lifecycle position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SequenceState {
    /// Scenes exist but nothing has been composed
    Drafting,
    /// A composed clip is available
    Composed,
}

/// One storyboard: a base prompt, a narrative, and a fixed set of scenes.
///
/// All transformations return a new value and leave `self` untouched.
///
/// # Examples
///
/// ```
/// use storyboard_core::{SceneArtifact, ScenePatch, Sequence};
///
/// let seq = Sequence::new(
///     "a cat's day",
///     "A cat wakes, plays, and naps.",
///     vec![SceneArtifact::new("wake", ""), SceneArtifact::new("nap", "")],
/// )
/// .unwrap();
///
/// let edited = seq.with_scene(1, ScenePatch::default().with_dialogue("Zzz"));
/// assert_eq!(edited.scenes()[1].dialogue(), "Zzz");
/// assert_eq!(seq.scenes()[1].dialogue(), "");
/// assert_eq!(edited.id(), seq.id());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Sequence {
    /// Stable identity
    id: SequenceId,
    /// The user's original input
    base_prompt: String,
    /// Service-generated overview, user-editable
    narrative: String,
    /// Ordered scenes; order is the only ordering signal
    scenes: Vec<SceneArtifact>,
    /// Composition result, once produced
    composed: Option<ComposedClip>,
}

impl Sequence {
    /// Create a sequence with a fresh id.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `scenes` is empty.
    #[track_caller]
    pub fn new(
        base_prompt: impl Into<String>,
        narrative: impl Into<String>,
        scenes: Vec<SceneArtifact>,
    ) -> Result<Self, ValidationError> {
        if scenes.is_empty() {
            return Err(ValidationError::new(ValidationErrorKind::NoScenes));
        }
        Ok(Self {
            id: SequenceId::new(),
            base_prompt: base_prompt.into(),
            narrative: narrative.into(),
            scenes,
            composed: None,
        })
    }

    /// Number of scenes, fixed for the sequence's lifetime.
    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    /// Scene at `index`, if in range.
    pub fn scene(&self, index: usize) -> Option<&SceneArtifact> {
        self.scenes.get(index)
    }

    /// Composed clip location, if composed.
    pub fn composed_video_url(&self) -> Option<&str> {
        self.composed.as_ref().map(|c| c.url.as_str())
    }

    /// Derived sequence-level state.
    pub fn state(&self) -> SequenceState {
        if self.composed.is_some() {
            SequenceState::Composed
        } else {
            SequenceState::Drafting
        }
    }

    /// Lowest-index scene that has both a clip and speech audio.
    pub fn first_composable_scene(&self) -> Option<(usize, &SceneArtifact)> {
        self.scenes
            .iter()
            .enumerate()
            .find(|(_, scene)| scene.is_composable())
    }

    /// Return a copy with one scene patched.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range. Callers validate indices at the
    /// orchestration boundary, so reaching this with a bad index is a bug.
    pub fn with_scene(&self, index: usize, patch: ScenePatch) -> Self {
        assert!(
            index < self.scenes.len(),
            "scene index {} out of range for sequence of {} scenes",
            index,
            self.scenes.len()
        );
        let mut scenes = self.scenes.clone();
        scenes[index] = self.scenes[index].apply(patch);
        Self {
            scenes,
            ..self.clone()
        }
    }

    /// Return a copy with the narrative replaced.
    pub fn with_narrative(&self, text: impl Into<String>) -> Self {
        Self {
            narrative: text.into(),
            ..self.clone()
        }
    }

    /// Return a copy with the base prompt replaced.
    pub fn with_base_prompt(&self, text: impl Into<String>) -> Self {
        Self {
            base_prompt: text.into(),
            ..self.clone()
        }
    }

    /// Return a copy with the composed clip replaced.
    pub fn with_composed_video(&self, clip: ComposedClip) -> Self {
        Self {
            composed: Some(clip),
            ..self.clone()
        }
    }

    /// Return a copy whose composed clip carries a captioned rendition.
    ///
    /// Leaves the sequence unchanged when nothing has been composed.
    pub fn with_captioned_video(&self, url: impl Into<String>) -> Self {
        let composed = self.composed.as_ref().map(|clip| ComposedClip {
            captioned_url: Some(url.into()),
            ..clip.clone()
        });
        Self {
            composed,
            ..self.clone()
        }
    }
}
