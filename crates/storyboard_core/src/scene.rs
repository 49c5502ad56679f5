//! Per-scene artifacts.

use crate::VideoDuration;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// A generated still image for a scene.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct SceneImage {
    /// Image location
    url: String,
    /// Seed reported by the image service, if it supports deterministic seeds
    seed: Option<u64>,
}

impl SceneImage {
    /// Create a new scene image.
    pub fn new(url: impl Into<String>, seed: Option<u64>) -> Self {
        Self {
            url: url.into(),
            seed,
        }
    }
}

/// An animated clip for a scene.
///
/// Bundling the url with its duration keeps "duration present iff video present"
/// true by construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct VideoClip {
    /// Clip location
    url: String,
    /// Duration that was requested for this clip
    duration: VideoDuration,
}

impl VideoClip {
    /// Create a new clip.
    pub fn new(url: impl Into<String>, duration: VideoDuration) -> Self {
        Self {
            url: url.into(),
            duration,
        }
    }
}

/// Derived lifecycle position of a scene. Audio is an independent overlay
/// checked with [`SceneArtifact::has_audio`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SceneState {
    /// No image generated yet
    Empty,
    /// Image available, not animated
    ImageReady,
    /// Animated clip available
    VideoReady,
}

/// One index-addressed slot in a sequence.
///
/// # Examples
///
/// ```
/// use storyboard_core::{SceneArtifact, ScenePatch, SceneState};
///
/// let scene = SceneArtifact::new("a cat wakes up, cinematic lighting", "Morning!");
/// assert_eq!(scene.state(), SceneState::Empty);
///
/// let scene = scene.apply(ScenePatch::default().with_image_url("https://img/1.png"));
/// assert_eq!(scene.state(), SceneState::ImageReady);
/// assert_eq!(scene.image_url(), Some("https://img/1.png"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct SceneArtifact {
    /// Scene-specific prompt actually used for image generation
    image_prompt: String,
    /// User-editable narration line
    dialogue: String,
    /// Current image, if generated
    image: Option<SceneImage>,
    /// Current animated clip, if generated
    video: Option<VideoClip>,
    /// Synthesized speech for the dialogue, if generated
    audio_url: Option<String>,
}

impl SceneArtifact {
    /// Create a scene with no generated artifacts.
    pub fn new(image_prompt: impl Into<String>, dialogue: impl Into<String>) -> Self {
        Self {
            image_prompt: image_prompt.into(),
            dialogue: dialogue.into(),
            image: None,
            video: None,
            audio_url: None,
        }
    }

    /// Image location, if an image has been generated.
    pub fn image_url(&self) -> Option<&str> {
        self.image.as_ref().map(|i| i.url.as_str())
    }

    /// Seed of the current image, if the service reported one.
    pub fn image_seed(&self) -> Option<u64> {
        self.image.as_ref().and_then(|i| i.seed)
    }

    /// Clip location, if the scene has been animated.
    pub fn video_url(&self) -> Option<&str> {
        self.video.as_ref().map(|v| v.url.as_str())
    }

    /// Requested clip duration; present exactly when [`Self::video_url`] is.
    pub fn video_duration(&self) -> Option<VideoDuration> {
        self.video.as_ref().map(|v| v.duration)
    }

    /// Whether a non-empty image is present.
    pub fn has_image(&self) -> bool {
        self.image_url().is_some_and(|u| !u.is_empty())
    }

    /// Whether a non-empty clip is present.
    pub fn has_video(&self) -> bool {
        self.video_url().is_some_and(|u| !u.is_empty())
    }

    /// Whether non-empty speech audio is present.
    pub fn has_audio(&self) -> bool {
        self.audio_url.as_deref().is_some_and(|u| !u.is_empty())
    }

    /// Whether this scene can feed the compose step.
    pub fn is_composable(&self) -> bool {
        self.has_video() && self.has_audio()
    }

    /// Lifecycle position derived from the artifacts.
    pub fn state(&self) -> SceneState {
        if self.has_video() {
            SceneState::VideoReady
        } else if self.has_image() {
            SceneState::ImageReady
        } else {
            SceneState::Empty
        }
    }

    /// Return a copy with every field present in `patch` replaced.
    ///
    /// Fields the patch leaves unset are carried over untouched; in particular
    /// editing the prompt or dialogue never clears generated artifacts.
    pub fn apply(&self, patch: ScenePatch) -> Self {
        let ScenePatch {
            image_prompt,
            dialogue,
            image_url,
            image_seed,
            video,
            audio_url,
        } = patch;

        let image = match image_url {
            Some(url) => Some(SceneImage::new(url, image_seed)),
            None => self.image.clone(),
        };

        Self {
            image_prompt: image_prompt.unwrap_or_else(|| self.image_prompt.clone()),
            dialogue: dialogue.unwrap_or_else(|| self.dialogue.clone()),
            image,
            video: video.or_else(|| self.video.clone()),
            audio_url: audio_url.or_else(|| self.audio_url.clone()),
        }
    }
}

/// Partial update for a [`SceneArtifact`].
///
/// A new image replaces url and seed together; `image_seed` is ignored unless
/// `image_url` is also set.
#[derive(Debug, Clone, PartialEq, Eq, Default, derive_setters::Setters)]
#[setters(prefix = "with_", strip_option, into)]
pub struct ScenePatch {
    /// Replacement image prompt
    image_prompt: Option<String>,
    /// Replacement dialogue
    dialogue: Option<String>,
    /// Replacement image url
    image_url: Option<String>,
    /// Seed for the replacement image
    image_seed: Option<u64>,
    /// Replacement clip
    video: Option<VideoClip>,
    /// Replacement speech audio
    audio_url: Option<String>,
}

impl ScenePatch {
    /// Patch that installs a freshly generated image.
    pub fn image(url: impl Into<String>, seed: Option<u64>) -> Self {
        Self {
            image_url: Some(url.into()),
            image_seed: seed,
            ..Self::default()
        }
    }

    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
