//! Request and response types exchanged with collaborators.

use serde::{Deserialize, Serialize};
use storyboard_core::{VideoDuration, Voice};

/// Narrative outline returned by the narrative service.
///
/// # Examples
///
/// ```
/// use storyboard_interface::NarrativeOutline;
///
/// let outline = NarrativeOutline {
///     narrative: "A cat's day.".to_string(),
///     dialogues: vec!["Morning".into(), "Nap".into()],
///     image_prompts: vec!["cat wakes".into(), "cat sleeps".into()],
/// };
/// assert!(outline.has_scene_count(2));
/// assert!(!outline.has_scene_count(3));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeOutline {
    /// Overview of the whole story
    pub narrative: String,
    /// One narration line per scene
    pub dialogues: Vec<String>,
    /// One image prompt per scene
    pub image_prompts: Vec<String>,
}

impl NarrativeOutline {
    /// Whether both per-scene arrays have exactly `count` entries.
    pub fn has_scene_count(&self, count: usize) -> bool {
        self.dialogues.len() == count && self.image_prompts.len() == count
    }
}

/// Image generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_setters::Setters)]
#[setters(prefix = "with_")]
pub struct ImageRequest {
    /// Prompt to render
    #[setters(skip)]
    pub prompt: String,
    /// Image model identifier
    #[setters(skip)]
    pub model_id: String,
    /// Seed to reproduce a previous render
    pub seed: Option<u64>,
}

impl ImageRequest {
    /// Create an unseeded request.
    pub fn new(prompt: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model_id: model_id.into(),
            seed: None,
        }
    }
}

/// Image generation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImage {
    /// Image location
    pub url: String,
    /// Seed the service used, when it reports one
    pub seed: Option<u64>,
    /// Prompt after service-side expansion, when it reports one
    pub expanded_prompt: Option<String>,
}

/// Image-to-video request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRequest {
    /// Motion prompt
    pub prompt: String,
    /// Source still image
    pub image_url: String,
    /// Clip length
    pub duration: VideoDuration,
}

/// Video generation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedVideo {
    /// Clip location
    pub url: String,
}

/// Text-to-speech request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechRequest {
    /// Text to speak
    pub text: String,
    /// Voice to speak with
    pub voice: Voice,
}

/// Speech synthesis result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedAudio {
    /// Audio location
    pub url: String,
}

/// Video plus audio composition request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposeRequest {
    /// Video track
    pub video_url: String,
    /// Audio track
    pub audio_url: String,
    /// Output length
    pub duration: VideoDuration,
}

/// Composition result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposedVideo {
    /// Composed clip location
    pub url: String,
}

/// Captioning result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionedVideo {
    /// Captioned clip location
    pub url: String,
}
