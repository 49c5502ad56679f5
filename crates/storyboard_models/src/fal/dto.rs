//! fal.ai request and response bodies.

use serde::{Deserialize, Serialize};

/// Accepted submission.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct QueueSubmission {
    pub request_id: String,
    pub status_url: String,
    pub response_url: String,
}

/// Queue status poll.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct QueueStatus {
    pub status: String,
    #[serde(default)]
    pub logs: Option<Vec<QueueLog>>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct QueueLog {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ImageSize {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct ImageInput<'a> {
    pub prompt: &'a str,
    pub image_size: ImageSize,
    pub num_images: u32,
    pub negative_prompt: &'static str,
    pub guidance_scale: f32,
    pub num_inference_steps: u32,
    pub enable_safety_checker: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FalFile {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ImageOutput {
    #[serde(default)]
    pub images: Vec<FalFile>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct VideoInput<'a> {
    pub prompt: &'a str,
    pub image_url: &'a str,
    /// Sent as a string: "5" or "10"
    pub duration: String,
    pub aspect_ratio: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VideoOutput {
    pub video: Option<FalFile>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SpeechInput<'a> {
    pub prompt: &'a str,
    pub voice: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SpeechOutput {
    pub audio: Option<FalFile>,
}

#[derive(Debug, Serialize)]
pub(crate) struct Keyframe<'a> {
    pub timestamp: u64,
    pub duration: u64,
    pub url: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct Track<'a> {
    pub id: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub keyframes: Vec<Keyframe<'a>>,
}

impl<'a> Track<'a> {
    /// A track of the given type holding one keyframe that spans the clip.
    pub fn single(kind: &'static str, url: &'a str, duration_ms: u64) -> Self {
        Self {
            id: kind,
            kind,
            keyframes: vec![Keyframe {
                timestamp: 0,
                duration: duration_ms,
                url,
            }],
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ComposeInput<'a> {
    pub tracks: Vec<Track<'a>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ComposeOutput {
    pub video_url: Option<String>,
}
