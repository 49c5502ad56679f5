//! Trait definitions for external generation services.

use crate::{
    CaptionedVideo, ComposeRequest, ComposedVideo, GeneratedAudio, GeneratedImage,
    GeneratedVideo, ImageRequest, NarrativeOutline, SpeechRequest, VideoRequest,
};
use async_trait::async_trait;
use std::sync::Arc;
use storyboard_error::StoryboardResult;

/// Callback receiving human-readable progress lines from long-running jobs.
///
/// Delivery is best effort; services may call it zero or more times.
pub type ProgressSink = Arc<dyn Fn(&str) + Send + Sync>;

/// Produces a narrative outline for a base prompt.
#[async_trait]
pub trait NarrativeService: Send + Sync {
    /// Generate a narrative with exactly `scene_count` dialogues and image prompts.
    ///
    /// # Errors
    ///
    /// Fails with an upstream error when the service errors or returns
    /// arrays of the wrong length.
    async fn generate_narrative(
        &self,
        prompt: &str,
        scene_count: usize,
    ) -> StoryboardResult<NarrativeOutline>;
}

/// Renders a still image from a prompt.
#[async_trait]
pub trait ImageService: Send + Sync {
    /// Generate one image.
    async fn generate_image(&self, req: &ImageRequest) -> StoryboardResult<GeneratedImage>;
}

/// Animates a still image into a short clip.
#[async_trait]
pub trait VideoService: Send + Sync {
    /// Generate one clip of the requested duration.
    async fn generate_video(&self, req: &VideoRequest) -> StoryboardResult<GeneratedVideo>;
}

/// Turns dialogue into speech audio.
#[async_trait]
pub trait SpeechService: Send + Sync {
    /// Synthesize `req.text` with `req.voice`, reporting progress to `progress`.
    async fn synthesize_speech(
        &self,
        req: &SpeechRequest,
        progress: Option<ProgressSink>,
    ) -> StoryboardResult<GeneratedAudio>;
}

/// Merges a video track and an audio track.
#[async_trait]
pub trait ComposeService: Send + Sync {
    /// Compose one playable clip.
    async fn compose_clip(&self, req: &ComposeRequest) -> StoryboardResult<ComposedVideo>;
}

/// Burns captions into a finished clip.
#[async_trait]
pub trait CaptionService: Send + Sync {
    /// Caption the clip at `video_url`.
    ///
    /// # Errors
    ///
    /// Fails when the render reports failure or does not finish in time.
    async fn caption_video(&self, video_url: &str) -> StoryboardResult<CaptionedVideo>;
}
