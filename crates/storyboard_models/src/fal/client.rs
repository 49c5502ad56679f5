//! fal.ai-backed image, video, speech and compose services.

use super::dto::{
    ComposeInput, ComposeOutput, ImageInput, ImageOutput, ImageSize, SpeechInput,
    SpeechOutput, Track, VideoInput, VideoOutput,
};
use super::queue::FalQueue;
use crate::http::{Failure, api_key};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use storyboard_config::FalSettings;
use storyboard_error::{StoryboardResult, UpstreamError, UpstreamErrorKind};
use storyboard_interface::{
    ComposeRequest, ComposeService, ComposedVideo, GeneratedAudio, GeneratedImage,
    GeneratedVideo, ImageRequest, ImageService, ProgressSink, SpeechRequest, SpeechService,
    VideoRequest, VideoService,
};
use tracing::{debug, instrument};

const NEGATIVE_PROMPT: &str = "(worst quality, low quality, normal quality, lowres, low details, \
oversaturated, undersaturated, overexposed, underexposed, grayscale, bw, bad photo, \
bad photography, bad art:1.4), (watermark, signature, text font, username, error, logo, words, \
letters, digits, autograph, trademark, name:1.2), (blur, blurry, grainy), morbid, ugly, \
asymmetrical, mutated malformed, mutilated, poorly lit, bad shadow, draft, cropped, out of frame, \
cut off, censored, jpeg artifacts, out of focus, glitch, duplicate, (airbrushed, cartoon, anime, \
semi-realistic, cgi, render, blender, digital art, manga, amateur:1.3), (3D ,3D Game, \
3D Game Scene, 3D Character:1.1), (bad hands, bad anatomy, bad body, bad face, bad teeth, \
bad arms, bad legs, deformities:1.3)";

/// Client for the fal.ai queue API.
///
/// One client serves four collaborator roles; each role targets a different
/// app id on the same queue.
#[derive(Debug, Clone)]
pub struct FalClient {
    queue: FalQueue,
    settings: FalSettings,
}

impl FalClient {
    /// Create a client using `FAL_KEY`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the key is not set.
    #[instrument(skip_all)]
    pub fn new(settings: &FalSettings) -> StoryboardResult<Self> {
        Ok(Self::with_api_key(api_key("FAL_KEY")?, settings.clone()))
    }

    /// Create a client with an explicit key.
    pub fn with_api_key(api_key: impl Into<String>, settings: FalSettings) -> Self {
        let queue = FalQueue {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: settings.base_url.clone(),
            poll_interval: settings.poll_interval(),
            timeout: settings.timeout(),
        };
        Self { queue, settings }
    }

    /// Point the client at another queue root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.queue.base_url = base_url.into();
        self
    }

    /// Override status polling cadence and job timeout.
    pub fn with_polling(mut self, interval: Duration, timeout: Duration) -> Self {
        self.queue.poll_interval = interval;
        self.queue.timeout = timeout;
        self
    }

    fn missing(kind: Failure, what: &str) -> UpstreamError {
        UpstreamError::new(kind(format!("response has no {}", what)))
    }
}

#[async_trait]
impl ImageService for FalClient {
    #[instrument(skip(self, req), fields(model = %req.model_id, seed = ?req.seed))]
    async fn generate_image(&self, req: &ImageRequest) -> StoryboardResult<GeneratedImage> {
        let input = ImageInput {
            prompt: &req.prompt,
            image_size: ImageSize {
                width: self.settings.image_width,
                height: self.settings.image_height,
            },
            num_images: 1,
            negative_prompt: NEGATIVE_PROMPT,
            guidance_scale: 5.0,
            num_inference_steps: 35,
            enable_safety_checker: true,
            seed: req.seed,
        };

        let output: ImageOutput = self
            .queue
            .run(&req.model_id, &input, None, UpstreamErrorKind::ImageGeneration)
            .await?;

        let image = output
            .images
            .into_iter()
            .next()
            .filter(|image| !image.url.is_empty())
            .ok_or_else(|| Self::missing(UpstreamErrorKind::ImageGeneration, "images"))?;
        debug!(url = %image.url, "Image generated");

        Ok(GeneratedImage {
            url: image.url,
            seed: output.seed,
            expanded_prompt: output.prompt.filter(|p| !p.is_empty() && *p != req.prompt),
        })
    }
}

#[async_trait]
impl VideoService for FalClient {
    #[instrument(skip(self, req), fields(duration = %req.duration))]
    async fn generate_video(&self, req: &VideoRequest) -> StoryboardResult<GeneratedVideo> {
        let input = VideoInput {
            prompt: &req.prompt,
            image_url: &req.image_url,
            duration: req.duration.to_string(),
            aspect_ratio: &self.settings.aspect_ratio,
        };

        let output: VideoOutput = self
            .queue
            .run(
                &self.settings.video_model,
                &input,
                None,
                UpstreamErrorKind::VideoGeneration,
            )
            .await?;

        let video = output
            .video
            .filter(|v| !v.url.is_empty())
            .ok_or_else(|| Self::missing(UpstreamErrorKind::VideoGeneration, "video url"))?;
        debug!(url = %video.url, "Video generated");
        Ok(GeneratedVideo { url: video.url })
    }
}

#[async_trait]
impl SpeechService for FalClient {
    #[instrument(skip(self, req, progress), fields(voice = %req.voice))]
    async fn synthesize_speech(
        &self,
        req: &SpeechRequest,
        progress: Option<ProgressSink>,
    ) -> StoryboardResult<GeneratedAudio> {
        let app = format!(
            "{}/{}",
            self.settings.speech_model_prefix.trim_end_matches('/'),
            req.voice.language()
        );
        let input = SpeechInput {
            prompt: &req.text,
            voice: req.voice.id(),
        };

        let output: SpeechOutput = self
            .queue
            .run(
                &app,
                &input,
                progress.as_ref(),
                UpstreamErrorKind::SpeechGeneration,
            )
            .await?;

        let audio = output
            .audio
            .filter(|a| !a.url.is_empty())
            .ok_or_else(|| Self::missing(UpstreamErrorKind::SpeechGeneration, "audio url"))?;
        debug!(url = %audio.url, "Speech generated");
        Ok(GeneratedAudio { url: audio.url })
    }
}

#[async_trait]
impl ComposeService for FalClient {
    #[instrument(skip(self, req), fields(duration = %req.duration))]
    async fn compose_clip(&self, req: &ComposeRequest) -> StoryboardResult<ComposedVideo> {
        let duration = req.duration.millis();
        let input = ComposeInput {
            tracks: vec![
                Track::single("video", &req.video_url, duration),
                Track::single("audio", &req.audio_url, duration),
            ],
        };

        let output: ComposeOutput = self
            .queue
            .run(
                &self.settings.compose_model,
                &input,
                None,
                UpstreamErrorKind::Compose,
            )
            .await?;

        let url = output
            .video_url
            .filter(|u| !u.is_empty())
            .ok_or_else(|| Self::missing(UpstreamErrorKind::Compose, "video url"))?;
        debug!(url = %url, "Clip composed");
        Ok(ComposedVideo { url })
    }
}
