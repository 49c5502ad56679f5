//! Test utilities for orchestrator tests.
//!
//! [`MockServices`] implements every collaborator trait with configurable
//! failures and gates so tests can hold a call open while they act.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use storyboard_config::StoryboardConfig;
use storyboard_error::{StoryboardResult, UpstreamError, UpstreamErrorKind};
use storyboard_interface::{
    CaptionService, CaptionedVideo, Collaborators, ComposeRequest, ComposeService, ComposedVideo,
    GeneratedAudio, GeneratedImage, GeneratedVideo, ImageRequest, ImageService, NarrativeOutline,
    NarrativeService, ProgressSink, SpeechRequest, SpeechService, VideoRequest, VideoService,
};
use storyboard_orchestrator::Storyboard;
use tokio::sync::Notify;

/// Gate that holds calls open until released.
#[derive(Default)]
pub struct Gate {
    closed: AtomicBool,
    notify: Notify,
    waiting: AtomicUsize,
}

impl Gate {
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn open(&self) {
        self.closed.store(false, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    /// Number of calls currently parked at the gate.
    pub fn waiting(&self) -> usize {
        self.waiting.load(Ordering::SeqCst)
    }

    async fn pass(&self) {
        if !self.closed.load(Ordering::SeqCst) {
            return;
        }
        self.waiting.fetch_add(1, Ordering::SeqCst);
        loop {
            let notified = self.notify.notified();
            if !self.closed.load(Ordering::SeqCst) {
                break;
            }
            notified.await;
        }
        self.waiting.fetch_sub(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct MockServices {
    pub narrative_calls: AtomicUsize,
    pub image_calls: AtomicUsize,
    pub video_calls: AtomicUsize,
    pub speech_calls: AtomicUsize,
    pub compose_calls: AtomicUsize,
    pub caption_calls: AtomicUsize,

    pub fail_narrative: AtomicBool,
    /// 1-based image call number that fails
    pub fail_image_call: Mutex<Option<usize>>,
    pub fail_video: AtomicBool,
    pub fail_speech: AtomicBool,
    pub fail_compose: AtomicBool,
    pub fail_caption: AtomicBool,
    /// Leave dialogues empty in generated outlines
    pub silent_outline: AtomicBool,
    /// Report this prompt as service-expanded on image results
    pub expanded_prompt: Mutex<Option<String>>,

    pub narrative_gate: Gate,
    pub image_gate: Gate,
    pub video_gate: Gate,
    pub caption_gate: Gate,

    pub image_requests: Mutex<Vec<ImageRequest>>,
    pub video_requests: Mutex<Vec<VideoRequest>>,
    pub speech_requests: Mutex<Vec<SpeechRequest>>,
    pub compose_requests: Mutex<Vec<ComposeRequest>>,
}

impl MockServices {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn collaborators(self: &Arc<Self>) -> Collaborators {
        Collaborators::builder()
            .narrative(self.clone())
            .image(self.clone())
            .video(self.clone())
            .speech(self.clone())
            .compose(self.clone())
            .caption(self.clone())
            .build()
            .expect("all services provided")
    }

    pub fn storyboard(self: &Arc<Self>) -> Storyboard {
        Storyboard::new(self.collaborators(), StoryboardConfig::bundled().unwrap().storyboard)
            .unwrap()
    }

    pub fn storyboard_with(self: &Arc<Self>, configure: impl FnOnce(&mut StoryboardConfig)) -> Storyboard {
        let mut config = StoryboardConfig::bundled().unwrap();
        configure(&mut config);
        Storyboard::new(self.collaborators(), config.storyboard).unwrap()
    }
}

fn upstream(kind: UpstreamErrorKind) -> storyboard_error::StoryboardError {
    UpstreamError::new(kind).into()
}

#[async_trait]
impl NarrativeService for MockServices {
    async fn generate_narrative(
        &self,
        prompt: &str,
        scene_count: usize,
    ) -> StoryboardResult<NarrativeOutline> {
        self.narrative_calls.fetch_add(1, Ordering::SeqCst);
        self.narrative_gate.pass().await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        if self.fail_narrative.load(Ordering::SeqCst) {
            return Err(upstream(UpstreamErrorKind::Narrative("model overloaded".into())));
        }
        let silent = self.silent_outline.load(Ordering::SeqCst);
        Ok(NarrativeOutline {
            narrative: format!("The story of {prompt}"),
            dialogues: (0..scene_count)
                .map(|i| if silent { String::new() } else { format!("Line {i}") })
                .collect(),
            image_prompts: (0..scene_count).map(|i| format!("{prompt}, scene {i}")).collect(),
        })
    }
}

#[async_trait]
impl ImageService for MockServices {
    async fn generate_image(&self, req: &ImageRequest) -> StoryboardResult<GeneratedImage> {
        let call = self.image_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.image_requests.lock().push(req.clone());
        self.image_gate.pass().await;
        if *self.fail_image_call.lock() == Some(call) {
            return Err(upstream(UpstreamErrorKind::ImageGeneration("safety filter".into())));
        }
        Ok(GeneratedImage {
            url: format!("https://img/{call}.png"),
            seed: Some(1000 + call as u64),
            expanded_prompt: self.expanded_prompt.lock().clone(),
        })
    }
}

#[async_trait]
impl VideoService for MockServices {
    async fn generate_video(&self, req: &VideoRequest) -> StoryboardResult<GeneratedVideo> {
        let call = self.video_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.video_requests.lock().push(req.clone());
        self.video_gate.pass().await;
        if self.fail_video.load(Ordering::SeqCst) {
            return Err(upstream(UpstreamErrorKind::VideoGeneration("queue full".into())));
        }
        Ok(GeneratedVideo {
            url: format!("https://vid/{call}.mp4"),
        })
    }
}

#[async_trait]
impl SpeechService for MockServices {
    async fn synthesize_speech(
        &self,
        req: &SpeechRequest,
        progress: Option<ProgressSink>,
    ) -> StoryboardResult<GeneratedAudio> {
        let call = self.speech_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.speech_requests.lock().push(req.clone());
        if let Some(progress) = progress {
            progress("synthesizing");
        }
        if self.fail_speech.load(Ordering::SeqCst) {
            return Err(upstream(UpstreamErrorKind::SpeechGeneration("voice offline".into())));
        }
        Ok(GeneratedAudio {
            url: format!("https://aud/{call}.wav"),
        })
    }
}

#[async_trait]
impl ComposeService for MockServices {
    async fn compose_clip(&self, req: &ComposeRequest) -> StoryboardResult<ComposedVideo> {
        let call = self.compose_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.compose_requests.lock().push(req.clone());
        if self.fail_compose.load(Ordering::SeqCst) {
            return Err(upstream(UpstreamErrorKind::Compose("ffmpeg crashed".into())));
        }
        Ok(ComposedVideo {
            url: format!("https://out/{call}.mp4"),
        })
    }
}

#[async_trait]
impl CaptionService for MockServices {
    async fn caption_video(&self, video_url: &str) -> StoryboardResult<CaptionedVideo> {
        self.caption_calls.fetch_add(1, Ordering::SeqCst);
        self.caption_gate.pass().await;
        if self.fail_caption.load(Ordering::SeqCst) {
            return Err(upstream(UpstreamErrorKind::CaptionTimeout(120)));
        }
        Ok(CaptionedVideo {
            url: format!("{video_url}?captioned"),
        })
    }
}

/// Yield until `condition` holds.
pub async fn until(mut condition: impl FnMut() -> bool) {
    for _ in 0..10_000 {
        if condition() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition never became true");
}
