//! The orchestration core.

use crate::{DeduplicatingNarrative, Notice, Notices, TaskTracker};
use futures::future::try_join_all;
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use storyboard_config::StoryboardSettings;
use storyboard_core::{
    ComposedClip, SceneArtifact, ScenePatch, Sequence, SequenceCollection, SequenceId, TaskKey,
    TaskKind, VideoClip, VideoDuration, Voice,
};
use storyboard_error::{
    StoryboardError, StoryboardResult, UpstreamError, UpstreamErrorKind, ValidationError,
    ValidationErrorKind,
};
use storyboard_interface::{
    Collaborators, ComposeRequest, ImageRequest, NarrativeService, ProgressSink, SpeechRequest,
    VideoRequest,
};
use tracing::{debug, error, info, instrument};

/// What happened to a completed task's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Transition {
    /// The result was written into its sequence
    Applied,
    /// The target sequence was deleted before the result arrived
    Discarded,
}

/// Everything a view needs to render the current state.
#[derive(Debug, Clone)]
pub struct StoryboardSnapshot {
    /// All sequences, newest first
    pub sequences: Arc<SequenceCollection>,
    /// Sequence currently selected for display
    pub active: Option<SequenceId>,
    /// In-flight task keys
    pub busy: Vec<TaskKey>,
    /// Whether a sequence creation is in flight
    pub creating: bool,
    /// Pending failure notices
    pub notices: Vec<Notice>,
}

impl StoryboardSnapshot {
    /// The selected sequence, if any.
    pub fn active_sequence(&self) -> Option<&Sequence> {
        self.active.as_ref().and_then(|id| self.sequences.get(id))
    }

    /// Whether a task of `kind` is in flight for one scene.
    pub fn is_busy(&self, sequence_id: SequenceId, scene_index: usize, kind: TaskKind) -> bool {
        self.busy.contains(&TaskKey::new(sequence_id, scene_index, kind))
    }
}

/// Owns the sequence collection and runs every generation intent.
///
/// The collection is an immutable value behind a lock; each transition
/// swaps in a new value, so readers holding a snapshot never see a
/// half-applied change. Results are always applied to the latest
/// collection, not the one read when the task started.
pub struct Storyboard {
    collaborators: Collaborators,
    settings: StoryboardSettings,
    default_voice: Voice,
    sequences: RwLock<Arc<SequenceCollection>>,
    active: RwLock<Option<SequenceId>>,
    tracker: TaskTracker,
    narrative: DeduplicatingNarrative,
    notices: Notices,
}

impl Storyboard {
    /// Create an empty storyboard.
    ///
    /// # Errors
    ///
    /// Validation error if the default voice is not in the voice catalog.
    pub fn new(
        collaborators: Collaborators,
        settings: StoryboardSettings,
    ) -> StoryboardResult<Self> {
        let default_voice = settings.default_voice()?;
        Ok(Self {
            narrative: DeduplicatingNarrative::new(Arc::clone(collaborators.narrative())),
            collaborators,
            settings,
            default_voice,
            sequences: RwLock::new(Arc::new(SequenceCollection::default())),
            active: RwLock::new(None),
            tracker: TaskTracker::new(),
            notices: Notices::new(),
        })
    }

    /// Current collection.
    pub fn sequences(&self) -> Arc<SequenceCollection> {
        Arc::clone(&self.sequences.read())
    }

    /// Current state of one sequence.
    pub fn sequence(&self, id: SequenceId) -> Option<Sequence> {
        self.sequences().get(&id).cloned()
    }

    /// Selected sequence id.
    pub fn active(&self) -> Option<SequenceId> {
        *self.active.read()
    }

    /// Task tracker shared with this storyboard.
    pub fn tracker(&self) -> &TaskTracker {
        &self.tracker
    }

    /// Failure notices.
    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    /// Consistent view for rendering.
    pub fn snapshot(&self) -> StoryboardSnapshot {
        StoryboardSnapshot {
            sequences: self.sequences(),
            active: self.active(),
            busy: self.tracker.snapshot(),
            creating: self.tracker.is_creating(),
            notices: self.notices.list(),
        }
    }

    /// Generate a narrative and one image per scene, then add the sequence.
    ///
    /// All scene images must succeed; on any failure nothing is added.
    ///
    /// # Errors
    ///
    /// Validation error for an empty prompt, in-flight error while another
    /// creation runs, upstream error if any collaborator call fails.
    #[instrument(skip(self), fields(scenes = self.settings.scene_count))]
    pub async fn create_sequence(&self, prompt: &str) -> StoryboardResult<SequenceId> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(ValidationError::new(ValidationErrorKind::EmptyPrompt).into());
        }
        let _creating = self.tracker.begin_create()?;

        let scene_count = self.settings.scene_count;
        let outline = self
            .narrative
            .generate_narrative(prompt, scene_count)
            .await
            .map_err(|e| self.fail("generate the narrative", e))?;

        if !outline.has_scene_count(scene_count) {
            let err = UpstreamError::new(UpstreamErrorKind::Narrative(format!(
                "expected {} scenes, got {} prompts and {} dialogues",
                scene_count,
                outline.image_prompts.len(),
                outline.dialogues.len()
            )));
            return Err(self.fail("generate the narrative", err.into()));
        }
        debug!("Narrative ready, generating scene images");

        let image = self.collaborators.image();
        let images = try_join_all(outline.image_prompts.iter().map(|scene_prompt| {
            let request = ImageRequest::new(scene_prompt.as_str(), &self.settings.image_model);
            async move { image.generate_image(&request).await }
        }))
        .await
        .map_err(|e| self.fail("generate scene images", e))?;

        let scenes = outline
            .image_prompts
            .iter()
            .zip(&outline.dialogues)
            .zip(images)
            .map(|((scene_prompt, dialogue), generated)| {
                let used_prompt = generated
                    .expanded_prompt
                    .clone()
                    .unwrap_or_else(|| scene_prompt.clone());
                SceneArtifact::new(used_prompt, dialogue.as_str())
                    .apply(ScenePatch::image(generated.url, generated.seed))
            })
            .collect();

        let sequence = Sequence::new(prompt, outline.narrative.as_str(), scenes)?;
        let id = *sequence.id();
        {
            let mut sequences = self.sequences.write();
            *sequences = Arc::new(sequences.prepend(sequence));
        }
        *self.active.write() = Some(id);
        info!(sequence_id = %id, "Sequence created");
        Ok(id)
    }

    /// Replace one scene's image using its current image prompt.
    ///
    /// # Errors
    ///
    /// Validation error for an unknown target, in-flight error if the same
    /// scene is already regenerating, upstream error if the call fails.
    #[instrument(skip(self), fields(sequence_id = %id))]
    pub async fn regenerate_image(
        &self,
        id: SequenceId,
        scene_index: usize,
    ) -> StoryboardResult<Transition> {
        let scene = self.scene(id, scene_index)?;
        let _task = self
            .tracker
            .begin(TaskKey::new(id, scene_index, TaskKind::RegenerateImage))?;

        let seed = if self.settings.keep_seed_on_regenerate {
            scene.image_seed()
        } else {
            None
        };
        let request =
            ImageRequest::new(scene.image_prompt(), &self.settings.image_model).with_seed(seed);

        let generated = self
            .collaborators
            .image()
            .generate_image(&request)
            .await
            .map_err(|e| self.fail("regenerate the image", e))?;

        let mut patch = ScenePatch::image(generated.url, generated.seed);
        if let Some(expanded) = generated.expanded_prompt {
            patch = patch.with_image_prompt(expanded);
        }
        Ok(self.apply_scene(id, scene_index, patch))
    }

    /// Animate one scene's image into a clip of `duration`.
    ///
    /// The scene's dialogue is the motion prompt, falling back to its image
    /// prompt when the dialogue is empty.
    ///
    /// # Errors
    ///
    /// Validation error if the scene has no image, in-flight error if it is
    /// already animating, upstream error if the call fails.
    #[instrument(skip(self), fields(sequence_id = %id, duration = %duration))]
    pub async fn animate_scene(
        &self,
        id: SequenceId,
        scene_index: usize,
        duration: VideoDuration,
    ) -> StoryboardResult<Transition> {
        let scene = self.scene(id, scene_index)?;
        let image_url = match scene.image_url() {
            Some(url) if scene.has_image() => url.to_string(),
            _ => {
                return Err(ValidationError::new(ValidationErrorKind::MissingImage(
                    scene_index,
                ))
                .into());
            }
        };
        let _task = self
            .tracker
            .begin(TaskKey::new(id, scene_index, TaskKind::Animate))?;

        let prompt = if scene.dialogue().trim().is_empty() {
            scene.image_prompt().clone()
        } else {
            scene.dialogue().clone()
        };
        let request = VideoRequest {
            prompt,
            image_url,
            duration,
        };

        let generated = self
            .collaborators
            .video()
            .generate_video(&request)
            .await
            .map_err(|e| self.fail("animate the scene", e))?;

        let patch = ScenePatch::default().with_video(VideoClip::new(generated.url, duration));
        Ok(self.apply_scene(id, scene_index, patch))
    }

    /// Speak one scene's dialogue, using the configured voice when `voice` is `None`.
    ///
    /// # Errors
    ///
    /// Validation error if the dialogue is empty, in-flight error if speech
    /// is already being generated for the scene, upstream error if the call fails.
    #[instrument(skip(self, progress), fields(sequence_id = %id))]
    pub async fn synthesize_speech(
        &self,
        id: SequenceId,
        scene_index: usize,
        voice: Option<Voice>,
        progress: Option<ProgressSink>,
    ) -> StoryboardResult<Transition> {
        let scene = self.scene(id, scene_index)?;
        let text = scene.dialogue().trim();
        if text.is_empty() {
            return Err(
                ValidationError::new(ValidationErrorKind::EmptyDialogue(scene_index)).into(),
            );
        }
        let _task = self
            .tracker
            .begin(TaskKey::new(id, scene_index, TaskKind::SynthesizeSpeech))?;

        let request = SpeechRequest {
            text: text.to_string(),
            voice: voice.unwrap_or_else(|| self.default_voice.clone()),
        };

        let generated = self
            .collaborators
            .speech()
            .synthesize_speech(&request, progress)
            .await
            .map_err(|e| self.fail("generate speech", e))?;

        let patch = ScenePatch::default().with_audio_url(generated.url);
        Ok(self.apply_scene(id, scene_index, patch))
    }

    /// Merge the first scene that has both a clip and speech into one clip.
    ///
    /// # Errors
    ///
    /// Validation error if no scene qualifies, in-flight error if that scene
    /// is already composing, upstream error if the call fails.
    #[instrument(skip(self), fields(sequence_id = %id))]
    pub async fn compose(&self, id: SequenceId) -> StoryboardResult<Transition> {
        let sequence = self.require(id)?;
        let (scene_index, scene) = sequence
            .first_composable_scene()
            .ok_or_else(|| ValidationError::new(ValidationErrorKind::NoComposableScene))?;
        let (Some(video), Some(audio_url)) = (scene.video(), scene.audio_url()) else {
            return Err(ValidationError::new(ValidationErrorKind::NoComposableScene).into());
        };
        let duration = *video.duration();
        let request = ComposeRequest {
            video_url: video.url().clone(),
            audio_url: audio_url.clone(),
            duration,
        };
        let _task = self
            .tracker
            .begin(TaskKey::new(id, scene_index, TaskKind::Compose))?;
        debug!(scene_index, "Composing scene");

        let composed = self
            .collaborators
            .compose()
            .compose_clip(&request)
            .await
            .map_err(|e| self.fail("compose the clip", e))?;

        let clip = ComposedClip::new(composed.url, scene_index, duration);
        Ok(self.commit(id, |s| s.with_composed_video(clip)))
    }

    /// Burn captions into the composed clip.
    ///
    /// The result is dropped if the clip was recomposed meanwhile.
    ///
    /// # Errors
    ///
    /// Validation error if nothing is composed, in-flight error if captioning
    /// is running, upstream error if the service fails or times out.
    #[instrument(skip(self), fields(sequence_id = %id))]
    pub async fn caption_composed(&self, id: SequenceId) -> StoryboardResult<Transition> {
        let sequence = self.require(id)?;
        let clip = sequence
            .composed()
            .clone()
            .ok_or_else(|| ValidationError::new(ValidationErrorKind::NothingComposed))?;
        let _task = self
            .tracker
            .begin(TaskKey::new(id, *clip.source_scene(), TaskKind::Caption))?;

        let captioned = self
            .collaborators
            .caption()
            .caption_video(clip.url())
            .await
            .map_err(|e| self.fail("caption the clip", e))?;

        let source = clip.url().clone();
        Ok(self.commit(id, move |s| {
            if s.composed_video_url() == Some(source.as_str()) {
                s.with_captioned_video(captioned.url)
            } else {
                debug!("Composed clip changed while captioning, dropping captions");
                s.clone()
            }
        }))
    }

    /// Replace the narrative text.
    ///
    /// # Errors
    ///
    /// Validation error for an unknown sequence.
    #[instrument(skip(self, text), fields(sequence_id = %id))]
    pub fn edit_narrative(&self, id: SequenceId, text: &str) -> StoryboardResult<()> {
        self.edit(id, None, |s| s.with_narrative(text))
    }

    /// Replace the base prompt.
    ///
    /// # Errors
    ///
    /// Validation error for an unknown sequence.
    #[instrument(skip(self, text), fields(sequence_id = %id))]
    pub fn edit_base_prompt(&self, id: SequenceId, text: &str) -> StoryboardResult<()> {
        self.edit(id, None, |s| s.with_base_prompt(text))
    }

    /// Replace one scene's dialogue. Existing speech audio is kept.
    ///
    /// # Errors
    ///
    /// Validation error for an unknown sequence or scene.
    #[instrument(skip(self, text), fields(sequence_id = %id))]
    pub fn edit_dialogue(
        &self,
        id: SequenceId,
        scene_index: usize,
        text: &str,
    ) -> StoryboardResult<()> {
        self.edit(id, Some(scene_index), |s| {
            s.with_scene(scene_index, ScenePatch::default().with_dialogue(text))
        })
    }

    /// Replace one scene's image prompt. The existing image is kept.
    ///
    /// # Errors
    ///
    /// Validation error for an unknown sequence or scene.
    #[instrument(skip(self, text), fields(sequence_id = %id))]
    pub fn edit_image_prompt(
        &self,
        id: SequenceId,
        scene_index: usize,
        text: &str,
    ) -> StoryboardResult<()> {
        self.edit(id, Some(scene_index), |s| {
            s.with_scene(scene_index, ScenePatch::default().with_image_prompt(text))
        })
    }

    /// Remove a sequence. Unknown ids are a no-op.
    ///
    /// If the removed sequence was selected, the newest remaining one is
    /// selected instead. Tasks still running for it finish and are discarded.
    #[instrument(skip(self), fields(sequence_id = %id))]
    pub fn delete_sequence(&self, id: SequenceId) {
        let remaining = {
            let mut sequences = self.sequences.write();
            if !sequences.contains(&id) {
                debug!("Sequence already absent");
                return;
            }
            *sequences = Arc::new(sequences.remove(&id));
            Arc::clone(&sequences)
        };

        let mut active = self.active.write();
        if *active == Some(id) {
            *active = remaining.first().map(|s| *s.id());
        }
        info!(remaining = remaining.len(), "Sequence deleted");
    }

    /// Select a sequence for display.
    ///
    /// # Errors
    ///
    /// Validation error for an unknown sequence.
    pub fn select_sequence(&self, id: SequenceId) -> StoryboardResult<()> {
        self.require(id)?;
        *self.active.write() = Some(id);
        Ok(())
    }

    fn require(&self, id: SequenceId) -> StoryboardResult<Sequence> {
        self.sequence(id).ok_or_else(|| {
            ValidationError::new(ValidationErrorKind::UnknownSequence(id.to_string())).into()
        })
    }

    fn scene(&self, id: SequenceId, scene_index: usize) -> StoryboardResult<SceneArtifact> {
        let sequence = self.require(id)?;
        sequence.scene(scene_index).cloned().ok_or_else(|| {
            ValidationError::new(ValidationErrorKind::SceneIndexOutOfRange {
                index: scene_index,
                len: sequence.scene_count(),
            })
            .into()
        })
    }

    /// Apply `f` to the latest version of sequence `id`.
    fn commit<F>(&self, id: SequenceId, f: F) -> Transition
    where
        F: FnOnce(&Sequence) -> Sequence,
    {
        let mut sequences = self.sequences.write();
        match sequences.update(&id, f) {
            Some(updated) => {
                *sequences = Arc::new(updated);
                Transition::Applied
            }
            None => {
                debug!(sequence_id = %id, "Target deleted, discarding result");
                Transition::Discarded
            }
        }
    }

    fn apply_scene(&self, id: SequenceId, scene_index: usize, patch: ScenePatch) -> Transition {
        self.commit(id, |s| s.with_scene(scene_index, patch))
    }

    /// Synchronous edit with validation against the latest state.
    fn edit<F>(&self, id: SequenceId, scene_index: Option<usize>, f: F) -> StoryboardResult<()>
    where
        F: FnOnce(&Sequence) -> Sequence,
    {
        let mut sequences = self.sequences.write();
        let sequence = sequences.get(&id).ok_or_else(|| {
            ValidationError::new(ValidationErrorKind::UnknownSequence(id.to_string()))
        })?;
        if let Some(index) = scene_index
            && index >= sequence.scene_count()
        {
            return Err(ValidationError::new(ValidationErrorKind::SceneIndexOutOfRange {
                index,
                len: sequence.scene_count(),
            })
            .into());
        }
        if let Some(updated) = sequences.update(&id, f) {
            *sequences = Arc::new(updated);
        }
        Ok(())
    }

    /// Log an upstream failure and surface it as a notice.
    fn fail(&self, action: &str, err: StoryboardError) -> StoryboardError {
        error!(action, error = %err, "Generation failed");
        self.notices
            .push(format!("Failed to {}: {}", action, err.user_message()));
        err
    }
}

impl std::fmt::Debug for Storyboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storyboard")
            .field("sequences", &self.sequences.read().len())
            .field("active", &self.active())
            .field("tracker", &self.tracker)
            .finish_non_exhaustive()
    }
}
