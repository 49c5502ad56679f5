//! The injected set of service clients.

use crate::{
    CaptionService, ComposeService, ImageService, NarrativeService, SpeechService, VideoService,
};
use std::sync::Arc;
use storyboard_error::ConfigError;

/// One client per collaborator, shared by every orchestration call.
#[derive(Clone, derive_builder::Builder, derive_getters::Getters)]
#[builder(pattern = "owned", build_fn(private, name = "build_internal"))]
pub struct Collaborators {
    /// Narrative outline service
    narrative: Arc<dyn NarrativeService>,
    /// Still image service
    image: Arc<dyn ImageService>,
    /// Image-to-video service
    video: Arc<dyn VideoService>,
    /// Text-to-speech service
    speech: Arc<dyn SpeechService>,
    /// Clip composition service
    compose: Arc<dyn ComposeService>,
    /// Caption service
    caption: Arc<dyn CaptionService>,
}

impl Collaborators {
    /// Start building a collaborator set.
    pub fn builder() -> CollaboratorsBuilder {
        CollaboratorsBuilder::default()
    }
}

impl CollaboratorsBuilder {
    /// Build the collaborator set.
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the first missing service.
    #[track_caller]
    pub fn build(self) -> Result<Collaborators, ConfigError> {
        self.build_internal()
            .map_err(|e| ConfigError::new(format!("Incomplete collaborator set: {}", e)))
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}
