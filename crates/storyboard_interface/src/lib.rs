//! Collaborator service traits for the Storyboard generation engine.
//!
//! Each external generation capability (narrative, image, video, speech,
//! composition, captions) is a small async trait. The orchestrator only ever
//! sees these traits, bundled in [`Collaborators`], so HTTP adapters and test
//! doubles are interchangeable.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod collaborators;
mod traits;
mod types;

pub use collaborators::{Collaborators, CollaboratorsBuilder};
pub use traits::{
    CaptionService, ComposeService, ImageService, NarrativeService, ProgressSink, SpeechService,
    VideoService,
};
pub use types::{
    CaptionedVideo, ComposeRequest, ComposedVideo, GeneratedAudio, GeneratedImage,
    GeneratedVideo, ImageRequest, NarrativeOutline, SpeechRequest, VideoRequest,
};
