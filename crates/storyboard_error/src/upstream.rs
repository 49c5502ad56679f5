//! Failures reported by external generation services.

/// Which collaborator failed, and how.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum UpstreamErrorKind {
    /// Narrative service failed or returned an unusable outline
    #[display("Narrative generation failed: {}", _0)]
    Narrative(String),
    /// Image service failed
    #[display("Image generation failed: {}", _0)]
    ImageGeneration(String),
    /// Video service failed
    #[display("Video generation failed: {}", _0)]
    VideoGeneration(String),
    /// Speech service failed
    #[display("Speech generation failed: {}", _0)]
    SpeechGeneration(String),
    /// Compose service failed
    #[display("Clip composition failed: {}", _0)]
    Compose(String),
    /// Caption render did not finish in time
    #[display("Captioning timed out after {}s", _0)]
    CaptionTimeout(u64),
    /// Caption service failed
    #[display("Caption service failed: {}", _0)]
    CaptionService(String),
}

/// Upstream error with location tracking.
///
/// # Examples
///
/// ```
/// use storyboard_error::{UpstreamError, UpstreamErrorKind};
///
/// let err = UpstreamError::new(UpstreamErrorKind::CaptionTimeout(120));
/// assert!(format!("{}", err).contains("120s"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Upstream Error: {} at line {} in {}", kind, line, file)]
pub struct UpstreamError {
    /// The specific failure
    pub kind: UpstreamErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl UpstreamError {
    /// Create a new UpstreamError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: UpstreamErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &UpstreamErrorKind {
        &self.kind
    }
}
