//! Precondition failures rejected before any external call.

/// Specific precondition violations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ValidationErrorKind {
    /// Base prompt is empty or whitespace only
    #[display("Prompt cannot be empty")]
    EmptyPrompt,
    /// Dialogue text to synthesize is empty
    #[display("Scene {} has no dialogue to synthesize", _0)]
    EmptyDialogue(usize),
    /// Scene index is outside the sequence
    #[display("Scene index {} out of range for sequence of {} scenes", index, len)]
    SceneIndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of scenes in the sequence
        len: usize,
    },
    /// No sequence with this id exists
    #[display("Sequence {} does not exist", _0)]
    UnknownSequence(String),
    /// A sequence must have at least one scene
    #[display("A sequence must contain at least one scene")]
    NoScenes,
    /// Scene has no image to animate
    #[display("Scene {} has no image yet", _0)]
    MissingImage(usize),
    /// No scene has both a video and an audio track
    #[display("No scene has both a video and an audio track to compose")]
    NoComposableScene,
    /// Captioning requires a composed clip
    #[display("Sequence has no composed video to caption")]
    NothingComposed,
    /// Video duration other than 5 or 10 seconds
    #[display("Unsupported video duration {}s (expected 5 or 10)", _0)]
    InvalidDuration(u32),
    /// Voice id not in the catalog
    #[display("Unknown voice '{}'", _0)]
    UnknownVoice(String),
}

/// Validation error with location tracking.
///
/// # Examples
///
/// ```
/// use storyboard_error::{ValidationError, ValidationErrorKind};
///
/// let err = ValidationError::new(ValidationErrorKind::InvalidDuration(7));
/// assert!(format!("{}", err).contains("7s"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Validation Error: {} at line {} in {}", kind, line, file)]
pub struct ValidationError {
    /// The specific precondition that failed
    pub kind: ValidationErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ValidationError {
    /// Create a new ValidationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ValidationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ValidationErrorKind {
        &self.kind
    }
}
