//! Top-level error wrapper types.

use crate::{
    ConfigError, InFlightError, JsonError, UpstreamError, UpstreamErrorKind, ValidationError,
};

/// Every error the Storyboard workspace can produce.
///
/// # Examples
///
/// ```
/// use storyboard_error::{StoryboardError, StoryboardErrorKind, UpstreamError, UpstreamErrorKind};
///
/// let err: StoryboardError =
///     UpstreamError::new(UpstreamErrorKind::VideoGeneration("queue full".into())).into();
/// assert!(matches!(err.kind(), StoryboardErrorKind::Upstream(_)));
/// assert!(format!("{}", err).contains("Video generation failed: queue full"));
/// ```
#[derive(Debug, Clone, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum StoryboardErrorKind {
    /// Precondition failed before any external call
    #[from(ValidationError)]
    Validation(ValidationError),
    /// External collaborator failed
    #[from(UpstreamError)]
    Upstream(UpstreamError),
    /// Task key already in flight
    #[from(InFlightError)]
    AlreadyInFlight(InFlightError),
    /// JSON rendering error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
}

/// Storyboard error with kind discrimination.
///
/// # Examples
///
/// ```
/// use storyboard_error::{StoryboardResult, ConfigError};
///
/// fn might_fail() -> StoryboardResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// let err = might_fail().unwrap_err();
/// assert!(!err.is_upstream());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storyboard Error: {}", _0)]
pub struct StoryboardError(Box<StoryboardErrorKind>);

impl StoryboardError {
    /// Create a new error from a kind.
    pub fn new(kind: StoryboardErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StoryboardErrorKind {
        &self.0
    }

    /// Whether an external collaborator failed.
    pub fn is_upstream(&self) -> bool {
        matches!(self.kind(), StoryboardErrorKind::Upstream(_))
    }

    /// The collaborator failure, if this is one.
    pub fn upstream_kind(&self) -> Option<&UpstreamErrorKind> {
        match self.kind() {
            StoryboardErrorKind::Upstream(e) => Some(e.kind()),
            _ => None,
        }
    }

    /// Whether this is a precondition failure.
    pub fn is_validation(&self) -> bool {
        matches!(self.kind(), StoryboardErrorKind::Validation(_))
    }

    /// Whether this is a task-key exclusivity violation.
    pub fn is_already_in_flight(&self) -> bool {
        matches!(self.kind(), StoryboardErrorKind::AlreadyInFlight(_))
    }

    /// Short message suitable for a dismissible notice, without source locations.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyboard_error::{StoryboardError, ValidationError, ValidationErrorKind};
    ///
    /// let err: StoryboardError = ValidationError::new(ValidationErrorKind::EmptyPrompt).into();
    /// assert_eq!(err.user_message(), "Prompt cannot be empty");
    /// ```
    pub fn user_message(&self) -> String {
        match self.kind() {
            StoryboardErrorKind::Validation(e) => e.kind.to_string(),
            StoryboardErrorKind::Upstream(e) => e.kind.to_string(),
            StoryboardErrorKind::AlreadyInFlight(e) => {
                format!("{} is already in progress", e.task)
            }
            StoryboardErrorKind::Json(e) => format!("Could not render JSON: {}", e.message),
            StoryboardErrorKind::Config(e) => format!("Configuration problem: {}", e.message),
        }
    }
}

// Generic From implementation for any type that converts to StoryboardErrorKind
impl<T> From<T> for StoryboardError
where
    T: Into<StoryboardErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Storyboard operations.
pub type StoryboardResult<T> = std::result::Result<T, StoryboardError>;
