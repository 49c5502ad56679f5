//! Configuration and credential errors.

/// Invalid settings, a missing API key, or an incomplete collaborator set.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", message, line, file)]
pub struct ConfigError {
    /// Error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new ConfigError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyboard_error::{ConfigError, StoryboardError};
    ///
    /// let err: StoryboardError = ConfigError::new("FAL_KEY not set").into();
    /// assert_eq!(err.user_message(), "Configuration problem: FAL_KEY not set");
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
