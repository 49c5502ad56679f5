//! Task-key exclusivity violations.

/// A generation task with the same key is already running.
///
/// # Examples
///
/// ```
/// use storyboard_error::InFlightError;
///
/// let err = InFlightError::new("regenerate-image for scene 2");
/// assert!(format!("{}", err).contains("already in flight"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Task already in flight: {} at line {} in {}", task, line, file)]
pub struct InFlightError {
    /// Description of the task key that is busy
    pub task: String,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl InFlightError {
    /// Create a new InFlightError with automatic location tracking.
    #[track_caller]
    pub fn new(task: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            task: task.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
