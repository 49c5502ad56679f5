//! Clip durations accepted by the video and compose services.

use serde::{Deserialize, Serialize};
use storyboard_error::{ValidationError, ValidationErrorKind};

/// Length of an animated clip. The video service only renders 5 or 10 seconds.
///
/// # Examples
///
/// ```
/// use storyboard_core::VideoDuration;
///
/// assert_eq!(VideoDuration::try_from(10).unwrap(), VideoDuration::Ten);
/// assert!(VideoDuration::try_from(7).is_err());
/// assert_eq!(VideoDuration::Five.millis(), 5_000);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(try_from = "u32", into = "u32")]
pub enum VideoDuration {
    /// Five seconds
    #[default]
    #[display("5")]
    Five,
    /// Ten seconds
    #[display("10")]
    Ten,
}

impl VideoDuration {
    /// Duration in whole seconds.
    pub fn seconds(self) -> u32 {
        match self {
            Self::Five => 5,
            Self::Ten => 10,
        }
    }

    /// Duration in milliseconds, as used by compose keyframes.
    pub fn millis(self) -> u64 {
        u64::from(self.seconds()) * 1000
    }
}

impl TryFrom<u32> for VideoDuration {
    type Error = ValidationError;

    #[track_caller]
    fn try_from(seconds: u32) -> Result<Self, Self::Error> {
        match seconds {
            5 => Ok(Self::Five),
            10 => Ok(Self::Ten),
            other => Err(ValidationError::new(ValidationErrorKind::InvalidDuration(
                other,
            ))),
        }
    }
}

impl From<VideoDuration> for u32 {
    fn from(duration: VideoDuration) -> Self {
        duration.seconds()
    }
}
