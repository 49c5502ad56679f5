//! Configuration structures and loading.

use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use storyboard_core::Voice;
use storyboard_error::{ConfigError, StoryboardError, StoryboardResult, ValidationError};
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../../../storyboard.toml");

/// Sequence-level generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryboardSettings {
    /// Scenes per sequence
    pub scene_count: usize,
    /// Image model identifier
    pub image_model: String,
    /// Voice used when the caller does not choose one
    pub default_voice: String,
    /// Reuse the current image seed when regenerating
    #[serde(default)]
    pub keep_seed_on_regenerate: bool,
}

/// Narrative service settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeSettings {
    /// Chat completions API root
    pub base_url: String,
    /// Chat model
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Completion token cap
    pub max_tokens: u32,
    /// Appended to every scene image prompt
    pub style_suffix: String,
}

/// fal.ai queue settings shared by the image, video, speech and compose adapters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FalSettings {
    /// Queue API root
    pub base_url: String,
    /// Image-to-video app
    pub video_model: String,
    /// Aspect ratio requested for clips
    pub aspect_ratio: String,
    /// Track composition app
    pub compose_model: String,
    /// Text-to-speech app prefix; the language is appended
    pub speech_model_prefix: String,
    /// Rendered image width
    pub image_width: u32,
    /// Rendered image height
    pub image_height: u32,
    /// Delay between queue status polls
    pub poll_interval_ms: u64,
    /// Give up on a queued job after this long
    pub timeout_secs: u64,
}

impl StoryboardSettings {
    /// Resolve `default_voice` against the voice catalog.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unknown voice id.
    pub fn default_voice(&self) -> Result<Voice, ValidationError> {
        Voice::parse(&self.default_voice)
    }
}

impl FalSettings {
    /// Poll delay as a duration.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Job timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Caption service settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionSettings {
    /// Caption API root
    pub base_url: String,
    /// Delay between render status polls
    pub poll_interval_secs: u64,
    /// Give up on a render after this long
    pub timeout_secs: u64,
}

impl CaptionSettings {
    /// Poll delay as a duration.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Render timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Complete configuration.
///
/// # Example
///
/// ```
/// use storyboard_config::StoryboardConfig;
///
/// let config = StoryboardConfig::bundled().unwrap();
/// assert_eq!(config.storyboard.scene_count, 5);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryboardConfig {
    /// Sequence-level settings
    pub storyboard: StoryboardSettings,
    /// Narrative service settings
    pub narrative: NarrativeSettings,
    /// fal.ai settings
    pub fal: FalSettings,
    /// Caption service settings
    pub caption: CaptionSettings,
}

impl StoryboardConfig {
    /// Bundled defaults only, ignoring user files.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled file does not parse.
    pub fn bundled() -> StoryboardResult<Self> {
        Self::build(Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml)))
    }

    /// Load configuration from one file layered over the bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> StoryboardResult<Self> {
        debug!("Loading configuration from file");

        Self::build(
            Config::builder()
                .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
                .add_source(File::from(path.as_ref())),
        )
    }

    /// Load configuration with precedence: current dir > home dir > bundled defaults.
    ///
    /// User files are optional and silently skipped if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if any present file fails to parse.
    #[instrument]
    pub fn load() -> StoryboardResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/storyboard/storyboard.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("storyboard").required(false));

        Self::build(builder)
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> StoryboardResult<Self> {
        builder
            .build()
            .map_err(|e| {
                StoryboardError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                StoryboardError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Check values the type system cannot.
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the first bad value.
    pub fn validate(&self) -> StoryboardResult<()> {
        if self.storyboard.scene_count == 0 {
            return Err(ConfigError::new("storyboard.scene_count must be at least 1").into());
        }
        if self.storyboard.image_model.trim().is_empty() {
            return Err(ConfigError::new("storyboard.image_model cannot be empty").into());
        }
        self.default_voice().map_err(|e| {
            ConfigError::new(format!("storyboard.default_voice: {}", e.kind()))
        })?;
        if !(0.0..=2.0).contains(&self.narrative.temperature) {
            return Err(ConfigError::new(format!(
                "narrative.temperature must be within 0.0..=2.0, got {}",
                self.narrative.temperature
            ))
            .into());
        }
        if self.fal.poll_interval_ms == 0 {
            return Err(ConfigError::new("fal.poll_interval_ms must be positive").into());
        }
        if self.caption.poll_interval_secs == 0 {
            return Err(ConfigError::new("caption.poll_interval_secs must be positive").into());
        }
        Ok(())
    }

    /// The configured default voice.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the id is not in the voice catalog.
    pub fn default_voice(&self) -> Result<Voice, ValidationError> {
        self.storyboard.default_voice()
    }
}
