//! Speech voices and the languages they speak.

use serde::{Deserialize, Serialize};
use storyboard_error::{ValidationError, ValidationErrorKind};

/// Language families offered by the speech service.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SpeechLanguage {
    /// American English
    AmericanEnglish,
    /// British English
    BritishEnglish,
    /// French
    French,
    /// German
    German,
    /// Italian
    Italian,
    /// Polish
    Polish,
    /// Portuguese
    Portuguese,
    /// Spanish
    Spanish,
    /// Turkish
    Turkish,
}

/// A selectable voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VoiceOption {
    /// Voice id sent to the speech service
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Language the voice belongs to
    pub language: SpeechLanguage,
}

const fn option(id: &'static str, name: &'static str, language: SpeechLanguage) -> VoiceOption {
    VoiceOption { id, name, language }
}

use SpeechLanguage::*;

static CATALOG: [VoiceOption; 40] = [
    option("af_aoede", "Aoede", AmericanEnglish),
    option("af_nova", "Nova", AmericanEnglish),
    option("af_sarah", "Sarah", AmericanEnglish),
    option("af_nicole", "Nicole", AmericanEnglish),
    option("af_river", "River", AmericanEnglish),
    option("am_adam", "Adam", AmericanEnglish),
    option("am_michael", "Michael", AmericanEnglish),
    option("am_liam", "Liam", AmericanEnglish),
    option("bf_emma", "Emma", BritishEnglish),
    option("bf_lucy", "Lucy", BritishEnglish),
    option("bm_adam", "Adam", BritishEnglish),
    option("bm_james", "James", BritishEnglish),
    option("ff_emma", "Emma", French),
    option("ff_lucy", "Lucy", French),
    option("fm_adam", "Adam", French),
    option("fm_james", "James", French),
    option("gf_emma", "Emma", German),
    option("gf_lucy", "Lucy", German),
    option("gm_adam", "Adam", German),
    option("gm_james", "James", German),
    option("if_emma", "Emma", Italian),
    option("if_lucy", "Lucy", Italian),
    option("im_adam", "Adam", Italian),
    option("im_james", "James", Italian),
    option("pf_emma", "Emma", Polish),
    option("pf_lucy", "Lucy", Polish),
    option("pm_adam", "Adam", Polish),
    option("pm_james", "James", Polish),
    option("pf_emma", "Emma", Portuguese),
    option("pf_lucy", "Lucy", Portuguese),
    option("pm_adam", "Adam", Portuguese),
    option("pm_james", "James", Portuguese),
    option("sf_emma", "Emma", Spanish),
    option("sf_lucy", "Lucy", Spanish),
    option("sm_adam", "Adam", Spanish),
    option("sm_james", "James", Spanish),
    option("tf_emma", "Emma", Turkish),
    option("tf_lucy", "Lucy", Turkish),
    option("tm_adam", "Adam", Turkish),
    option("tm_james", "James", Turkish),
];

/// Every voice the speech service accepts, grouped by language.
pub fn voice_catalog() -> &'static [VoiceOption] {
    &CATALOG
}

/// Voice used when the caller does not pick one.
pub const DEFAULT_VOICE: &str = "af_nova";

/// A validated voice id.
///
/// # Examples
///
/// ```
/// use storyboard_core::{SpeechLanguage, Voice};
///
/// let voice = Voice::parse("bf_emma").unwrap();
/// assert_eq!(voice.language(), SpeechLanguage::BritishEnglish);
/// assert!(Voice::parse("zz_nobody").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(transparent)]
pub struct Voice(String);

impl Voice {
    /// Parse a voice id, rejecting ids not in the catalog.
    ///
    /// # Errors
    ///
    /// Returns a validation error for unknown voices.
    #[track_caller]
    pub fn parse(id: &str) -> Result<Self, ValidationError> {
        let id = id.trim();
        if CATALOG.iter().any(|v| v.id == id) {
            Ok(Self(id.to_string()))
        } else {
            Err(ValidationError::new(ValidationErrorKind::UnknownVoice(
                id.to_string(),
            )))
        }
    }

    /// The voice id.
    pub fn id(&self) -> &str {
        &self.0
    }

    /// Language derived from the id's first letter.
    ///
    /// Polish and Portuguese voices share the `p` prefix; such ids resolve to
    /// Polish. Unknown prefixes fall back to American English.
    pub fn language(&self) -> SpeechLanguage {
        match self.0.chars().next() {
            Some('a') => AmericanEnglish,
            Some('b') => BritishEnglish,
            Some('f') => French,
            Some('g') => German,
            Some('i') => Italian,
            Some('p') => Polish,
            Some('s') => Spanish,
            Some('t') => Turkish,
            _ => AmericanEnglish,
        }
    }
}

impl Default for Voice {
    fn default() -> Self {
        Self(DEFAULT_VOICE.to_string())
    }
}
