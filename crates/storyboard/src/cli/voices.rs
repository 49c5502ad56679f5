//! Voice catalog listing.

use storyboard::{SpeechLanguage, voice_catalog};

/// Print the voice catalog, optionally filtered to one language.
pub fn list_voices(language: Option<SpeechLanguage>) {
    let voices = voice_catalog()
        .iter()
        .filter(|v| language.is_none_or(|lang| v.language == lang));

    for voice in voices {
        println!("{:<12} {:<12} {}", voice.id, voice.name, voice.language);
    }
}
