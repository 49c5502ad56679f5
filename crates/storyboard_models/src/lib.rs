//! HTTP adapters for the Storyboard collaborator services.
//!
//! - [`OpenAiNarrativeClient`] - narrative outlines via chat completions in JSON mode
//! - [`FalClient`] - images, clips, speech and composition via the fal.ai queue API
//! - [`ZapCapClient`] - burned-in captions
//!
//! Every client accepts an explicit base URL so it can be pointed at a mock
//! server; credentials come from the environment.
//!
//! ```no_run
//! use storyboard_config::StoryboardConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = StoryboardConfig::load()?;
//! let collaborators = storyboard_models::http_collaborators(&config)?;
//! # let _ = collaborators;
//! # Ok(())
//! # }
//! ```

mod fal;
mod http;
mod openai;
mod zapcap;

pub use fal::FalClient;
pub use openai::OpenAiNarrativeClient;
pub use zapcap::ZapCapClient;

use std::sync::Arc;
use storyboard_config::StoryboardConfig;
use storyboard_error::StoryboardResult;
use storyboard_interface::Collaborators;

/// Build the production collaborator set from configuration and environment keys.
///
/// # Errors
///
/// Returns a configuration error if an API key is missing.
pub fn http_collaborators(config: &StoryboardConfig) -> StoryboardResult<Collaborators> {
    let narrative = Arc::new(OpenAiNarrativeClient::new(&config.narrative)?);
    let fal = Arc::new(FalClient::new(&config.fal)?);
    let captions = Arc::new(ZapCapClient::new(&config.caption)?);

    Ok(Collaborators::builder()
        .narrative(narrative)
        .image(fal.clone())
        .video(fal.clone())
        .speech(fal.clone())
        .compose(fal)
        .caption(captions)
        .build()?)
}
