//! Response handling shared by every adapter.
//!
//! Every failure is reported under the collaborator that was being called,
//! so a client serving several roles still tells callers which one failed.

use serde::de::DeserializeOwned;
use storyboard_error::{
    ConfigError, StoryboardError, StoryboardResult, UpstreamError, UpstreamErrorKind,
};

/// Builds the collaborator-specific error kind from a message.
pub(crate) type Failure = fn(String) -> UpstreamErrorKind;

/// Read a required API key from the environment.
#[track_caller]
pub(crate) fn api_key(var: &str) -> StoryboardResult<String> {
    match std::env::var(var) {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(ConfigError::new(format!("{} not set", var)).into()),
    }
}

/// Map a transport failure.
#[track_caller]
pub(crate) fn transport(service: &str, failure: Failure, e: reqwest::Error) -> StoryboardError {
    UpstreamError::new(failure(format!("{} request failed: {}", service, e))).into()
}

/// Check the status and decode the body of a collaborator response.
pub(crate) async fn read_json<T: DeserializeOwned>(
    service: &str,
    failure: Failure,
    response: reqwest::Response,
) -> StoryboardResult<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| transport(service, failure, e))?;

    if !status.is_success() {
        return Err(UpstreamError::new(failure(format!(
            "{} returned HTTP {}: {}",
            service,
            status.as_u16(),
            body
        )))
        .into());
    }

    serde_json::from_str(&body).map_err(|e| {
        UpstreamError::new(failure(format!("malformed response from {}: {}", service, e))).into()
    })
}
