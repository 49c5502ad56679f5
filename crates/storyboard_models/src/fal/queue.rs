//! Submit, poll and fetch against the fal.ai queue.

use super::dto::{QueueStatus, QueueSubmission};
use crate::http::{Failure, read_json, transport};
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use storyboard_error::{StoryboardResult, UpstreamError};
use storyboard_interface::ProgressSink;
use tokio::time::{Instant, sleep};
use tracing::{debug, instrument, warn};

pub(crate) const SERVICE: &str = "fal";

/// Queue connection shared by every fal-backed service.
#[derive(Debug, Clone)]
pub(crate) struct FalQueue {
    pub client: Client,
    pub api_key: String,
    pub base_url: String,
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl FalQueue {
    /// Run one job to completion and decode its result.
    ///
    /// `failure` builds the service-specific error for failed or timed-out jobs.
    #[instrument(skip(self, input, progress, failure))]
    pub async fn run<I, O>(
        &self,
        app: &str,
        input: &I,
        progress: Option<&ProgressSink>,
        failure: Failure,
    ) -> StoryboardResult<O>
    where
        I: Serialize + Sync,
        O: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), app);
        debug!(url = %url, "Submitting job");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Key {}", self.api_key))
            .json(input)
            .send()
            .await
            .map_err(|e| transport(SERVICE, failure, e))?;
        let submission: QueueSubmission = read_json(SERVICE, failure, response).await?;
        debug!(request_id = %submission.request_id, "Job queued");

        self.wait(&submission, progress, failure).await?;

        let response = self
            .client
            .get(&submission.response_url)
            .header("Authorization", format!("Key {}", self.api_key))
            .send()
            .await
            .map_err(|e| transport(SERVICE, failure, e))?;
        read_json(SERVICE, failure, response).await
    }

    async fn wait(
        &self,
        submission: &QueueSubmission,
        progress: Option<&ProgressSink>,
        failure: Failure,
    ) -> StoryboardResult<()> {
        let deadline = Instant::now() + self.timeout;
        let mut seen_logs = 0;

        loop {
            let response = self
                .client
                .get(&submission.status_url)
                .query(&[("logs", "1")])
                .header("Authorization", format!("Key {}", self.api_key))
                .send()
                .await
                .map_err(|e| transport(SERVICE, failure, e))?;
            let status: QueueStatus = read_json(SERVICE, failure, response).await?;

            if let (Some(sink), Some(logs)) = (progress, status.logs.as_ref()) {
                for log in logs.iter().skip(seen_logs) {
                    sink(&log.message);
                }
                seen_logs = seen_logs.max(logs.len());
            }

            match status.status.as_str() {
                "COMPLETED" => {
                    debug!(request_id = %submission.request_id, "Job completed");
                    return Ok(());
                }
                "IN_QUEUE" | "IN_PROGRESS" => {}
                other => {
                    warn!(request_id = %submission.request_id, status = other, "Job failed");
                    return Err(UpstreamError::new(failure(format!(
                        "job {} ended with status {}",
                        submission.request_id, other
                    )))
                    .into());
                }
            }

            if Instant::now() >= deadline {
                return Err(UpstreamError::new(failure(format!(
                    "job {} did not finish within {}s",
                    submission.request_id,
                    self.timeout.as_secs()
                )))
                .into());
            }
            sleep(self.poll_interval).await;
        }
    }
}
