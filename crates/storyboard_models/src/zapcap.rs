//! Burned-in captions via the ZapCap API.

use crate::http::{Failure, api_key, read_json, transport};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use storyboard_config::CaptionSettings;
use storyboard_error::{StoryboardResult, UpstreamError, UpstreamErrorKind};
use storyboard_interface::{CaptionService, CaptionedVideo};
use tokio::time::{Instant, sleep};
use tracing::{debug, instrument, warn};

const SERVICE: &str = "zapcap";
const FAILURE: Failure = UpstreamErrorKind::CaptionService;

#[derive(Debug, Serialize)]
struct RegisterVideo<'a> {
    url: &'a str,
}

#[derive(Debug, Deserialize)]
struct VideoHandle {
    id: String,
}

#[derive(Debug, Deserialize)]
struct Template {
    id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateTask<'a> {
    template_id: &'a str,
    auto_approve: bool,
    language: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskHandle {
    task_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskStatus {
    status: String,
    #[serde(default)]
    download_url: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// ZapCap caption client.
#[derive(Debug, Clone)]
pub struct ZapCapClient {
    client: Client,
    api_key: String,
    base_url: String,
    poll_interval: Duration,
    timeout: Duration,
}

impl ZapCapClient {
    /// Create a client using `ZAPCAP_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the key is not set.
    #[instrument(skip_all)]
    pub fn new(settings: &CaptionSettings) -> StoryboardResult<Self> {
        Ok(Self::with_api_key(api_key("ZAPCAP_API_KEY")?, settings))
    }

    /// Create a client with an explicit key.
    pub fn with_api_key(api_key: impl Into<String>, settings: &CaptionSettings) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            poll_interval: settings.poll_interval(),
            timeout: settings.timeout(),
        }
    }

    /// Point the client at another API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override render polling cadence and timeout.
    pub fn with_polling(mut self, interval: Duration, timeout: Duration) -> Self {
        self.poll_interval = interval;
        self.timeout = timeout;
        self
    }

    async fn register(&self, video_url: &str) -> StoryboardResult<String> {
        let response = self
            .client
            .post(format!("{}/videos/url", self.base_url))
            .header("x-api-key", &self.api_key)
            .json(&RegisterVideo { url: video_url })
            .send()
            .await
            .map_err(|e| transport(SERVICE, FAILURE, e))?;
        let handle: VideoHandle = read_json(SERVICE, FAILURE, response).await?;
        Ok(handle.id)
    }

    async fn first_template(&self) -> StoryboardResult<String> {
        let response = self
            .client
            .get(format!("{}/templates", self.base_url))
            .header("x-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| transport(SERVICE, FAILURE, e))?;
        let templates: Vec<Template> = read_json(SERVICE, FAILURE, response).await?;
        templates.into_iter().next().map(|t| t.id).ok_or_else(|| {
            UpstreamError::new(UpstreamErrorKind::CaptionService(
                "no caption templates available".to_string(),
            ))
            .into()
        })
    }

    async fn create_task(&self, video_id: &str, template_id: &str) -> StoryboardResult<String> {
        let response = self
            .client
            .post(format!("{}/videos/{}/task", self.base_url, video_id))
            .header("x-api-key", &self.api_key)
            .json(&CreateTask {
                template_id,
                auto_approve: true,
                language: "en",
            })
            .send()
            .await
            .map_err(|e| transport(SERVICE, FAILURE, e))?;
        let handle: TaskHandle = read_json(SERVICE, FAILURE, response).await?;
        Ok(handle.task_id)
    }

    async fn wait_for_render(&self, video_id: &str, task_id: &str) -> StoryboardResult<String> {
        let deadline = Instant::now() + self.timeout;
        let url = format!("{}/videos/{}/task/{}", self.base_url, video_id, task_id);

        loop {
            let response = self
                .client
                .get(&url)
                .header("x-api-key", &self.api_key)
                .send()
                .await
                .map_err(|e| transport(SERVICE, FAILURE, e))?;
            let task: TaskStatus = read_json(SERVICE, FAILURE, response).await?;
            debug!(task_id, status = %task.status, "Caption render status");

            match task.status.as_str() {
                "completed" => {
                    return task.download_url.filter(|u| !u.is_empty()).ok_or_else(|| {
                        UpstreamError::new(UpstreamErrorKind::CaptionService(
                            "render completed without a download url".to_string(),
                        ))
                        .into()
                    });
                }
                "failed" => {
                    let reason = task.error.unwrap_or_else(|| "render failed".to_string());
                    warn!(task_id, reason = %reason, "Caption render failed");
                    return Err(
                        UpstreamError::new(UpstreamErrorKind::CaptionService(reason)).into(),
                    );
                }
                _ => {}
            }

            if Instant::now() + self.poll_interval > deadline {
                return Err(UpstreamError::new(UpstreamErrorKind::CaptionTimeout(
                    self.timeout.as_secs(),
                ))
                .into());
            }
            sleep(self.poll_interval).await;
        }
    }
}

#[async_trait]
impl CaptionService for ZapCapClient {
    #[instrument(skip(self))]
    async fn caption_video(&self, video_url: &str) -> StoryboardResult<CaptionedVideo> {
        let video_id = self.register(video_url).await?;
        let template_id = self.first_template().await?;
        let task_id = self.create_task(&video_id, &template_id).await?;
        debug!(video_id = %video_id, task_id = %task_id, "Caption render started");

        let url = self.wait_for_render(&video_id, &task_id).await?;
        Ok(CaptionedVideo { url })
    }
}
