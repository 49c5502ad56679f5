//! Narrative outlines from an OpenAI-compatible chat completions API.

use crate::http::{Failure, api_key, read_json, transport};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use storyboard_config::NarrativeSettings;
use storyboard_error::{StoryboardResult, UpstreamError, UpstreamErrorKind};
use storyboard_interface::{NarrativeOutline, NarrativeService};
use tracing::{debug, instrument};

const SERVICE: &str = "openai";
const FAILURE: Failure = UpstreamErrorKind::Narrative;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Shape the model is asked to answer with.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OutlineReply {
    #[serde(default)]
    narrative: String,
    #[serde(default)]
    image_prompts: Vec<String>,
    dialogues: Option<Vec<String>>,
}

fn system_prompt(scene_count: usize) -> String {
    format!(
        "You are a creative storyteller. Given a prompt, create a {n}-scene narrative with \
         detailed visual descriptions and one short line of narration for each scene.\n\
         Format the response as JSON with the following structure:\n\
         {{\"narrative\": \"Overall story narrative\", \
         \"imagePrompts\": [{n} scene visual descriptions], \
         \"dialogues\": [{n} narration lines]}}\n\
         Make each scene description vivid and focused on visual elements that work well \
         for image generation, flowing naturally from one scene to the next. \
         Keep each description under 200 words and each narration line under 25 words.",
        n = scene_count
    )
}

/// Chat-completions narrative client.
#[derive(Debug, Clone)]
pub struct OpenAiNarrativeClient {
    client: Client,
    api_key: String,
    settings: NarrativeSettings,
}

impl OpenAiNarrativeClient {
    /// Create a client using `OPENAI_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the key is not set.
    #[instrument(skip_all)]
    pub fn new(settings: &NarrativeSettings) -> StoryboardResult<Self> {
        Ok(Self::with_api_key(api_key("OPENAI_API_KEY")?, settings.clone()))
    }

    /// Create a client with an explicit key.
    pub fn with_api_key(api_key: impl Into<String>, settings: NarrativeSettings) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            settings,
        }
    }

    /// Point the client at another API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.settings.base_url = base_url.into();
        self
    }

    fn outline_from(
        &self,
        reply: OutlineReply,
        scene_count: usize,
    ) -> StoryboardResult<NarrativeOutline> {
        let invalid = |message: String| -> storyboard_error::StoryboardError {
            UpstreamError::new(FAILURE(message)).into()
        };

        if reply.narrative.trim().is_empty() {
            return Err(invalid("response has no narrative".to_string()));
        }
        if reply.image_prompts.len() != scene_count {
            return Err(invalid(format!(
                "expected {} image prompts, got {}",
                scene_count,
                reply.image_prompts.len()
            )));
        }
        let dialogues = match reply.dialogues {
            Some(lines) if lines.len() == scene_count => lines,
            Some(lines) => {
                return Err(invalid(format!(
                    "expected {} dialogues, got {}",
                    scene_count,
                    lines.len()
                )));
            }
            None => vec![String::new(); scene_count],
        };

        let image_prompts = reply
            .image_prompts
            .into_iter()
            .map(|prompt| format!("{}{}", prompt.trim(), self.settings.style_suffix))
            .collect();

        Ok(NarrativeOutline {
            narrative: reply.narrative,
            dialogues,
            image_prompts,
        })
    }
}

#[async_trait]
impl NarrativeService for OpenAiNarrativeClient {
    #[instrument(skip(self), fields(model = %self.settings.model))]
    async fn generate_narrative(
        &self,
        prompt: &str,
        scene_count: usize,
    ) -> StoryboardResult<NarrativeOutline> {
        let request = ChatRequest {
            model: &self.settings.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt(scene_count),
                },
                ChatMessage {
                    role: "user",
                    content: prompt.to_string(),
                },
            ],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let url = format!("{}/chat/completions", self.settings.base_url.trim_end_matches('/'));
        debug!(url = %url, "Sending narrative request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport(SERVICE, FAILURE, e))?;

        let chat: ChatResponse = read_json(SERVICE, FAILURE, response).await?;
        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                UpstreamError::new(FAILURE(format!(
                    "malformed response from {}: no message content",
                    SERVICE
                )))
            })?;

        let reply: OutlineReply = serde_json::from_str(&content).map_err(|e| {
            UpstreamError::new(FAILURE(format!(
                "malformed response from {}: outline is not valid JSON: {}",
                SERVICE, e
            )))
        })?;

        let outline = self.outline_from(reply, scene_count)?;
        debug!(scenes = outline.image_prompts.len(), "Narrative generated");
        Ok(outline)
    }
}
