//! reqwest-based [`ModelService`] for the OpenAI REST API.

use std::time::{Duration, Instant};

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use novainfor_shared::{ConversationMessage, NovaError, OpenAiConfig, Result};

use crate::ModelService;

/// User-Agent string for model service requests.
const USER_AGENT: &str = concat!("Nova-Infor/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ConversationMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

#[derive(Debug, Serialize)]
struct ModerationRequest<'a> {
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct ModerationResponse {
    #[serde(default)]
    results: Vec<ModerationResult>,
}

#[derive(Debug, Deserialize)]
struct ModerationResult {
    flagged: bool,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Connection and sampling settings for [`OpenAiClient`].
#[derive(Clone)]
pub struct ClientSettings {
    /// API root, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// `None` leaves the transport default in place.
    pub timeout: Option<Duration>,
}

impl std::fmt::Debug for ClientSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ClientSettings {
    /// Build settings from the `[openai]` config section and a resolved key.
    pub fn from_config(config: &OpenAiConfig, api_key: impl Into<String>) -> Self {
        Self {
            base_url: config.base_url.clone(),
            api_key: api_key.into(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout: config.timeout_secs.map(Duration::from_secs),
        }
    }
}

/// HTTP client for an OpenAI-compatible API.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    settings: ClientSettings,
}

impl OpenAiClient {
    pub fn new(settings: ClientSettings) -> Result<Self> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| NovaError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, settings })
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.settings.base_url.trim_end_matches('/'))
    }

    /// POST a JSON body and decode the JSON reply.
    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: for<'de> Deserialize<'de>,
    {
        let url = self.endpoint(path);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.settings.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| NovaError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| NovaError::Network(format!("{url}: failed to read body: {e}")))?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|body| body.error.message)
                .unwrap_or_else(|_| text.chars().take(200).collect());
            return Err(NovaError::Api(format!("{url}: HTTP {status}: {detail}")));
        }

        serde_json::from_str(&text)
            .map_err(|e| NovaError::Api(format!("{url}: invalid response body: {e}")))
    }
}

impl ModelService for OpenAiClient {
    #[instrument(skip_all, fields(model = %self.settings.model, messages = messages.len()))]
    async fn complete(&self, messages: &[ConversationMessage]) -> Result<String> {
        let start = Instant::now();
        let request = ChatRequest {
            model: &self.settings.model,
            messages,
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };

        let response: ChatResponse = self.post_json("chat/completions", &request).await?;

        if let Some(usage) = &response.usage {
            debug!(
                tokens_in = usage.prompt_tokens,
                tokens_out = usage.completion_tokens,
                latency_ms = start.elapsed().as_millis() as u64,
                "chat completion finished"
            );
        }

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| NovaError::Api("chat completion returned no content".into()))
    }

    #[instrument(skip_all)]
    async fn is_flagged(&self, text: &str) -> Result<bool> {
        let response: ModerationResponse = self
            .post_json("moderations", &ModerationRequest { input: text })
            .await?;

        if response.results.is_empty() {
            return Err(NovaError::Api("moderation returned no results".into()));
        }

        let flagged = response.results.iter().any(|r| r.flagged);
        debug!(flagged, "moderation check finished");
        Ok(flagged)
    }
}
