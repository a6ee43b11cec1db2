//! Text-generation service client.
//!
//! [`Generator`] is the seam the validator, enricher and pipeline depend on;
//! [`GeminiClient`] implements it against Google AI Studio's REST API. Retry
//! lives here and nowhere else.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use bleacher_shared::{AppConfig, BleacherError, GeneratorConfig, Result};

/// User-Agent for generation requests.
const USER_AGENT: &str = concat!("Bleacher/", env!("CARGO_PKG_VERSION"));

/// Timeout for a single generation request.
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Anything that can turn an instruction plus raw content into text.
pub trait Generator: Send + Sync + 'static {
    /// Generate text for `prompt` applied to `content`.
    fn generate(&self, prompt: &str, content: &str)
    -> impl Future<Output = Result<String>> + Send;
}

/// Join an instruction and its raw content into a single user turn.
///
/// Gemma models on AI Studio have no separate system role.
pub fn compose_turn(prompt: &str, content: &str) -> String {
    format!("{prompt}\n\n---\n\nHere is the raw data to work with:\n\n{content}")
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate.
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        Some(content.parts.into_iter().map(|p| p.text).collect())
    }
}

// ---------------------------------------------------------------------------
// GeminiClient
// ---------------------------------------------------------------------------

/// Google AI Studio `generateContent` client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    config: GeneratorConfig,
}

impl GeminiClient {
    /// Build a client from explicit settings and key.
    pub fn new(config: GeneratorConfig, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| BleacherError::Network(format!("failed to build HTTP client: {e}")))?;

        info!(model = %config.model, "generation client initialised");

        Ok(Self {
            client,
            api_key: api_key.into(),
            config,
        })
    }

    /// Build a client from the app config, reading the key from its env var.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let api_key = config.validate_api_key()?;
        Self::new(config.generator.clone(), api_key)
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// One request, no retry.
    async fn attempt(&self, turn: &str) -> Result<String> {
        let body = GenerateRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: turn }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| BleacherError::Generation(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(BleacherError::Generation(format!(
                "HTTP {status}: {}",
                detail.chars().take(200).collect::<String>()
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| BleacherError::Generation(format!("invalid response body: {e}")))?;

        parsed
            .into_text()
            .map(|text| text.trim().to_string())
            .ok_or_else(|| BleacherError::Generation("response had no candidates".into()))
    }
}

impl Generator for GeminiClient {
    #[instrument(skip_all, fields(model = %self.config.model))]
    async fn generate(&self, prompt: &str, content: &str) -> Result<String> {
        let turn = compose_turn(prompt, content);
        let attempts = self.config.max_retries.max(1);

        let mut attempt = 1;
        loop {
            info!(attempt, attempts, "generation call");
            match self.attempt(&turn).await {
                Ok(text) => return Ok(text),
                Err(e) if attempt < attempts => {
                    warn!(attempt, error = %e, "generation attempt failed");
                    let delay = self.config.retry_delay_secs * u64::from(attempt);
                    tokio::time::sleep(Duration::from_secs(delay)).await;
                    attempt += 1;
                }
                Err(e) => {
                    warn!(attempts, error = %e, "all generation attempts exhausted");
                    return Err(e);
                }
            }
        }
    }
}
