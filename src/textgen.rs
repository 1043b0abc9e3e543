use std::{sync::Arc, time::Duration};

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::TextGenConfig;

/// External text generation: prompt in, text out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: &str, model: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("build http client")?;
        Ok(Self {
            http,
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    /// `None` when no API key is configured.
    pub fn from_config(cfg: &TextGenConfig) -> anyhow::Result<Option<Arc<dyn TextGenerator>>> {
        let Some(key) = cfg.api_key.as_deref() else {
            info!("GEMINI_API_KEY not set; text generation disabled");
            return Ok(None);
        };
        let client = Self::new(key, &cfg.model, Duration::from_secs(cfg.timeout_secs))?;
        Ok(Some(Arc::new(client) as Arc<dyn TextGenerator>))
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
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
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .find_map(|p| p.text)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        let url = format!("{GEMINI_BASE_URL}/{}:generateContent", self.model);
        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
        };

        let resp = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .context("gemini request")?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            anyhow::bail!("gemini returned {status}: {detail}");
        }

        let parsed: GenerateResponse = resp.json().await.context("decode gemini response")?;
        let text = parsed
            .first_text()
            .context("gemini response contained no text")?;
        debug!(model = %self.model, chars = text.len(), "text generated");
        Ok(text)
    }
}
