// src/genai.rs
//! Text-generation adapter: a provider trait over the OpenAI Chat Completions
//! API plus a scripted mock for tests. The pipeline only ever sees
//! [`TextGenerator`]; which provider sits behind it is a wiring concern.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::GenAiConfig;

const OPENAI_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// One operation: send a prompt, get the raw reply text back.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
    /// Provider name for diagnostics.
    fn provider_name(&self) -> &'static str;
}

/// Convenient alias used by callers.
pub type DynTextGenerator = Arc<dyn TextGenerator>;

/// Factory: build a generator from config and environment.
///
/// `GENAI_TEST_MODE=mock` yields a deterministic mock so local runs and smoke
/// tests never hit the network.
pub fn build_generator(cfg: &GenAiConfig) -> DynTextGenerator {
    if std::env::var("GENAI_TEST_MODE")
        .map(|v| v == "mock")
        .unwrap_or(false)
    {
        return Arc::new(MockGenerator::repeating("mock reply"));
    }
    Arc::new(OpenAiGenerator::new(&cfg.api_key, &cfg.model))
}

/// OpenAI provider (Chat Completions API).
pub struct OpenAiGenerator {
    http: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl OpenAiGenerator {
    pub fn new(api_key: &str, model: &str) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("trendscout/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(60))
            .build()
            .expect("reqwest client");
        Self {
            http,
            api_key: api_key.to_string(),
            model: model.to_string(),
            endpoint: OPENAI_ENDPOINT.to_string(),
        }
    }

    /// Point the client at a different endpoint (local proxies, test servers).
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn complete(&self, prompt: &str) -> Result<String> {
        if self.api_key.is_empty() {
            bail!("OpenAI API key is empty");
        }

        let req = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await
            .context("openai: request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            bail!(
                "openai: HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            );
        }

        let body: ChatResponse = resp.json().await.context("openai: malformed response")?;
        let content = body
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .context("openai: response contained no choices")?;
        Ok(content)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}

/// Scripted mock for tests and offline runs. Replies are consumed in order;
/// a repeating fallback can keep answering once the script runs out.
pub struct MockGenerator {
    script: Mutex<VecDeque<String>>,
    fallback: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl MockGenerator {
    pub fn scripted<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            script: Mutex::new(replies.into_iter().map(Into::into).collect()),
            fallback: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn repeating(reply: &str) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Some(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("poisoned prompts").clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().expect("poisoned prompts").len()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts
            .lock()
            .expect("poisoned prompts")
            .push(prompt.to_string());
        if let Some(reply) = self.script.lock().expect("poisoned script").pop_front() {
            return Ok(reply);
        }
        match &self.fallback {
            Some(reply) => Ok(reply.clone()),
            None => bail!("mock generator script exhausted"),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}
