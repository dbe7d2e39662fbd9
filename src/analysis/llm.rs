use crate::config::LlmConfig;
use crate::error::AnalysisError;
use serde::Deserialize;
use serde_json::json;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

const MAX_RETRIES: u32 = 3;

/// LLM invoker: one prompt, one model, bounded retries with exponential
/// backoff. Retries blindly on any transport/provider error; content-level
/// refusals are a parser concern, not detected here.
pub struct LlmClient {
    config: LlmConfig,
    /// Raw responses are dumped here for operator debugging.
    debug_dir: PathBuf,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl LlmClient {
    pub fn new(config: LlmConfig, debug_dir: PathBuf) -> Self {
        Self {
            config,
            debug_dir,
            client: reqwest::Client::new(),
        }
    }

    /// Send the prompt, returning the model's raw text with reasoning-trace
    /// markers stripped. Exhausting the retry budget surfaces the last
    /// transport error as `LlmUnavailable`.
    pub async fn invoke(&self, prompt: &str, model: &str) -> Result<String, AnalysisError> {
        let mut last_error = String::new();

        for attempt in 0..MAX_RETRIES {
            match self.call_once(prompt, model).await {
                Ok(content) => {
                    let content = strip_think_tags(&content);
                    self.dump_debug(&content).await;
                    return Ok(content);
                }
                Err(e) => {
                    let delay = Duration::from_secs(1 << attempt);
                    warn!(
                        "LLM attempt {}/{} failed, retrying in {:?}: {}",
                        attempt + 1,
                        MAX_RETRIES,
                        delay,
                        e
                    );
                    last_error = e;

                    if attempt + 1 < MAX_RETRIES {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        Err(AnalysisError::LlmUnavailable {
            attempts: MAX_RETRIES,
            message: last_error,
        })
    }

    async fn call_once(&self, prompt: &str, model: &str) -> Result<String, String> {
        let api_key = std::env::var(&self.config.api_key_env)
            .map_err(|_| format!("missing API key env var {}", self.config.api_key_env))?;

        // OpenAI models honor response_format to force valid JSON output.
        let use_json_format = model.starts_with("openai/");

        let mut messages = Vec::new();
        if use_json_format {
            messages.push(json!({
                "role": "system",
                "content": "Respond with valid JSON only. Analyze the video transcript as instructed."
            }));
        }
        messages.push(json!({"role": "user", "content": prompt}));

        let mut body = json!({
            "model": model,
            "messages": messages,
            "temperature": 0.7,
            "max_tokens": 16384,
        });
        if use_json_format {
            body["response_format"] = json!({"type": "json_object"});
        }

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(api_key)
            .header("HTTP-Referer", &self.config.referer)
            .header("X-Title", &self.config.title)
            .json(&body)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(format!("LLM API returned {status}: {text}"));
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| e.to_string())?;
        let choice = parsed.choices.into_iter().next();
        let finish_reason = choice
            .as_ref()
            .and_then(|c| c.finish_reason.clone())
            .unwrap_or_default();
        let content = choice.and_then(|c| c.message.content).unwrap_or_default();

        info!(
            "LLM response: finish_reason={}, length={}",
            finish_reason,
            content.len()
        );

        Ok(content)
    }

    async fn dump_debug(&self, content: &str) {
        let path = self.debug_dir.join(format!(
            "_debug_response_{}.txt",
            chrono::Utc::now().timestamp_millis()
        ));
        match tokio::fs::write(&path, content).await {
            Ok(()) => info!("Full LLM response saved to {}", path.display()),
            Err(e) => warn!("Failed to save debug response: {}", e),
        }
    }
}

/// Remove `<think>...</think>` spans some models emit before their answer.
/// Unclosed trailing markers are left alone, matching the closed-pair-only
/// behavior downstream tolerates.
fn strip_think_tags(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(open) = rest.find("<think>") {
        out.push_str(&rest[..open]);
        match rest[open..].find("</think>") {
            Some(close) => rest = &rest[open + close + "</think>".len()..],
            None => {
                out.push_str(&rest[open..]);
                rest = "";
                break;
            }
        }
    }
    out.push_str(rest);
    out.trim().to_string()
}
