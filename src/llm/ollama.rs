use anyhow::{anyhow, Result};
use musli::json;
use musli::{Decode, Encode};
use reqwest::blocking::Client;
use std::time::Duration;

use super::prompt_builder::PromptPair;
use super::response::ProviderResponse;
use super::{LlmClient, ProviderRun};

#[derive(Debug, Encode, Decode)]
struct OllamaMessage {
    role: String,
    content: String,
}

#[derive(Debug, Decode)]
struct OllamaChatResponse {
    message: Option<OllamaMessage>,
}

/// Synchronous Ollama client using /api/chat.
pub struct OllamaClient {
    http: Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow!("failed to build HTTP client: {e}"))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    /// Internal helper to talk to /api/chat.
    fn chat(&self, system_prompt: String, user_prompt: String) -> Result<String> {
        // Request structs we encode with musli::json.
        #[derive(Debug, Encode)]
        struct ChatRequest {
            model: String,
            stream: bool,
            messages: Vec<OllamaMessage>,
        }

        let req_body = ChatRequest {
            model: self.model.clone(),
            stream: false,
            messages: vec![
                OllamaMessage {
                    role: "system".to_string(),
                    content: system_prompt,
                },
                OllamaMessage {
                    role: "user".to_string(),
                    content: user_prompt,
                },
            ],
        };

        let body_str = json::to_string(&req_body)
            .map_err(|e| anyhow!("Failed to encode Ollama JSON request: {e}"))?;

        log::trace!("Ollama request body: {body_str}");

        let url = format!("{}/api/chat", self.base_url);

        let resp = self
            .http
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body_str)
            .send()
            .map_err(|e| anyhow!("Error calling Ollama at {url}: {e}"))?
            .error_for_status()
            .map_err(|e| anyhow!("Ollama HTTP error from {url}: {e}"))?;

        let resp_text = resp
            .text()
            .map_err(|e| anyhow!("Failed to read Ollama response body: {e}"))?;

        log::trace!("Ollama raw JSON response: {resp_text}");

        Ok(resp_text)
    }
}

fn parse_chat_response(body: &str) -> Result<ProviderResponse> {
    let parsed: OllamaChatResponse =
        json::from_str(body).map_err(|e| anyhow!("Failed to decode Ollama JSON: {e}"))?;

    Ok(match parsed.message {
        Some(message) => ProviderResponse::PlainText(message.content),
        None => ProviderResponse::Absent,
    })
}

impl LlmClient for OllamaClient {
    fn name(&self) -> &str {
        "ollama"
    }

    fn run(&self, prompts: PromptPair) -> Result<ProviderRun> {
        let body = self.chat(prompts.system, prompts.user)?;
        Ok(ProviderRun {
            // Ollama does not hand out run identifiers.
            run_id: None,
            response: parse_chat_response(&body)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_content_becomes_plain_text() {
        let body = r#"{"message":{"role":"assistant","content":"All good."}}"#;
        let response = parse_chat_response(body).unwrap();
        assert_eq!(response, ProviderResponse::PlainText("All good.".into()));
    }

    #[test]
    fn garbage_body_is_an_error() {
        assert!(parse_chat_response("not json").is_err());
    }
}
