//! Client for agent/plan-run style orchestration services.
//!
//! These services take a free-form query, run it through a plan of steps and
//! return a run record whose shape depends on the service and its version:
//! sometimes a `final_output`, sometimes only `steps`, sometimes a bare string.
//! The body is therefore kept as raw JSON and classified by [`ProviderResponse`].

use super::prompt_builder::PromptPair;
use super::response::ProviderResponse;
use super::{LlmClient, ProviderRun};
use anyhow::{anyhow, Context, Result};
use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

#[derive(Serialize)]
struct RunRequest<'a> {
    model: &'a str,
    query: String,
}

pub struct AgentClient {
    client: Client,
    api_key: Option<String>,
    model: String,
    runs_url: String,
}

impl AgentClient {
    pub fn new(base_url: &str, api_key: Option<String>, model: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(AgentClient {
            client,
            api_key,
            model,
            runs_url: format!("{}/runs", base_url.trim_end_matches('/')),
        })
    }
}

impl LlmClient for AgentClient {
    fn name(&self) -> &str {
        "agent"
    }

    fn run(&self, prompts: PromptPair) -> Result<ProviderRun> {
        let req = RunRequest {
            model: &self.model,
            query: format!("{}\n\n{}", prompts.system, prompts.user),
        };

        log::info!("Starting agent run at {}", self.runs_url);

        let mut builder = self.client.post(&self.runs_url).json(&req);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let resp = builder
            .send()
            .with_context(|| format!("failed to send request to {}", self.runs_url))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().unwrap_or_default();
            return Err(anyhow!("Agent API error: HTTP {} - {}", status.as_u16(), text));
        }

        let body = resp.text().context("failed to read agent response body")?;
        log::trace!("Agent raw response: {body}");

        Ok(parse_run(&body))
    }
}

/// Classify a run record. A body that is not JSON at all is kept as text.
fn parse_run(body: &str) -> ProviderRun {
    let value = match serde_json::from_str::<Value>(body) {
        Ok(value) => value,
        Err(_) => return ProviderRun {
            run_id: None,
            response: ProviderResponse::PlainText(body.to_string()),
        },
    };

    let run_id = ["id", "plan_run_id", "run_id"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::to_string);

    // Some services nest everything under `outputs`.
    let response = match value {
        Value::Object(mut fields) if fields.get("outputs").is_some_and(Value::is_object) => {
            ProviderResponse::from(fields.remove("outputs").unwrap_or(Value::Null))
        }
        other => ProviderResponse::from(other),
    };

    ProviderRun { run_id, response }
}
