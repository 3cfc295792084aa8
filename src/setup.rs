use crate::config::{Config, ProviderKind};
use crate::llm::agent::AgentClient;
use crate::llm::ollama::OllamaClient;
use crate::llm::openai::OpenAiClient;
use crate::llm::LlmClient;
use anyhow::{anyhow, Result};
use log::{debug, warn};

/// Build the LLM client based on CLI + config.
///
/// Returns `None` when the provider is disabled or misconfigured; the caller
/// then runs on fallback rules alone. Misconfiguration is only ever a warning.
pub fn build_llm_client(cfg: &Config) -> Option<Box<dyn LlmClient>> {
    if cfg.provider == ProviderKind::Disabled {
        debug!("Model calls disabled; using fallback rules only");
        return None;
    }

    match try_build(cfg) {
        Ok(client) => {
            debug!("Using {} client with model: {}", client.name(), cfg.model);
            Some(client)
        }
        Err(e) => {
            warn!("{e:#}; falling back to built-in summaries");
            None
        }
    }
}

fn try_build(cfg: &Config) -> Result<Box<dyn LlmClient>> {
    let base_url = || {
        cfg.base_url
            .clone()
            .ok_or_else(|| anyhow!("no base URL configured for provider {}", cfg.provider.as_str()))
    };

    let client: Box<dyn LlmClient> = match cfg.provider {
        ProviderKind::OpenAi => {
            let key = cfg.api_key.clone().ok_or_else(|| {
                anyhow!("OPENAI_API_KEY (or --api-key) is not set")
            })?;
            Box::new(OpenAiClient::new(key, cfg.model.clone(), base_url()?, cfg.timeout)?)
        }
        ProviderKind::Ollama => Box::new(OllamaClient::new(base_url()?, cfg.model.clone(), cfg.timeout)?),
        ProviderKind::Agent => Box::new(AgentClient::new(
            &base_url()?,
            cfg.api_key.clone(),
            cfg.model.clone(),
            cfg.timeout,
        )?),
        ProviderKind::Disabled => return Err(anyhow!("provider disabled")),
    };

    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config(provider: ProviderKind, api_key: Option<&str>, base_url: Option<&str>) -> Config {
        Config {
            provider,
            model: "m".into(),
            api_key: api_key.map(str::to_string),
            base_url: base_url.map(str::to_string),
            timeout: Duration::from_secs(1),
        }
    }

    #[test]
    fn missing_openai_key_degrades_to_fallback() {
        let cfg = config(ProviderKind::OpenAi, None, Some("https://api.openai.com/v1"));
        assert!(build_llm_client(&cfg).is_none());
    }

    #[test]
    fn agent_without_url_degrades_to_fallback() {
        let cfg = config(ProviderKind::Agent, Some("k"), None);
        assert!(build_llm_client(&cfg).is_none());
    }

    #[test]
    fn configured_providers_build() {
        let openai = config(ProviderKind::OpenAi, Some("sk"), Some("https://api.openai.com/v1"));
        assert_eq!(build_llm_client(&openai).map(|c| c.name().to_string()).as_deref(), Some("openai"));

        let ollama = config(ProviderKind::Ollama, None, Some("http://localhost:11434"));
        assert_eq!(build_llm_client(&ollama).map(|c| c.name().to_string()).as_deref(), Some("ollama"));

        let disabled = config(ProviderKind::Disabled, Some("sk"), Some("x"));
        assert!(build_llm_client(&disabled).is_none());
    }
}
