use crate::cli_args::Cli;
use clap::ValueEnum;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// OpenAI or any Chat Completions compatible API
    #[default]
    #[value(name = "openai")]
    OpenAi,
    /// A local Ollama server
    Ollama,
    /// A plan-run style agent service
    Agent,
    /// No provider; fallback rules only
    #[value(name = "none")]
    #[serde(rename = "none")]
    Disabled,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Ollama => "ollama",
            ProviderKind::Agent => "agent",
            ProviderKind::Disabled => "none",
        }
    }

    fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "gpt-4o-mini",
            ProviderKind::Ollama => "llama3.1",
            ProviderKind::Agent => "default",
            ProviderKind::Disabled => "none",
        }
    }

    fn default_base_url(&self) -> Option<&'static str> {
        match self {
            ProviderKind::OpenAi => Some("https://api.openai.com/v1"),
            ProviderKind::Ollama => Some("http://localhost:11434"),
            ProviderKind::Agent | ProviderKind::Disabled => None,
        }
    }
}

/// Final resolved configuration for synapse.
#[derive(Debug, Clone)]
pub struct Config {
    pub provider: ProviderKind,
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout: Duration,
}

/// One source of settings. Every field is optional so sources can be stacked.
#[derive(Debug, Default, Clone, Deserialize)]
struct Layer {
    provider: Option<ProviderKind>,
    model: Option<String>,
    #[serde(alias = "openai_api_key")]
    api_key: Option<String>,
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

impl Config {
    /// Build the final config from CLI flags, environment, TOML file, and defaults.
    ///
    /// Precedence:
    ///   1. CLI flags (`--provider`, `--model`, `--api-key`, ...)
    ///   2. Env vars `SYNAPSE_PROVIDER`, `SYNAPSE_MODEL`, `SYNAPSE_API_KEY`,
    ///      `SYNAPSE_BASE_URL`, `SYNAPSE_TIMEOUT_SECS`
    ///   3. TOML `~/.config/synapse.toml`
    ///   4. Per-provider defaults
    ///
    /// `--no-model` or a model named `none` disables the provider entirely.
    pub fn from_sources(cli: &Cli) -> Self {
        let cli_layer = Layer {
            provider: cli.provider,
            model: cli.model.clone(),
            api_key: cli.api_key.clone(),
            base_url: cli.base_url.clone(),
            timeout_secs: cli.timeout,
        };

        let mut cfg = Self::merge(cli_layer, env_layer(), load_file_config().unwrap_or_default());
        if cli.no_model {
            cfg.provider = ProviderKind::Disabled;
        }
        cfg
    }

    fn merge(cli: Layer, env: Layer, file: Layer) -> Self {
        let mut provider = cli
            .provider
            .or(env.provider)
            .or(file.provider)
            .unwrap_or_default();

        let model = cli
            .model
            .or(env.model)
            .or(file.model)
            .unwrap_or_else(|| provider.default_model().to_string());

        if model.eq_ignore_ascii_case("none") {
            provider = ProviderKind::Disabled;
        }

        let api_key = cli
            .api_key
            .or(env.api_key)
            .or(file.api_key)
            .filter(|key| !key.trim().is_empty());

        let base_url = cli
            .base_url
            .or(env.base_url)
            .or(file.base_url)
            .or_else(|| provider.default_base_url().map(str::to_string));

        let timeout_secs = cli
            .timeout_secs
            .or(env.timeout_secs)
            .or(file.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Config {
            provider,
            model,
            api_key,
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

fn env_layer() -> Layer {
    let provider = env::var("SYNAPSE_PROVIDER").ok().and_then(|raw| {
        let parsed = ProviderKind::from_str(&raw, true).ok();
        if parsed.is_none() {
            log::warn!("Ignoring unknown SYNAPSE_PROVIDER value {raw:?}");
        }
        parsed
    });

    let timeout_secs = env::var("SYNAPSE_TIMEOUT_SECS").ok().and_then(|raw| {
        let parsed = raw.trim().parse().ok();
        if parsed.is_none() {
            log::warn!("Ignoring invalid SYNAPSE_TIMEOUT_SECS value {raw:?}");
        }
        parsed
    });

    Layer {
        provider,
        model: env::var("SYNAPSE_MODEL").ok(),
        api_key: env::var("SYNAPSE_API_KEY").ok(),
        base_url: env::var("SYNAPSE_BASE_URL").ok(),
        timeout_secs,
    }
}

/// Return `~/.config/synapse.toml`
fn config_path() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    Some(home.join(".config").join("synapse.toml"))
}

fn load_file_config() -> Option<Layer> {
    let path = config_path()?;
    if !path.exists() {
        return None;
    }

    let data = fs::read_to_string(&path).ok()?;
    match toml::from_str::<Layer>(&data) {
        Ok(layer) => Some(layer),
        Err(e) => {
            log::warn!("Ignoring unreadable config file {}: {e}", path.display());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let cfg = Config::merge(Layer::default(), Layer::default(), Layer::default());
        assert_eq!(cfg.provider, ProviderKind::OpenAi);
        assert_eq!(cfg.model, "gpt-4o-mini");
        assert_eq!(cfg.api_key, None);
        assert_eq!(cfg.base_url.as_deref(), Some("https://api.openai.com/v1"));
        assert_eq!(cfg.timeout, Duration::from_secs(90));
    }

    #[test]
    fn cli_beats_env_beats_file() {
        let cli = Layer {
            model: Some("from-cli".into()),
            ..Layer::default()
        };
        let env = Layer {
            model: Some("from-env".into()),
            api_key: Some("env-key".into()),
            ..Layer::default()
        };
        let file = Layer {
            provider: Some(ProviderKind::Ollama),
            api_key: Some("file-key".into()),
            timeout_secs: Some(5),
            ..Layer::default()
        };
        let cfg = Config::merge(cli, env, file);
        assert_eq!(cfg.provider, ProviderKind::Ollama);
        assert_eq!(cfg.model, "from-cli");
        assert_eq!(cfg.api_key.as_deref(), Some("env-key"));
        assert_eq!(cfg.base_url.as_deref(), Some("http://localhost:11434"));
        assert_eq!(cfg.timeout, Duration::from_secs(5));
    }

    #[test]
    fn model_none_disables_the_provider() {
        let cli = Layer {
            model: Some("NONE".into()),
            ..Layer::default()
        };
        let cfg = Config::merge(cli, Layer::default(), Layer::default());
        assert_eq!(cfg.provider, ProviderKind::Disabled);
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let env = Layer {
            api_key: Some("   ".into()),
            ..Layer::default()
        };
        let cfg = Config::merge(Layer::default(), env, Layer::default());
        assert_eq!(cfg.api_key, None);
    }

    #[test]
    fn file_layer_parses_from_toml() {
        let layer: Layer = toml::from_str(
            r#"
                provider = "agent"
                model = "planner"
                openai_api_key = "sk-test"
                base_url = "http://agents.internal"
                timeout_secs = 30
            "#,
        )
        .unwrap();
        assert_eq!(layer.provider, Some(ProviderKind::Agent));
        assert_eq!(layer.api_key.as_deref(), Some("sk-test"));
        assert_eq!(layer.timeout_secs, Some(30));
    }
}
