pub mod agent;
pub mod ollama;
pub mod openai;
pub mod prompt_builder;
mod prompts;
pub mod response;

use crate::commit::CommitContext;
use anyhow::Result;
use prompt_builder::PromptPair;
use response::ProviderResponse;

/// What a single provider call hands back: the raw body plus whatever run
/// identifier the provider attached to it.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRun {
    pub run_id: Option<String>,
    pub response: ProviderResponse,
}

/// Trait for talking to a text-generation provider.
pub trait LlmClient: Send + Sync {
    /// Human-readable backend name for logs.
    fn name(&self) -> &str;

    /// Send one prompt pair and return the untouched response.
    fn run(&self, prompts: PromptPair) -> Result<ProviderRun>;

    /// Ask for a JSON summary of a single commit.
    fn summarize_commit(&self, commit: &CommitContext) -> Result<ProviderRun> {
        let prompts = prompt_builder::summary_prompt(commit);

        log::debug!(
            "Summary prompt for {} via {}:\n{}",
            commit.short_sha(),
            self.name(),
            truncate(&prompts.user, 2000)
        );

        self.run(prompts)
    }

    /// Ask a free-text question about a handful of commits.
    fn answer_question(&self, question: &str, commits: &[CommitContext]) -> Result<ProviderRun> {
        let prompts = prompt_builder::question_prompt(question, commits);

        log::debug!(
            "Question prompt via {}:\n{}",
            self.name(),
            truncate(&prompts.user, 3000)
        );

        self.run(prompts)
    }
}

/// Truncate long strings for debug logging.
pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    let total = s.chars().count();
    if total <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len).collect();
        format!("{}...\n[truncated {} chars]", head, total - max_len)
    }
}
