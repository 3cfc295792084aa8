//! Commit summaries and Q&A answers that never fail.
//!
//! Every call ends in a fully populated result. Provider errors, empty
//! responses and unparseable JSON all route to the keyword fallback; JSON that
//! parses but has the wrong shape is repaired field by field instead.

pub mod decode;
pub mod fallback;

use crate::commit::{AnswerResult, CommitContext, SummaryResult};
use crate::llm::LlmClient;

pub struct InsightEngine {
    client: Option<Box<dyn LlmClient>>,
}

impl InsightEngine {
    /// `None` puts the engine in fallback-only mode.
    pub fn new(client: Option<Box<dyn LlmClient>>) -> Self {
        Self { client }
    }

    /// True when no provider is configured and every result is a fallback.
    pub fn is_fallback_only(&self) -> bool {
        self.client.is_none()
    }

    pub fn summarize(&self, commit: &CommitContext) -> SummaryResult {
        let Some(client) = self.client.as_deref() else {
            log::debug!("No provider configured; using fallback summary for {}", commit.short_sha());
            return fallback::fallback_summary(commit);
        };

        let run = match client.summarize_commit(commit) {
            Ok(run) => run,
            Err(err) => {
                log::warn!("{} summary call failed: {err:#}", client.name());
                return fallback::fallback_summary(commit);
            }
        };

        let Some(text) = run.response.normalize() else {
            log::warn!("{} returned no usable output; using fallback summary", client.name());
            return fallback::fallback_summary(commit);
        };

        log::trace!("Normalized provider output:\n{text}");

        match decode::extract_json_object(&text) {
            Some(fields) => decode::repair_summary(&fields, &commit.message, run.run_id),
            None => {
                log::warn!("{} returned malformed JSON; using fallback summary", client.name());
                fallback::fallback_summary(commit)
            }
        }
    }

    pub fn answer(&self, question: &str, commits: &[CommitContext]) -> AnswerResult {
        let Some(client) = self.client.as_deref() else {
            log::debug!("No provider configured; using fallback answer");
            return fallback::fallback_answer(question, commits);
        };

        let run = match client.answer_question(question, commits) {
            Ok(run) => run,
            Err(err) => {
                log::warn!("{} question call failed: {err:#}", client.name());
                return fallback::fallback_answer(question, commits);
            }
        };

        match run.response.normalize() {
            Some(text) => AnswerResult {
                answer_text: text.trim().to_string(),
                source_run_id: run.run_id,
            },
            None => {
                log::warn!("{} returned no usable answer; using fallback", client.name());
                fallback::fallback_answer(question, commits)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commit::RiskLevel;
    use crate::llm::prompt_builder::PromptPair;
    use crate::llm::response::ProviderResponse;
    use crate::llm::ProviderRun;
    use anyhow::{anyhow, Result};
    use serde_json::json;

    /// Replays one canned outcome for every call.
    struct Scripted(Option<ProviderResponse>);

    impl LlmClient for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        fn run(&self, _prompts: PromptPair) -> Result<ProviderRun> {
            match &self.0 {
                Some(response) => Ok(ProviderRun {
                    run_id: Some("run-7".into()),
                    response: response.clone(),
                }),
                None => Err(anyhow!("quota exceeded")),
            }
        }
    }

    fn engine(outcome: Option<ProviderResponse>) -> InsightEngine {
        InsightEngine::new(Some(Box::new(Scripted(outcome))))
    }

    fn commit() -> CommitContext {
        CommitContext::new("feedface", "fix the login bug").with_files(["src/auth.rs"])
    }

    #[test]
    fn good_json_is_used_with_run_id() {
        let body = r#"```json
{"simple_explanation": "Login works again.", "technical_summary": ["Checked token expiry"],
 "how_to_test": {"steps": ["Log in"]}, "tags": ["auth"], "risk_level": "high"}
```"#;
        let summary = engine(Some(ProviderResponse::PlainText(body.into()))).summarize(&commit());
        assert_eq!(summary.simple_explanation, "Login works again.");
        assert_eq!(summary.tags, vec!["auth"]);
        assert_eq!(summary.risk_level, RiskLevel::High);
        assert_eq!(summary.source_run_id.as_deref(), Some("run-7"));
    }

    #[test]
    fn partial_json_is_repaired_not_discarded() {
        let body = json!({"final_output": "{\"tags\": [\"auth\"]}"});
        let summary = engine(Some(ProviderResponse::from(body))).summarize(&commit());
        assert_eq!(summary.tags, vec!["auth"]);
        assert_eq!(summary.simple_explanation, "This commit: fix the login bug");
        assert_eq!(summary.source_run_id.as_deref(), Some("run-7"));
    }

    #[test]
    fn blank_output_field_takes_the_defaulting_path() {
        let body = json!({"status": "COMPLETE", "output": ""});
        let summary = engine(Some(ProviderResponse::from(body))).summarize(&commit());
        assert_eq!(summary.simple_explanation, "This commit: fix the login bug");
        assert_eq!(summary.technical_summary, vec!["Code changes", "Updates"]);
        assert_eq!(summary.tags, vec!["update"]);
        assert_eq!(summary.risk_level, RiskLevel::Low);
        assert_eq!(summary.source_run_id.as_deref(), Some("run-7"));

        let summary = engine(Some(ProviderResponse::from(json!({})))).summarize(&commit());
        assert_eq!(summary.tags, vec!["update"]);
        assert_eq!(summary.source_run_id.as_deref(), Some("run-7"));
    }

    #[test]
    fn every_failure_mode_falls_back() {
        let expected = fallback::fallback_summary(&commit());
        let outcomes = [
            None,
            Some(ProviderResponse::Absent),
            Some(ProviderResponse::PlainText("   ".into())),
            Some(ProviderResponse::PlainText("I cannot help with that.".into())),
            Some(ProviderResponse::Candidates(vec![json!("[1,2]")])),
        ];
        for outcome in outcomes {
            let summary = engine(outcome).summarize(&commit());
            assert_eq!(summary, expected);
            assert!(summary.tags.contains(&"bugfix".to_string()));
            assert_eq!(summary.source_run_id, None);
        }
    }

    #[test]
    fn no_provider_means_fallback() {
        let engine = InsightEngine::new(None);
        assert!(engine.is_fallback_only());

        let commit = CommitContext::new("0000000", "Initial commit: project setup");
        let summary = engine.summarize(&commit);
        assert!(summary.simple_explanation.contains("Initial commit: project setup"));
        assert_eq!(summary.tags, vec!["setup", "initial", "foundation"]);
        assert_eq!(summary.risk_level, RiskLevel::Low);
        assert_eq!(summary.source_run_id, None);

        let answer = engine.answer("What happened?", &[commit]);
        assert!(!answer.answer_text.is_empty());
        assert_eq!(answer.source_run_id, None);
    }

    #[test]
    fn answers_are_trimmed_text() {
        let answer = engine(Some(ProviderResponse::PlainText("\n  It was the cache.  \n".into())))
            .answer("Why?", &[commit()]);
        assert_eq!(answer.answer_text, "It was the cache.");
        assert_eq!(answer.source_run_id.as_deref(), Some("run-7"));
    }

    #[test]
    fn failed_answers_fall_back() {
        for outcome in [None, Some(ProviderResponse::Absent)] {
            let answer = engine(outcome).answer("Why?", &[commit()]);
            assert!(answer.answer_text.contains("fix the login bug"));
            assert_eq!(answer.source_run_id, None);
        }
    }
}
