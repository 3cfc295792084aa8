use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Everything we know about a single commit when asking for a summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommitContext {
    #[serde(default)]
    pub sha: String,
    pub message: String,
    #[serde(default, alias = "files")]
    pub files_changed: Vec<String>,
    #[serde(default, alias = "diff")]
    pub diff_excerpt: String,
    #[serde(default, alias = "summary")]
    pub prior_summary: Option<String>,
}

impl CommitContext {
    pub fn new(sha: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            sha: sha.into(),
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files_changed = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_diff(mut self, diff: impl Into<String>) -> Self {
        self.diff_excerpt = diff.into();
        self
    }

    /// Seven-character abbreviation, the way `git log --oneline` shows it.
    pub fn short_sha(&self) -> String {
        self.sha.chars().take(7).collect()
    }

    /// First line of the commit message.
    pub fn title(&self) -> &str {
        self.message.lines().next().unwrap_or("").trim()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Exact, case-sensitive match against the wire names.
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "low" => Some(RiskLevel::Low),
            "medium" => Some(RiskLevel::Medium),
            "high" => Some(RiskLevel::High),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HowToTest {
    pub steps: Vec<String>,
    #[serde(rename = "curl")]
    pub curl_example: Option<String>,
    #[serde(rename = "postman")]
    pub postman_example: Option<Value>,
}

/// A fully populated commit summary. Every field is always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub simple_explanation: String,
    pub technical_summary: Vec<String>,
    pub how_to_test: HowToTest,
    pub tags: Vec<String>,
    pub risk_level: RiskLevel,
    #[serde(rename = "plan_run_id")]
    pub source_run_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerResult {
    #[serde(rename = "answer")]
    pub answer_text: String,
    #[serde(rename = "plan_run_id")]
    pub source_run_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_level_is_case_sensitive() {
        assert_eq!(RiskLevel::from_wire("high"), Some(RiskLevel::High));
        assert_eq!(RiskLevel::from_wire("High"), None);
        assert_eq!(RiskLevel::from_wire("critical"), None);
    }

    #[test]
    fn commit_context_accepts_short_field_names() {
        let json = r#"{"sha":"abc123456","message":"Fix login\n\nbody","files":["a.rs"]}"#;
        let ctx: CommitContext = serde_json::from_str(json).unwrap();
        assert_eq!(ctx.files_changed, vec!["a.rs".to_string()]);
        assert_eq!(ctx.diff_excerpt, "");
        assert_eq!(ctx.short_sha(), "abc1234");
        assert_eq!(ctx.title(), "Fix login");
    }

    #[test]
    fn summary_uses_wire_names() {
        let summary = SummaryResult {
            simple_explanation: "x".into(),
            technical_summary: vec![],
            how_to_test: HowToTest {
                steps: vec!["run it".into()],
                curl_example: None,
                postman_example: None,
            },
            tags: vec!["update".into()],
            risk_level: RiskLevel::Medium,
            source_run_id: Some("run-1".into()),
        };
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["risk_level"], "medium");
        assert_eq!(value["plan_run_id"], "run-1");
        assert!(value["how_to_test"]["curl"].is_null());
    }
}
