use crate::commit::{AnswerResult, CommitContext, HowToTest, RiskLevel, SummaryResult};
use crate::insight::decode::EXPLANATION_MESSAGE_CHARS;
use crate::llm::prompt_builder::clip;

/// A canned summary chosen by keywords found in the commit message.
struct FallbackRule {
    keywords: &'static [&'static str],
    explanation: &'static str,
    technical_summary: [&'static str; 4],
    steps: &'static [&'static str],
    tags: &'static [&'static str],
    risk_level: RiskLevel,
}

/// Evaluated top to bottom against the lowercased message; first match wins.
const RULES: [FallbackRule; 4] = [
    FallbackRule {
        keywords: &["initial", "first", "setup"],
        explanation: "This is the initial commit that sets up the project foundation. \
                      It creates the basic structure and files needed to get started.",
        technical_summary: [
            "Created project scaffolding and directory structure",
            "Added initial configuration files",
            "Set up basic project dependencies",
            "Established coding standards and conventions",
        ],
        steps: &[
            "Clone the repository to your local machine",
            "Check that all initial files are present",
            "Verify project structure is correct",
        ],
        tags: &["setup", "initial", "foundation"],
        risk_level: RiskLevel::Low,
    },
    FallbackRule {
        keywords: &["fix", "bug", "error", "issue"],
        explanation: "This commit fixes a bug or issue in the codebase. \
                      The changes resolve problems that were affecting functionality.",
        technical_summary: [
            "Identified and resolved critical issues",
            "Improved error handling and validation",
            "Enhanced application stability",
            "Fixed edge cases and corner scenarios",
        ],
        steps: &[
            "Reproduce the original issue",
            "Verify the fix resolves the problem",
            "Test related functionality",
            "Run regression tests",
        ],
        tags: &["bugfix", "stability", "improvement"],
        risk_level: RiskLevel::Low,
    },
    FallbackRule {
        keywords: &["add", "feature", "implement"],
        explanation: "This commit adds new features or functionality to the project. \
                      The changes enhance the application's capabilities and user experience.",
        technical_summary: [
            "Implemented new features and capabilities",
            "Enhanced existing functionality",
            "Improved code organization and structure",
            "Updated documentation and comments",
        ],
        steps: &[
            "Pull the latest changes",
            "Test the new functionality",
            "Verify integration with existing features",
            "Check for any breaking changes",
        ],
        tags: &["feature", "enhancement", "development"],
        risk_level: RiskLevel::Medium,
    },
    FallbackRule {
        keywords: &["update", "upgrade", "refactor"],
        explanation: "This commit updates or refactors existing code to improve performance, \
                      maintainability, or structure without changing functionality.",
        technical_summary: [
            "Refactored code for better maintainability",
            "Updated dependencies and libraries",
            "Improved code structure and organization",
            "Enhanced performance and efficiency",
        ],
        steps: &[
            "Test existing functionality still works",
            "Check for performance improvements",
            "Verify no breaking changes",
            "Run full test suite",
        ],
        tags: &["refactor", "update", "maintenance"],
        risk_level: RiskLevel::Medium,
    },
];

const GENERIC_STEPS: [&str; 4] = [
    "Pull the latest changes from the repository",
    "Install any new dependencies if needed",
    "Run the application and test affected features",
    "Verify everything works as expected",
];

/// Deterministic summary built from the commit message alone. No I/O.
pub fn fallback_summary(commit: &CommitContext) -> SummaryResult {
    let lowered = commit.message.to_lowercase();
    let file_count = commit.files_changed.len();

    let rule = RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|kw| lowered.contains(*kw)));

    let (narrative, technical_summary, steps, tags, risk_level) = match rule {
        Some(rule) => (
            rule.explanation.to_string(),
            to_strings(&rule.technical_summary),
            to_strings(rule.steps),
            to_strings(rule.tags),
            rule.risk_level,
        ),
        None => (
            format!(
                "This commit makes improvements to the codebase. The changes involve {file_count} \
                 files and focus on enhancing the application's functionality."
            ),
            vec![
                format!("Modified {file_count} files in the codebase"),
                "Implemented code improvements".to_string(),
                "Updated existing functionality".to_string(),
                "Maintained code quality standards".to_string(),
            ],
            to_strings(&GENERIC_STEPS),
            to_strings(&["update", "development"]),
            RiskLevel::Low,
        ),
    };

    SummaryResult {
        simple_explanation: with_message_prefix(&commit.message, &narrative),
        technical_summary,
        how_to_test: HowToTest {
            steps,
            curl_example: None,
            postman_example: None,
        },
        tags,
        risk_level,
        source_run_id: None,
    }
}

/// Deterministic, never-empty answer used when the provider gives nothing back.
pub fn fallback_answer(question: &str, commits: &[CommitContext]) -> AnswerResult {
    let question = question.trim();
    let asked = if question.is_empty() {
        "your question".to_string()
    } else {
        format!("\"{question}\"")
    };

    let titled = commits.iter().find(|c| !c.title().is_empty());

    let answer_text = match titled {
        Some(latest) => format!(
            "I couldn't generate an AI answer to {asked} right now. \
             The most recent commit in context is {sha}: \"{title}\", touching {count} file(s).",
            sha = latest.short_sha(),
            title = latest.title(),
            count = latest.files_changed.len()
        ),
        None if !commits.is_empty() => format!(
            "I couldn't generate an AI answer to {asked} right now, \
             and the {count} commit(s) in context carry no message to draw from.",
            count = commits.len()
        ),
        None => format!(
            "I couldn't generate an AI answer to {asked} right now, \
             and there are no commits in context to draw from."
        ),
    };

    AnswerResult {
        answer_text,
        source_run_id: None,
    }
}

fn with_message_prefix(message: &str, narrative: &str) -> String {
    let head = clip(message.trim(), EXPLANATION_MESSAGE_CHARS);
    if head.is_empty() {
        narrative.to_string()
    } else {
        format!("This commit: {head}. {narrative}")
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
