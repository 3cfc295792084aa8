use colored::{ColoredString, Colorize};

use crate::commit::{AnswerResult, RiskLevel, SummaryResult};

fn risk_label(risk: RiskLevel) -> ColoredString {
    match risk {
        RiskLevel::Low => risk.as_str().green().bold(),
        RiskLevel::Medium => risk.as_str().yellow().bold(),
        RiskLevel::High => risk.as_str().red().bold(),
    }
}

/// Human-readable rendering of a summary, for the terminal.
pub fn summary_text(sha: &str, summary: &SummaryResult) -> String {
    let mut out = String::new();

    let short: String = sha.chars().take(7).collect();
    if !short.is_empty() {
        out.push_str(&format!("{} {}\n\n", "commit".bright_black(), short.yellow()));
    }

    out.push_str(&format!("{}\n", summary.simple_explanation));

    out.push_str(&format!("\n{}\n", "## Technical summary".bold()));
    for item in &summary.technical_summary {
        out.push_str(&format!("- {item}\n"));
    }

    out.push_str(&format!("\n{}\n", "## How to test".bold()));
    for (idx, step) in summary.how_to_test.steps.iter().enumerate() {
        out.push_str(&format!("{}. {step}\n", idx + 1));
    }
    if let Some(curl) = &summary.how_to_test.curl_example {
        out.push_str(&format!("\n    {curl}\n"));
    }
    if let Some(postman) = &summary.how_to_test.postman_example {
        out.push_str(&format!("\nPostman: {postman}\n"));
    }

    out.push_str(&format!(
        "\n{} {}   {} {}\n",
        "Tags:".bold(),
        summary.tags.join(", "),
        "Risk:".bold(),
        risk_label(summary.risk_level)
    ));

    match &summary.source_run_id {
        Some(run) => out.push_str(&format!("{}\n", format!("run {run}").bright_black())),
        None => out.push_str(&format!("{}\n", "(generated without a model)".bright_black())),
    }

    out
}

pub fn answer_text(answer: &AnswerResult) -> String {
    let mut out = format!("{}\n", answer.answer_text);
    if let Some(run) = &answer.source_run_id {
        out.push_str(&format!("{}\n", format!("run {run}").bright_black()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commit::{CommitContext, HowToTest};
    use crate::insight::fallback::fallback_summary;

    #[test]
    fn summary_text_lists_every_section() {
        colored::control::set_override(false);
        let summary = fallback_summary(&CommitContext::new("1234567890", "fix crash on start"));
        let text = summary_text("1234567890", &summary);
        assert!(text.starts_with("commit 1234567"));
        assert!(text.contains("## Technical summary"));
        assert!(text.contains("1. Reproduce the original issue"));
        assert!(text.contains("Tags: bugfix, stability, improvement"));
        assert!(text.contains("Risk: low"));
        assert!(text.contains("(generated without a model)"));
    }

    #[test]
    fn curl_example_is_shown() {
        colored::control::set_override(false);
        let mut summary = fallback_summary(&CommitContext::new("", "Add endpoint"));
        summary.how_to_test = HowToTest {
            steps: vec!["Call it".into()],
            curl_example: Some("curl localhost:8000/health".into()),
            postman_example: None,
        };
        summary.source_run_id = Some("run-9".into());
        let text = summary_text("", &summary);
        assert!(text.contains("curl localhost:8000/health"));
        assert!(text.contains("run run-9"));
    }
}
