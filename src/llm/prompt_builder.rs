use crate::commit::CommitContext;
use crate::llm::prompts;

/// Characters of diff included in a summary prompt.
pub const SUMMARY_DIFF_BUDGET: usize = 1000;
/// Filenames listed in a summary prompt.
pub const MAX_PROMPT_FILES: usize = 5;
/// Commits included as context for a question.
pub const MAX_CONTEXT_BLOCKS: usize = 3;
/// Characters of rendered commit context included in a question prompt.
pub const QUESTION_CONTEXT_BUDGET: usize = 2500;

#[derive(Debug, Clone, PartialEq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

pub fn summary_prompt(commit: &CommitContext) -> PromptPair {
    let system = prompts::SUMMARY_INSTRUCTIONS.to_owned();

    let mut user = format!(
        "Commit: {sha}\nMessage:\n{message}\n\n",
        sha = commit.sha,
        message = commit.message.trim()
    );

    user.push_str(&format!(
        "Files changed ({total} total): {files}\n",
        total = commit.files_changed.len(),
        files = render_file_list(&commit.files_changed)
    ));

    // Hard character cut, not word-aware.
    let diff = clip(&commit.diff_excerpt, SUMMARY_DIFF_BUDGET);
    if !diff.trim().is_empty() {
        user.push_str(&format!("\nDiff excerpt:\n```diff\n{diff}\n```\n"));
    }

    if let Some(prior) = commit.prior_summary.as_deref() {
        user.push_str(&format!("\nPrevious summary:\n{}\n", prior.trim()));
    }

    PromptPair { system, user }
}

pub fn question_prompt(question: &str, commits: &[CommitContext]) -> PromptPair {
    let system = prompts::ANSWER_INSTRUCTIONS.to_owned();

    let mut context = String::new();
    for commit in commits.iter().take(MAX_CONTEXT_BLOCKS) {
        context.push_str(&render_context_block(commit));
    }
    let context = clip(&context, QUESTION_CONTEXT_BUDGET);

    let user = if context.trim().is_empty() {
        format!("Question: {q}\n\nNo commits are available as context.", q = question.trim())
    } else {
        format!(
            "Question: {q}\n\nRecent commits (newest first):\n\n{context}",
            q = question.trim()
        )
    };

    PromptPair { system, user }
}

fn render_context_block(commit: &CommitContext) -> String {
    let mut out = format!(
        "Commit {short}: {message}\n",
        short = commit.short_sha(),
        message = commit.message.trim()
    );
    if !commit.files_changed.is_empty() {
        out.push_str(&format!("Files: {}\n", render_file_list(&commit.files_changed)));
    }
    if let Some(summary) = commit.prior_summary.as_deref() {
        out.push_str(&format!("Summary: {}\n", summary.trim()));
    }
    if !commit.diff_excerpt.trim().is_empty() {
        out.push_str(&format!("Diff:\n{}\n", commit.diff_excerpt.trim_end()));
    }
    out.push('\n');
    out
}

fn render_file_list(files: &[String]) -> String {
    if files.is_empty() {
        return "(none listed)".to_string();
    }

    let mut listed = files
        .iter()
        .take(MAX_PROMPT_FILES)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if files.len() > MAX_PROMPT_FILES {
        listed.push_str(&format!(" (+{} more)", files.len() - MAX_PROMPT_FILES));
    }
    listed
}

/// First `budget` characters of `text`.
pub(crate) fn clip(text: &str, budget: usize) -> String {
    text.chars().take(budget).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit(files: usize, diff_len: usize) -> CommitContext {
        CommitContext::new("0123456789abcdef", "Add dark mode\n\nToggle in settings")
            .with_files((0..files).map(|i| format!("src/file_{i}.rs")))
            .with_diff("x".repeat(diff_len))
    }

    #[test]
    fn summary_prompt_embeds_the_json_shape() {
        let prompt = summary_prompt(&commit(1, 10));
        assert!(prompt.system.contains("\"simple_explanation\""));
        assert!(prompt.system.contains("\"risk_level\""));
        assert!(prompt.system.contains("Return ONLY a JSON object"));
        assert!(prompt.user.contains("Add dark mode"));
    }

    #[test]
    fn summary_prompt_caps_files_and_diff() {
        let prompt = summary_prompt(&commit(8, 5000));
        assert!(prompt.user.contains("src/file_4.rs"));
        assert!(!prompt.user.contains("src/file_5.rs"));
        assert!(prompt.user.contains("(+3 more)"));
        assert!(prompt.user.contains("Files changed (8 total)"));

        let longest_run = prompt
            .user
            .split(|c| c != 'x')
            .map(str::len)
            .max()
            .unwrap_or(0);
        assert_eq!(longest_run, SUMMARY_DIFF_BUDGET);
    }

    #[test]
    fn summary_prompt_skips_empty_diff() {
        let prompt = summary_prompt(&commit(0, 0));
        assert!(!prompt.user.contains("```diff"));
        assert!(prompt.user.contains("(none listed)"));
    }

    #[test]
    fn question_prompt_uses_at_most_three_commits() {
        let commits: Vec<CommitContext> = (0..5)
            .map(|i| CommitContext::new(format!("{i}{i}{i}{i}{i}{i}{i}{i}"), format!("Commit number {i}")))
            .collect();
        let prompt = question_prompt("What changed?", &commits);
        assert!(prompt.user.contains("Commit number 2"));
        assert!(!prompt.user.contains("Commit number 3"));
        assert!(prompt.system.contains("plain text"));
    }

    #[test]
    fn question_context_is_clipped() {
        let commits = vec![commit(2, 10_000)];
        let prompt = question_prompt("Why?", &commits);
        let header = "Question: Why?\n\nRecent commits (newest first):\n\n";
        assert!(prompt.user.starts_with(header));
        assert_eq!(prompt.user.chars().count(), header.chars().count() + QUESTION_CONTEXT_BUDGET);
    }

    #[test]
    fn clip_respects_char_boundaries() {
        assert_eq!(clip("héllo", 2), "hé");
        assert_eq!(clip("abc", 10), "abc");
    }
}
