use anyhow::{anyhow, Context, Result};
use std::process::Command as GitCommand;

use crate::commit::CommitContext;
use crate::llm::prompt_builder::clip;

/// Characters of patch text kept per commit. Prompts cut further.
const DIFF_CAPTURE_LIMIT: usize = 4000;

const HEADER_END: &str = "---END---";

/// Run a git command and capture stdout as String.
pub fn git_output(args: &[&str]) -> Result<String> {
    let output = GitCommand::new("git")
        .args(args)
        .output()
        .with_context(|| format!("failed to run git {:?}", args))?;

    if !output.status.success() {
        return Err(anyhow!(
            "git {:?} exited with status {:?}: {}",
            args,
            output.status.code(),
            String::from_utf8_lossy(&output.stderr).trim()
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Load a single commit (hash, full message, touched files and a diff excerpt).
pub fn commit_context(rev: &str) -> Result<CommitContext> {
    let header = git_output(&[
        "show",
        "-s",
        &format!("--format=%H%n%B%n{HEADER_END}"),
        rev,
    ])
    .with_context(|| format!("failed to read commit {rev}"))?;
    let (sha, message) = parse_header(&header)
        .ok_or_else(|| anyhow!("unexpected `git show` output for {rev}"))?;

    let names = git_output(&["show", "--format=", "--name-only", rev])?;
    let patch = git_output(&["show", "--format=", "--patch", "--no-color", rev])?;

    log::debug!("Loaded commit {sha} from git");

    Ok(CommitContext {
        sha,
        message,
        files_changed: parse_name_list(&names),
        diff_excerpt: clip(&patch, DIFF_CAPTURE_LIMIT),
        prior_summary: None,
    })
}

/// The `count` most recent commits reachable from HEAD, newest first.
pub fn recent_commits(count: usize) -> Result<Vec<CommitContext>> {
    if count == 0 {
        return Ok(vec![]);
    }

    let hashes = git_output(&["log", "-n", &count.to_string(), "--format=%H"])?;
    parse_name_list(&hashes)
        .iter()
        .map(|sha| commit_context(sha))
        .collect()
}

fn parse_header(output: &str) -> Option<(String, String)> {
    let block = output.split(HEADER_END).next()?;
    let mut lines = block.lines();
    let sha = lines.next()?.trim().to_string();
    if sha.is_empty() {
        return None;
    }
    let message = lines.collect::<Vec<_>>().join("\n").trim().to_string();
    Some((sha, message))
}

fn parse_name_list(output: &str) -> Vec<String> {
    output
        .lines()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_splits_hash_and_message() {
        let out = "abc123\nFix login\n\nLonger body\nline two\n\n---END---\n";
        let (sha, message) = parse_header(out).unwrap();
        assert_eq!(sha, "abc123");
        assert_eq!(message, "Fix login\n\nLonger body\nline two");
    }

    #[test]
    fn empty_header_is_rejected() {
        assert!(parse_header("").is_none());
        assert!(parse_header("\n---END---").is_none());
    }

    #[test]
    fn name_list_skips_blank_lines() {
        let out = "\nsrc/main.rs\n  \nREADME.md\n";
        assert_eq!(parse_name_list(out), vec!["src/main.rs", "README.md"]);
    }
}
