use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Read};
use std::time::Duration;

use synapse::cli_args::{Cli, Command};
use synapse::config::Config;
use synapse::{git, logging, render, setup};
use synapse::{CommitContext, InsightEngine};

/// Spinner on stderr while a provider call is in flight. Hidden when stderr is not a terminal.
fn spinner(engine: &InsightEngine, msg: &'static str) -> Option<ProgressBar> {
    if engine.is_fallback_only() {
        return None;
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(msg);
    spinner.enable_steady_tick(Duration::from_millis(80));
    Some(spinner)
}

fn run_summarize(cli: &Cli, engine: &InsightEngine, commit: CommitContext) -> Result<()> {
    let progress = spinner(engine, "Summarizing commit...");
    let summary = engine.summarize(&commit);
    if let Some(p) = progress {
        p.finish_and_clear();
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", render::summary_text(&commit.sha, &summary));
    }
    Ok(())
}

fn run_ask(cli: &Cli, engine: &InsightEngine, question: &str, commits: Vec<CommitContext>) -> Result<()> {
    log::info!("Answering from {} commit(s)", commits.len());

    let progress = spinner(engine, "Thinking...");
    let answer = engine.answer(question, &commits);
    if let Some(p) = progress {
        p.finish_and_clear();
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&answer)?);
    } else {
        print!("{}", render::answer_text(&answer));
    }
    Ok(())
}

fn read_commits_from_stdin() -> Result<Vec<CommitContext>> {
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read commits from stdin")?;
    serde_json::from_str(&buf).context("stdin must be a JSON array of commits")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    let cfg = Config::from_sources(&cli);
    log::debug!("Resolved provider {} with model {}", cfg.provider.as_str(), cfg.model);

    let engine = InsightEngine::new(setup::build_llm_client(&cfg));

    match &cli.command {
        Command::Summarize {
            rev,
            message,
            files,
            diff,
            sha,
        } => {
            let commit = match message {
                Some(message) => CommitContext::new(sha.clone().unwrap_or_default(), message.clone())
                    .with_files(files.iter().cloned())
                    .with_diff(diff.clone().unwrap_or_default()),
                None => git::commit_context(rev.as_deref().unwrap_or("HEAD"))?,
            };
            run_summarize(&cli, &engine, commit)
        }
        Command::Ask {
            question,
            rev,
            stdin,
            recent,
        } => {
            let commits = if *stdin {
                read_commits_from_stdin()?
            } else if let Some(rev) = rev {
                vec![git::commit_context(rev)?]
            } else {
                git::recent_commits(*recent)?
            };
            run_ask(&cli, &engine, question, commits)
        }
    }
}
