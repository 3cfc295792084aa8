//! Plain-language commit summaries and commit-history Q&A backed by LLMs,
//! with a deterministic fallback whenever the model is missing or misbehaves.

pub mod cli_args;
pub mod commit;
pub mod config;
pub mod git;
pub mod insight;
pub mod llm;
pub mod logging;
pub mod render;
pub mod setup;

pub use commit::{AnswerResult, CommitContext, HowToTest, RiskLevel, SummaryResult};
pub use insight::InsightEngine;
