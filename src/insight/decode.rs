use serde_json::{Map, Value};

use crate::commit::{HowToTest, RiskLevel, SummaryResult};
use crate::llm::prompt_builder::clip;
use crate::llm::response::value_text;

/// Characters of the commit message used in the default explanation.
pub const EXPLANATION_MESSAGE_CHARS: usize = 100;
/// Upper bound for `technical_summary` and `tags`.
pub const MAX_LIST_ITEMS: usize = 5;

const DEFAULT_TECHNICAL_SUMMARY: [&str; 2] = ["Code changes", "Updates"];
const DEFAULT_TEST_STEP: &str = "Test the changes";
const DEFAULT_TAG: &str = "update";

/// Pull a JSON object out of free-form provider text.
///
/// Strips a markdown fence, takes everything between the first `{` and the
/// last `}`, flattens raw line breaks to spaces and parses strictly. Braces
/// inside string values are not tracked, so prose containing `}` after the
/// object can still break the cut. Returns `None` on any failure.
pub fn extract_json_object(text: &str) -> Option<Map<String, Value>> {
    let unfenced = strip_fence(text);

    let candidate = match (unfenced.find('{'), unfenced.rfind('}')) {
        (Some(open), Some(close)) if close > open => &unfenced[open..=close],
        _ => unfenced,
    };

    let flattened = candidate.replace(['\n', '\r'], " ");

    match serde_json::from_str::<Value>(&flattened) {
        Ok(Value::Object(fields)) => Some(fields),
        Ok(other) => {
            log::debug!("Provider JSON is not an object: {}", kind_of(&other));
            None
        }
        Err(err) => {
            log::debug!("Provider output is not valid JSON: {err}");
            None
        }
    }
}

fn strip_fence(text: &str) -> &str {
    fenced_interior(text, "```json")
        .or_else(|| fenced_interior(text, "```"))
        .unwrap_or(text)
}

/// Interior of the first block opened by `opener`. An unterminated block runs
/// to the end of the text.
fn fenced_interior<'a>(text: &'a str, opener: &str) -> Option<&'a str> {
    let start = text.find(opener)? + opener.len();
    let rest = &text[start..];
    let end = rest.find("```").unwrap_or(rest.len());
    Some(rest[..end].trim())
}

/// Fill in every summary field from a decoded object, defaulting each one
/// independently. Never fails.
pub fn repair_summary(
    fields: &Map<String, Value>,
    commit_message: &str,
    run_id: Option<String>,
) -> SummaryResult {
    let simple_explanation = match fields.get("simple_explanation") {
        Some(value) if is_truthy(value) => value_text(value),
        _ => default_explanation(commit_message),
    };

    let technical_summary = match fields.get("technical_summary") {
        Some(Value::Array(items)) => first_items(items),
        _ => DEFAULT_TECHNICAL_SUMMARY.iter().map(|s| s.to_string()).collect(),
    };

    let how_to_test = match fields.get("how_to_test") {
        Some(Value::Object(test)) => repair_how_to_test(test),
        _ => default_how_to_test(),
    };

    let tags = match fields.get("tags") {
        Some(Value::Array(items)) if !items.is_empty() => first_items(items),
        _ => vec![DEFAULT_TAG.to_string()],
    };

    let risk_level = fields
        .get("risk_level")
        .and_then(Value::as_str)
        .and_then(RiskLevel::from_wire)
        .unwrap_or_default();

    SummaryResult {
        simple_explanation,
        technical_summary,
        how_to_test,
        tags,
        risk_level,
        source_run_id: run_id,
    }
}

pub fn default_explanation(commit_message: &str) -> String {
    format!("This commit: {}", clip(commit_message, EXPLANATION_MESSAGE_CHARS))
}

pub fn default_how_to_test() -> HowToTest {
    HowToTest {
        steps: vec![DEFAULT_TEST_STEP.to_string()],
        curl_example: None,
        postman_example: None,
    }
}

fn repair_how_to_test(test: &Map<String, Value>) -> HowToTest {
    let steps = match test.get("steps") {
        Some(Value::Array(items)) => items.iter().map(value_text).collect(),
        _ => vec![DEFAULT_TEST_STEP.to_string()],
    };

    let curl_example = test
        .get("curl")
        .filter(|v| !v.is_null())
        .map(value_text);

    let postman_example = test.get("postman").filter(|v| !v.is_null()).cloned();

    HowToTest {
        steps,
        curl_example,
        postman_example,
    }
}

fn first_items(items: &[Value]) -> Vec<String> {
    items.iter().take(MAX_LIST_ITEMS).map(value_text).collect()
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
