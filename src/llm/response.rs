use serde_json::{Map, Value};

/// Field probed first on wrapped responses.
const PRIMARY_FIELD: &str = "final_output";

/// Fallback fields, probed in this order after `final_output`.
const ALTERNATIVE_FIELDS: [&str; 6] = ["output", "result", "content", "response", "answer", "value"];

const STEPS_FIELD: &str = "steps";

/// The shapes a provider body can take, as far as we are willing to guess.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderResponse {
    PlainText(String),
    /// Several candidate outputs. The first one is used.
    Candidates(Vec<Value>),
    /// An object with named fields (`final_output`, `output`, `steps`, ...).
    Wrapped(Map<String, Value>),
    /// Intermediate execution steps. The last one is used.
    StepSequence(Vec<Value>),
    Unknown(Value),
    Absent,
}

impl From<Value> for ProviderResponse {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => ProviderResponse::Absent,
            Value::String(text) => ProviderResponse::PlainText(text),
            Value::Array(items) => ProviderResponse::Candidates(items),
            Value::Object(fields) => ProviderResponse::Wrapped(fields),
            other => ProviderResponse::Unknown(other),
        }
    }
}

impl ProviderResponse {
    /// Collapse the response into one string, or `None` when nothing usable
    /// came back. Never fails.
    pub fn normalize(&self) -> Option<String> {
        match self {
            ProviderResponse::PlainText(text) => non_blank(text.clone()),
            ProviderResponse::Candidates(items) => first_candidate(items),
            ProviderResponse::Wrapped(fields) => probe_fields(fields).or_else(|| {
                log::debug!("No usable output field on provider response; using the whole body");
                non_blank(Value::Object(fields.clone()).to_string())
            }),
            ProviderResponse::StepSequence(steps) => last_step(steps),
            ProviderResponse::Unknown(value) => non_blank(value_text(value)),
            ProviderResponse::Absent => None,
        }
    }
}

fn normalize_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => non_blank(text.clone()),
        Value::Array(items) => first_candidate(items),
        Value::Object(fields) => probe_fields(fields),
        other => non_blank(other.to_string()),
    }
}

// With several candidates there is no score to rank by; iteration order decides.
fn first_candidate(items: &[Value]) -> Option<String> {
    items.first().and_then(|item| non_blank(value_text(item)))
}

fn last_step(steps: &[Value]) -> Option<String> {
    let step = steps.last()?;
    match step.get("output") {
        Some(output) => non_blank(value_text(output)),
        None => non_blank(value_text(step)),
    }
}

/// Named-field probes only. The whole-body fallback applies to the outermost
/// object, never to a nested `final_output`.
fn probe_fields(fields: &Map<String, Value>) -> Option<String> {
    if let Some(primary) = fields.get(PRIMARY_FIELD) {
        if let Some(text) = normalize_value(primary) {
            return Some(text);
        }
    }

    for name in ALTERNATIVE_FIELDS {
        if let Some(text) = fields.get(name).and_then(|v| non_blank(value_text(v))) {
            return Some(text);
        }
    }

    if let Some(Value::Array(steps)) = fields.get(STEPS_FIELD) {
        if let Some(text) = last_step(steps) {
            return Some(text);
        }
    }

    None
}

/// Strings come through verbatim, `null` becomes empty, everything else is
/// rendered as JSON.
pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn non_blank(text: String) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}
