use serde_json::{Map, Value};

use super::transcription_result::TranscriptionResult;

const TRANSCRIPTION_KEY: &str = "transcription";
const LANGUAGE_KEY: &str = "language";

/// Raw output of a hosted transcription model.
///
/// Providers return either a structured object, a bare string, or some other
/// JSON value depending on the model version. [`ProviderOutput::normalize`]
/// folds every shape into a [`TranscriptionResult`].
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderOutput {
    Mapping(Map<String, Value>),
    Text(String),
    Other(Value),
}

impl ProviderOutput {
    pub fn normalize(self) -> TranscriptionResult {
        match self {
            Self::Mapping(map) => {
                let transcription = match map.get(TRANSCRIPTION_KEY) {
                    Some(value) => render_text(value),
                    None => Value::Object(map.clone()).to_string(),
                };
                let language = map.get(LANGUAGE_KEY).and_then(render_optional);
                TranscriptionResult::new(transcription, language)
            }
            Self::Text(text) => TranscriptionResult::new(text, None),
            Self::Other(value) => TranscriptionResult::new(value.to_string(), None),
        }
    }
}

impl From<Value> for ProviderOutput {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::Mapping(map),
            Value::String(text) => Self::Text(text),
            other => Self::Other(other),
        }
    }
}

fn render_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn render_optional(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
