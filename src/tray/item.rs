use serde::Serialize;
use serde_json::Value;

pub const UNKNOWN_LABEL: &str = "unknown";

/// One detection reported by the tray backend, normalized so that every
/// item has a label and a finite confidence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectedItem {
    label: String,
    #[serde(rename = "conf")]
    confidence: f64,
}

impl DetectedItem {
    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            label: label.into(),
            confidence: if confidence.is_finite() { confidence } else { 0.0 },
        }
    }

    /// Normalizes a raw `{label, conf}` entry. Other fields are ignored.
    pub fn from_raw(raw: &Value) -> Self {
        let label = match raw.get("label") {
            None | Some(Value::Null) => UNKNOWN_LABEL.to_string(),
            Some(Value::String(label)) => label.clone(),
            Some(other) => other.to_string(),
        };
        let confidence = raw.get("conf").and_then(coerce_confidence).unwrap_or(0.0);
        Self::new(label, confidence)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }
}

fn coerce_confidence(value: &Value) -> Option<f64> {
    let confidence = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    confidence.filter(|confidence| confidence.is_finite())
}
