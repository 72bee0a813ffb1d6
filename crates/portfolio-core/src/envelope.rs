use serde::{Deserialize, Serialize};

use crate::fallback::Sourced;

/// `{ success, data, message?, isAiGenerated? }` wrapper returned by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_ai_generated: Option<bool>,
}

impl<T> Envelope<T> {
    pub fn live(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
            is_ai_generated: None,
        }
    }

    pub fn fallback(data: T, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data,
            message: Some(message.into()),
            is_ai_generated: None,
        }
    }

    /// Live data becomes `success: true`; fallback data carries `fallback_message`.
    pub fn from_sourced(sourced: Sourced<T>, fallback_message: &str) -> Self {
        if sourced.is_live() {
            Self::live(sourced.data)
        } else {
            Self::fallback(sourced.data, fallback_message)
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Mirrors `success` into `isAiGenerated` for model-backed endpoints.
    pub fn ai_generated(mut self) -> Self {
        self.is_ai_generated = Some(self.success);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn live_envelope_omits_optional_fields() {
        let value = serde_json::to_value(Envelope::live(json!({"n": 1}))).unwrap();
        assert_eq!(value, json!({"success": true, "data": {"n": 1}}));
    }

    #[test]
    fn fallback_envelope_from_sourced_carries_message() {
        let sourced = Sourced::fallback(3u32, "upstream down");
        let envelope = Envelope::from_sourced(sourced, "Using mock data").ai_generated();
        let value = serde_json::to_value(envelope).unwrap();
        assert_eq!(
            value,
            json!({
                "success": false,
                "data": 3,
                "message": "Using mock data",
                "isAiGenerated": false
            })
        );
    }
}
