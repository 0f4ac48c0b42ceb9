use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::registry::NOT_ACKNOWLEDGE;

/// Value of one decoded response field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Raw hex digits, exactly as sliced from the payload.
    Hex(String),
    Number(u64),
    Bool(bool),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Hex(text) => f.write_str(text),
            FieldValue::Number(value) => write!(f, "{value}"),
            FieldValue::Bool(value) => write!(f, "{value}"),
        }
    }
}

/// A fully decoded controller reply.
///
/// Serializes as a flat JSON object with the type discriminator under
/// `_type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedResponse {
    /// Response type discriminator, e.g. `CurrentTimeResponse`.
    #[serde(rename = "_type")]
    pub response_type: &'static str,
    /// Opcode the reply carried.
    #[serde(skip)]
    pub opcode: u8,
    #[serde(flatten)]
    pub fields: BTreeMap<&'static str, FieldValue>,
}

impl DecodedResponse {
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Raw hex digits of a field that was not converted.
    pub fn hex(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            FieldValue::Hex(text) => Some(text),
            _ => None,
        }
    }

    /// Numeric value of a converted field.
    pub fn number(&self, name: &str) -> Option<u64> {
        match self.get(name)? {
            FieldValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// Boolean value of a converted field.
    pub fn flag(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            FieldValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// The `ack` flag of acknowledge and negative-acknowledge replies.
    pub fn acknowledged(&self) -> Option<bool> {
        self.flag("ack")
    }

    /// True for a device-level rejection.
    pub fn is_not_acknowledge(&self) -> bool {
        self.opcode == NOT_ACKNOWLEDGE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DecodedResponse {
        let mut fields = BTreeMap::new();
        fields.insert("hour", FieldValue::Number(7));
        fields.insert("sensor_state", FieldValue::Bool(true));
        fields.insert("model_id", FieldValue::Hex("0003".to_string()));
        DecodedResponse {
            response_type: "SampleResponse",
            opcode: 0x90,
            fields,
        }
    }

    #[test]
    fn typed_accessors_match_variant() {
        let decoded = sample();
        assert_eq!(decoded.number("hour"), Some(7));
        assert_eq!(decoded.flag("sensor_state"), Some(true));
        assert_eq!(decoded.hex("model_id"), Some("0003"));
        assert_eq!(decoded.number("model_id"), None);
        assert_eq!(decoded.get("missing"), None);
        assert!(!decoded.is_not_acknowledge());
    }

    #[test]
    fn serializes_flat_with_type_tag() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "_type": "SampleResponse",
                "hour": 7,
                "sensor_state": true,
                "model_id": "0003"
            })
        );
    }
}
