use serde_json::{Map, Value};

/// Inbound send request as received on `POST /email`.
///
/// Kept as a raw JSON object so validation can report on absent keys
/// instead of failing deserialization wholesale. Only string values count
/// as present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmailRequest(Map<String, Value>);

impl EmailRequest {
    /// Wraps a JSON value if it is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// String value of `field`, `None` when absent or not a string.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    pub fn set_text(&mut self, field: &str, value: impl Into<String>) {
        self.0.insert(field.to_string(), Value::String(value.into()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_requires_object() {
        assert!(EmailRequest::from_value(json!({"to": "a@b.com"})).is_some());
        assert!(EmailRequest::from_value(Value::Null).is_none());
        assert!(EmailRequest::from_value(json!(["a@b.com"])).is_none());
        assert!(EmailRequest::from_value(json!("a@b.com")).is_none());
    }

    #[test]
    fn test_non_string_values_read_as_absent() {
        let request = EmailRequest::from_value(json!({
            "to": "a@b.com",
            "subject": null,
            "body": 42,
        }))
        .unwrap();

        assert_eq!(request.text("to"), Some("a@b.com"));
        assert_eq!(request.text("subject"), None);
        assert_eq!(request.text("body"), None);
        assert_eq!(request.text("from"), None);
    }
}
