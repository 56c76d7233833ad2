//! List responses come back either as a bare array or wrapped as
//! `{"data": [...]}`. Every list call goes through [`normalize_list`].

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ClientError;

pub fn normalize_list<T: DeserializeOwned>(body: Value) -> Result<Vec<T>, ClientError> {
    let items = match body {
        Value::Array(items) => Value::Array(items),
        Value::Object(mut map) => match map.remove("data") {
            Some(data @ Value::Array(_)) => data,
            Some(Value::Null) | None => Value::Array(Vec::new()),
            Some(other) => {
                return Err(ClientError::Decode(format!(
                    "expected a list under \"data\", got {other}"
                )))
            }
        },
        Value::Null => Value::Array(Vec::new()),
        other => {
            return Err(ClientError::Decode(format!(
                "expected a list, got {other}"
            )))
        }
    };
    serde_json::from_value(items).map_err(|e| ClientError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use unicompass_core::University;

    fn uni(id: i64) -> Value {
        json!({"id": id, "name": format!("U{id}"), "country": "Canada"})
    }

    #[test]
    fn test_bare_array_and_wrapped_array_agree() {
        let bare: Vec<University> = normalize_list(json!([uni(1), uni(2)])).unwrap();
        let wrapped: Vec<University> = normalize_list(json!({"data": [uni(1), uni(2)]})).unwrap();
        assert_eq!(bare, wrapped);
        assert_eq!(bare.len(), 2);
    }

    #[test]
    fn test_missing_or_null_data_is_empty() {
        let empty: Vec<University> = normalize_list(json!({})).unwrap();
        assert!(empty.is_empty());
        let null: Vec<University> = normalize_list(json!({"data": null})).unwrap();
        assert!(null.is_empty());
    }

    #[test]
    fn test_non_list_is_a_decode_error() {
        let result: Result<Vec<University>, _> = normalize_list(json!("nope"));
        assert!(matches!(result, Err(ClientError::Decode(_))));
        let result: Result<Vec<University>, _> = normalize_list(json!({"data": 3}));
        assert!(matches!(result, Err(ClientError::Decode(_))));
    }
}
