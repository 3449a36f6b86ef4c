//! Decoding of the list responses, e.g. `{"expenses": [...]}`.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Decode the array stored under `key` in an API response.
///
/// A missing or null array is an empty list. Entries that fail to decode are
/// dropped one at a time with a warning so one bad record does not hide the rest.
pub fn decode_list<T: DeserializeOwned>(mut response: Value, key: &str) -> Vec<T> {
    let entries = match response.get_mut(key).map(Value::take) {
        Some(Value::Array(entries)) => entries,
        None | Some(Value::Null) => return Vec::new(),
        Some(other) => {
            tracing::warn!("Expected an array for \"{key}\" in the API response, got {other}");
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value(entry.clone()) {
            Ok(decoded) => Some(decoded),
            Err(error) => {
                tracing::warn!("Skipping invalid entry in \"{key}\": {error}. Got {entry}");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::decode_list;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: String,
        amount: f64,
    }

    #[test]
    fn drops_invalid_entries() {
        let response = json!({
            "items": [
                { "id": "a", "amount": 1.5 },
                { "id": "b", "amount": "lots" },
                { "id": "c", "amount": 3.0 }
            ]
        });

        let got: Vec<Item> = decode_list(response, "items");

        assert_eq!(
            got,
            vec![
                Item { id: "a".to_owned(), amount: 1.5 },
                Item { id: "c".to_owned(), amount: 3.0 },
            ]
        );
    }

    #[test]
    fn missing_or_malformed_list_is_empty() {
        assert!(decode_list::<Item>(json!({ "message": "ok" }), "items").is_empty());
        assert!(decode_list::<Item>(json!({ "items": "nope" }), "items").is_empty());
        assert!(decode_list::<Item>(json!(null), "items").is_empty());
    }
}
