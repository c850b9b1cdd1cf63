use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

/// Accepts `"12.5%"`, `12.5` or `null` and yields the textual form.
///
/// Several dashboard fields are emitted as numbers by one backend view and as
/// preformatted strings by another.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Identifier emitted as a JSON number by some views and as a string by others.
pub fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!("expected string or number id, got {}", other))),
    }
}

/// Numeric field that GraphQL views may emit as a string (`"42"`).
pub fn opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "super::string_or_number")]
        value: Option<String>,
    }

    #[test]
    fn numbers_and_strings_are_both_accepted() {
        let probe: Probe = serde_json::from_value(json!({"value": 42.5})).unwrap();
        assert_eq!(probe.value.as_deref(), Some("42.5"));

        let probe: Probe = serde_json::from_value(json!({"value": "42.5%"})).unwrap();
        assert_eq!(probe.value.as_deref(), Some("42.5%"));

        let probe: Probe = serde_json::from_value(json!({})).unwrap();
        assert_eq!(probe.value, None);
    }

    #[derive(Deserialize)]
    struct Ids {
        #[serde(deserialize_with = "super::id_string")]
        id: String,
        #[serde(default, deserialize_with = "super::opt_i64")]
        post_id: Option<i64>,
    }

    #[test]
    fn ids_accept_both_encodings() {
        let ids: Ids = serde_json::from_value(json!({"id": 7, "post_id": "12"})).unwrap();
        assert_eq!(ids.id, "7");
        assert_eq!(ids.post_id, Some(12));

        let ids: Ids = serde_json::from_value(json!({"id": "c-1"})).unwrap();
        assert_eq!(ids.id, "c-1");
        assert_eq!(ids.post_id, None);

        assert!(serde_json::from_value::<Ids>(json!({"id": null})).is_err());
    }
}
