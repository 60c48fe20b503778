//! Redacted entity state captured for the audit trail.

use serde::Serialize;
use serde_json::{Map, Value};
use tasktrail_core::{AppError, AppResult};

/// Keys holding credential material. They are removed at every nesting level.
pub const SENSITIVE_FIELDS: &[&str] = &["password", "password_hash"];

/// Ordered, string-keyed copy of an entity's state with credential fields removed.
///
/// The only ways to build one go through redaction, so a `Snapshot` never
/// carries a credential value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Snapshot(Map<String, Value>);

impl Snapshot {
    /// Serializes an entity and strips credential fields.
    ///
    /// Fails when the entity does not serialize to a JSON object.
    pub fn capture<T: Serialize + ?Sized>(state: &T) -> AppResult<Self> {
        let value = serde_json::to_value(state).map_err(|error| {
            AppError::Internal(format!("failed to serialize audit snapshot: {error}"))
        })?;

        match value {
            Value::Object(map) => Ok(Self::from_map(map)),
            other => Err(AppError::Internal(format!(
                "audit snapshot must be an object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Wraps an already-built map, stripping credential fields.
    #[must_use]
    pub fn from_map(mut map: Map<String, Value>) -> Self {
        redact_map(&mut map);
        Self(map)
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns whether `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Lists keys whose values differ between `self` and `other`, in key order of `self`
    /// followed by keys only present in `other`.
    #[must_use]
    pub fn changed_fields(&self, other: &Self) -> Vec<String> {
        let mut changed: Vec<String> = self
            .0
            .iter()
            .filter(|(key, value)| other.0.get(key.as_str()) != Some(*value))
            .map(|(key, _)| key.clone())
            .collect();
        changed.extend(
            other
                .0
                .keys()
                .filter(|key| !self.0.contains_key(key.as_str()))
                .cloned(),
        );

        changed
    }

    /// Converts the snapshot into a JSON object value.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

fn redact_map(map: &mut Map<String, Value>) {
    map.retain(|key, _| !is_sensitive(key));
    for value in map.values_mut() {
        redact_value(value);
    }
}

fn redact_value(value: &mut Value) {
    match value {
        Value::Object(map) => redact_map(map),
        Value::Array(items) => items.iter_mut().for_each(redact_value),
        _ => {}
    }
}

fn is_sensitive(key: &str) -> bool {
    SENSITIVE_FIELDS
        .iter()
        .any(|sensitive| key.eq_ignore_ascii_case(sensitive))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::{User, UserId};

    fn contains_sensitive_key(value: &Value) -> bool {
        match value {
            Value::Object(map) => map
                .iter()
                .any(|(key, nested)| is_sensitive(key) || contains_sensitive_key(nested)),
            Value::Array(items) => items.iter().any(contains_sensitive_key),
            _ => false,
        }
    }

    fn arbitrary_json() -> impl Strategy<Value = Value> {
        let key = prop_oneof![
            Just("password".to_owned()),
            Just("Password".to_owned()),
            Just("password_hash".to_owned()),
            "[a-z_]{1,8}",
        ];
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::from),
            "[a-zA-Z0-9 ]{0,12}".prop_map(Value::String),
        ];

        leaf.prop_recursive(4, 48, 6, move |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::vec((key.clone(), inner), 0..6)
                    .prop_map(|entries| Value::Object(entries.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn no_credential_key_survives_redaction(value in arbitrary_json()) {
            let mut map = Map::new();
            map.insert("payload".to_owned(), value);
            map.insert("password".to_owned(), Value::String("secret".to_owned()));

            let snapshot = Snapshot::from_map(map);

            prop_assert!(!contains_sensitive_key(&snapshot.into_value()));
        }
    }

    #[test]
    fn user_snapshot_omits_password_digest() -> AppResult<()> {
        let user = User::new(UserId::new(), "Alice", "alice", "$argon2id$digest")?;

        let snapshot = Snapshot::capture(&user)?;

        assert!(!snapshot.contains_key("password"));
        assert_eq!(snapshot.get("username"), Some(&json!("alice")));
        Ok(())
    }

    #[test]
    fn nested_credentials_are_removed() -> AppResult<()> {
        let snapshot = Snapshot::capture(&json!({
            "id": "task-1",
            "user": { "username": "alice", "password": "hash" },
            "history": [{ "password_hash": "old" }]
        }))?;

        assert_eq!(
            snapshot.into_value(),
            json!({
                "id": "task-1",
                "user": { "username": "alice" },
                "history": [{}]
            })
        );
        Ok(())
    }

    #[test]
    fn non_object_state_is_rejected() {
        let snapshot = Snapshot::capture(&json!(["not", "an", "object"]));
        assert!(matches!(snapshot, Err(AppError::Internal(_))));
    }

    #[test]
    fn changed_fields_lists_only_differences() -> AppResult<()> {
        let before = Snapshot::capture(&json!({ "id": "1", "name": "Ops", "old": true }))?;
        let after = Snapshot::capture(&json!({ "id": "1", "name": "Operations", "new": 1 }))?;

        assert_eq!(
            before.changed_fields(&after),
            vec!["name".to_owned(), "old".to_owned(), "new".to_owned()]
        );
        Ok(())
    }
}
