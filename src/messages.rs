//! Action model consumed by reducers.
//!
//! An [`Action`] is a typed action plus optional metadata. The metadata may
//! carry a `storeKeys` mapping from routing-key name to instance key, which is
//! how a keyed reducer learns which of its instances an action targets.
//!
//! On the wire an action looks like
//! `{"type": "Increment", "meta": {"storeKeys": {"counter": "testKey"}}}`.

use std::collections::HashMap;

use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::constants::{SENTINEL_ACTION_TYPE, STORE_KEYS_FIELD};

/// Routing-key name -> instance key.
pub type StoreKeys = HashMap<String, String>;

/// The `type` of an action.
///
/// `Init` is the reserved sentinel. Base reducers only match on the
/// `Custom` variants they know about and return their state unchanged for
/// anything else, which is what makes the sentinel usable for deriving an
/// initial state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActionType<T> {
    Init,
    Custom(T),
}

impl<T> ActionType<T> {
    pub fn as_custom(&self) -> Option<&T> {
        match self {
            ActionType::Init => None,
            ActionType::Custom(kind) => Some(kind),
        }
    }
}

impl<T: Serialize> Serialize for ActionType<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ActionType::Init => serializer.serialize_str(SENTINEL_ACTION_TYPE),
            ActionType::Custom(kind) => kind.serialize(serializer),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for ActionType<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        if raw.as_str() == Some(SENTINEL_ACTION_TYPE) {
            return Ok(ActionType::Init);
        }
        T::deserialize(raw)
            .map(ActionType::Custom)
            .map_err(D::Error::custom)
    }
}

/// Metadata attached to an action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionMeta {
    #[serde(rename = "storeKeys", default, skip_serializing_if = "Option::is_none")]
    pub store_keys: Option<StoreKeys>,
}

impl ActionMeta {
    pub fn with_store_keys(store_keys: StoreKeys) -> Self {
        Self {
            store_keys: Some(store_keys),
        }
    }

    /// Reads metadata out of an arbitrary JSON value.
    ///
    /// Never fails: anything that is not an object with an object-valued
    /// `storeKeys` field yields metadata without store keys, and non-string
    /// entries inside `storeKeys` are skipped.
    pub fn from_value(value: &Value) -> Self {
        let store_keys = value
            .as_object()
            .and_then(|meta| meta.get(STORE_KEYS_FIELD))
            .and_then(Value::as_object)
            .map(|keys| {
                keys.iter()
                    .filter_map(|(name, key)| {
                        key.as_str().map(|key| (name.clone(), key.to_string()))
                    })
                    .collect::<StoreKeys>()
            });
        Self { store_keys }
    }
}

fn lenient_meta<'de, D>(deserializer: D) -> Result<Option<ActionMeta>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.map(|value| ActionMeta::from_value(&value)))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "T: Serialize",
    deserialize = "T: DeserializeOwned"
))]
pub struct Action<T> {
    #[serde(rename = "type")]
    pub kind: ActionType<T>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_meta"
    )]
    pub meta: Option<ActionMeta>,
}

impl<T> Action<T> {
    pub fn new(kind: T) -> Self {
        Self {
            kind: ActionType::Custom(kind),
            meta: None,
        }
    }

    /// The sentinel action used to derive initial state.
    pub fn init() -> Self {
        Self {
            kind: ActionType::Init,
            meta: None,
        }
    }

    pub fn is_init(&self) -> bool {
        matches!(self.kind, ActionType::Init)
    }

    pub fn custom(&self) -> Option<&T> {
        self.kind.as_custom()
    }

    /// Adds a single routing entry, keeping any store keys already present.
    pub fn with_store_key(
        mut self,
        routing_key: impl Into<String>,
        instance_key: impl Into<String>,
    ) -> Self {
        self.meta
            .get_or_insert_with(ActionMeta::default)
            .store_keys
            .get_or_insert_with(StoreKeys::new)
            .insert(routing_key.into(), instance_key.into());
        self
    }

    /// Merges `store_keys` into the action's metadata. Entries from
    /// `store_keys` win over entries already on the action.
    pub fn with_store_keys(mut self, store_keys: &StoreKeys) -> Self {
        self.meta
            .get_or_insert_with(ActionMeta::default)
            .store_keys
            .get_or_insert_with(StoreKeys::new)
            .extend(store_keys.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    pub fn store_keys(&self) -> Option<&StoreKeys> {
        self.meta.as_ref().and_then(|meta| meta.store_keys.as_ref())
    }

    /// Instance key this action names for `routing_key`, if any.
    ///
    /// Presence is what counts: an empty string is a valid instance key.
    pub fn instance_key(&self, routing_key: &str) -> Option<&str> {
        self.store_keys()
            .and_then(|keys| keys.get(routing_key))
            .map(String::as_str)
    }
}

impl<T> From<T> for Action<T> {
    fn from(kind: T) -> Self {
        Action::new(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    enum Counter {
        Increment,
        Decrement,
    }

    #[test]
    fn parses_action_with_store_keys() {
        let action: Action<Counter> = serde_json::from_value(json!({
            "type": "Increment",
            "meta": { "storeKeys": { "counter": "testKey" } }
        }))
        .unwrap();

        assert_eq!(action.custom(), Some(&Counter::Increment));
        assert_eq!(action.instance_key("counter"), Some("testKey"));
        assert_eq!(action.instance_key("other"), None);
    }

    #[test]
    fn malformed_meta_is_treated_as_no_store_keys() {
        for meta in [json!(42), json!("x"), json!({}), json!({ "storeKeys": [1, 2] })] {
            let action: Action<Counter> =
                serde_json::from_value(json!({ "type": "Decrement", "meta": meta })).unwrap();
            assert_eq!(action.store_keys(), None, "meta was {meta}");
        }
    }

    #[test]
    fn non_string_store_key_entries_are_skipped() {
        let meta = ActionMeta::from_value(&json!({
            "storeKeys": { "counter": "a", "other": 7, "third": null }
        }));
        let keys = meta.store_keys.unwrap();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys["counter"], "a");
    }

    #[test]
    fn empty_instance_key_still_counts_as_present() {
        let action = Action::new(Counter::Increment).with_store_key("counter", "");
        assert_eq!(action.instance_key("counter"), Some(""));
    }

    #[test]
    fn sentinel_type_round_trips_through_json() {
        let value = serde_json::to_value(Action::<Counter>::init()).unwrap();
        assert_eq!(value, json!({ "type": SENTINEL_ACTION_TYPE }));

        let back: Action<Counter> = serde_json::from_value(value).unwrap();
        assert!(back.is_init());
    }

    #[test]
    fn meta_built_from_store_keys_serializes_as_store_keys() {
        let mut keys = StoreKeys::new();
        keys.insert("counter".to_string(), "testKey".to_string());

        let action = Action {
            kind: ActionType::Custom(Counter::Increment),
            meta: Some(ActionMeta::with_store_keys(keys)),
        };

        assert_eq!(action.instance_key("counter"), Some("testKey"));
        assert_eq!(
            serde_json::to_value(&action).unwrap(),
            json!({ "type": "Increment", "meta": { "storeKeys": { "counter": "testKey" } } })
        );
    }

    #[test]
    fn with_store_keys_overrides_existing_entries() {
        let mut bound = StoreKeys::new();
        bound.insert("counter".to_string(), "bound".to_string());

        let action = Action::new(Counter::Increment)
            .with_store_key("counter", "original")
            .with_store_key("todo", "list")
            .with_store_keys(&bound);

        assert_eq!(action.instance_key("counter"), Some("bound"));
        assert_eq!(action.instance_key("todo"), Some("list"));
    }
}
