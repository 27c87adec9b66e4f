//! Configuration for keyed reducers.

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("routing key name must not be empty")]
    EmptyRoutingKey,
    #[error("invalid keyed reducer options: {0}")]
    InvalidOptions(#[from] serde_json::Error),
}

/// Options accepted by [`create_keyed_reducer`](crate::create_keyed_reducer).
///
/// Deserializes from camelCase JSON; missing fields take their defaults, so
/// `{}` and `{"isKeyRequired": true}` are both valid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KeyedReducerOptions {
    /// When set, actions that do not name an instance for this reducer's
    /// routing key are not applied to any instance.
    pub is_key_required: bool,
    /// When set, untargeted broadcasts also run the action against the
    /// `"default"` slot instead of leaving it at the initial state.
    pub broadcast_to_default: bool,
}

impl KeyedReducerOptions {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn with_key_required(mut self, is_key_required: bool) -> Self {
        self.is_key_required = is_key_required;
        self
    }

    pub fn with_broadcast_to_default(mut self, broadcast_to_default: bool) -> Self {
        self.broadcast_to_default = broadcast_to_default;
        self
    }
}

/// A non-empty routing-key name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoutingKey(String);

impl RoutingKey {
    pub fn new(name: impl Into<String>) -> Result<Self, ConfigError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ConfigError::EmptyRoutingKey);
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for RoutingKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RoutingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_gives_defaults() {
        let options = KeyedReducerOptions::from_json("{}").unwrap();
        assert_eq!(options, KeyedReducerOptions::default());
        assert!(!options.is_key_required);
        assert!(!options.broadcast_to_default);
    }

    #[test]
    fn partial_json_sets_only_named_fields() {
        let options = KeyedReducerOptions::from_json(r#"{"isKeyRequired": true}"#).unwrap();
        assert!(options.is_key_required);
        assert!(!options.broadcast_to_default);
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = KeyedReducerOptions::from_json(r#"{"isKeyRequired": "yes"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOptions(_)));
    }

    #[test]
    fn routing_key_must_not_be_empty() {
        assert!(matches!(RoutingKey::new(""), Err(ConfigError::EmptyRoutingKey)));
        assert_eq!(RoutingKey::new("counter").unwrap().as_str(), "counter");
    }
}
