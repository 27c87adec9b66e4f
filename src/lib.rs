//! Keyed reducers: run one reducer over many independent state instances.
//!
//! [`create_keyed_reducer`] wraps a base reducer so that its state becomes a
//! persistent map from instance key to the base reducer's state. Actions pick
//! their target instance through `meta.storeKeys[routing key]`; actions that
//! name no instance are broadcast to every instance, or ignored when the
//! reducer is configured with `is_key_required`.

pub mod constants;
pub mod messages;
pub mod options;
pub mod reducers;
pub mod state;
pub mod store;


pub use constants::{DEFAULT_INSTANCE_KEY, SENTINEL_ACTION_TYPE};
pub use messages::{Action, ActionMeta, ActionType, StoreKeys};
pub use options::{ConfigError, KeyedReducerOptions, RoutingKey};
pub use reducers::{create_keyed_reducer, try_create_keyed_reducer, KeyedReducer, Reducer};
pub use state::KeyedState;
pub use store::{store_keys, KeyedDispatcher, Store};
