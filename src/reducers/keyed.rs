//! Keyed reducer: runs one base reducer over many independent instances.
//!
//! The keyed state maps instance keys to base-reducer state. Each dispatch
//! first refreshes the `"default"` slot with the base reducer's initial
//! state, then routes the action:
//!
//! * the action's `storeKeys` names an instance for our routing key: only
//!   that instance is reduced (created from `None` if unseen);
//! * no instance named and keys are required: nothing else changes;
//! * otherwise the action is broadcast to every existing instance.
//!
//! `"default"` is left out of broadcasts unless
//! [`KeyedReducerOptions::broadcast_to_default`] is set, so that it keeps
//! holding the initial state.

use std::fmt;
use std::marker::PhantomData;

use log::{debug, trace};

use super::Reducer;
use crate::constants::DEFAULT_INSTANCE_KEY;
use crate::messages::Action;
use crate::options::{ConfigError, KeyedReducerOptions, RoutingKey};
use crate::state::KeyedState;

pub struct KeyedReducer<R, S, T> {
    reducer: R,
    routing_key: String,
    options: KeyedReducerOptions,
    initial_state: S,
    _action: PhantomData<fn(&Action<T>)>,
}

/// Wraps `reducer` so that it manages one state instance per instance key.
///
/// The base reducer is called once here with no prior state and the sentinel
/// action to capture its initial state. A panic from the base reducer, here
/// or on any later dispatch, propagates to the caller untouched.
pub fn create_keyed_reducer<R, S, T>(
    reducer: R,
    routing_key: impl Into<String>,
    options: KeyedReducerOptions,
) -> KeyedReducer<R, S, T>
where
    R: Reducer<S, T>,
    S: Clone,
{
    let routing_key = routing_key.into();
    let initial_state = reducer.reduce(None, &Action::init());
    debug!(
        "created keyed reducer for routing key {:?} (key required: {}, broadcast to default: {})",
        routing_key, options.is_key_required, options.broadcast_to_default
    );
    KeyedReducer {
        reducer,
        routing_key,
        options,
        initial_state,
        _action: PhantomData,
    }
}

/// Like [`create_keyed_reducer`], but rejects an empty routing key.
pub fn try_create_keyed_reducer<R, S, T>(
    reducer: R,
    routing_key: &str,
    options: KeyedReducerOptions,
) -> Result<KeyedReducer<R, S, T>, ConfigError>
where
    R: Reducer<S, T>,
    S: Clone,
{
    let routing_key = RoutingKey::new(routing_key)?;
    Ok(create_keyed_reducer(reducer, routing_key.as_str(), options))
}

impl<R, S, T> KeyedReducer<R, S, T>
where
    R: Reducer<S, T>,
    S: Clone,
{
    /// Keyed reducer with default options.
    pub fn new(reducer: R, routing_key: impl Into<String>) -> Self {
        create_keyed_reducer(reducer, routing_key, KeyedReducerOptions::default())
    }
}

impl<R, S, T> KeyedReducer<R, S, T> {
    pub fn routing_key(&self) -> &str {
        &self.routing_key
    }

    pub fn options(&self) -> KeyedReducerOptions {
        self.options
    }

    /// What the base reducer returned for the sentinel action.
    pub fn initial_state(&self) -> &S {
        &self.initial_state
    }
}

impl<R, S, T> Reducer<KeyedState<S>, T> for KeyedReducer<R, S, T>
where
    R: Reducer<S, T>,
    S: Clone,
{
    fn reduce(&self, state: Option<&KeyedState<S>>, action: &Action<T>) -> KeyedState<S> {
        let state = state
            .cloned()
            .unwrap_or_default()
            .set(DEFAULT_INSTANCE_KEY, self.initial_state.clone());

        if let Some(instance_key) = action.instance_key(&self.routing_key) {
            trace!(
                "{}: routing action to instance {:?}",
                self.routing_key,
                instance_key
            );
            let next = self.reducer.reduce(state.get(instance_key), action);
            return state.set(instance_key, next);
        }

        if self.options.is_key_required {
            trace!(
                "{}: action names no instance and a key is required, skipping",
                self.routing_key
            );
            return state;
        }

        trace!(
            "{}: broadcasting action to {} instance(s)",
            self.routing_key,
            state.len()
        );
        let skip_default = !self.options.broadcast_to_default;
        state.map_instances(|key, value| {
            if skip_default && key == DEFAULT_INSTANCE_KEY {
                value.clone()
            } else {
                self.reducer.reduce(Some(value), action)
            }
        })
    }
}

impl<R, S: fmt::Debug, T> fmt::Debug for KeyedReducer<R, S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyedReducer")
            .field("routing_key", &self.routing_key)
            .field("options", &self.options)
            .field("initial_state", &self.initial_state)
            .finish_non_exhaustive()
    }
}
