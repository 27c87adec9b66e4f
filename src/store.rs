//! Minimal host store: owns the current state and feeds actions through a
//! root reducer one at a time.

use std::marker::PhantomData;

use log::trace;

use crate::messages::{Action, StoreKeys};
use crate::reducers::Reducer;

pub struct Store<R, S, T> {
    reducer: R,
    state: S,
    _action: PhantomData<fn(&Action<T>)>,
}

impl<R, S, T> Store<R, S, T>
where
    R: Reducer<S, T>,
{
    /// Creates the store and dispatches the init action so the state is
    /// populated before the first real action.
    pub fn new(reducer: R) -> Self {
        let state = reducer.reduce(None, &Action::init());
        Self {
            reducer,
            state,
            _action: PhantomData,
        }
    }

    /// Creates the store from a preloaded state. The init action still runs
    /// against it.
    pub fn with_state(reducer: R, preloaded: S) -> Self {
        let state = reducer.reduce(Some(&preloaded), &Action::init());
        Self {
            reducer,
            state,
            _action: PhantomData,
        }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn dispatch(&mut self, action: impl Into<Action<T>>) -> &S {
        let action = action.into();
        trace!(
            "dispatching action (init: {}, store keys: {:?})",
            action.is_init(),
            action.store_keys()
        );
        self.state = self.reducer.reduce(Some(&self.state), &action);
        &self.state
    }

    /// Returns a dispatcher that stamps `store_keys` onto every action it
    /// sends, so each action targets the bound instances.
    pub fn bind_keyed(&mut self, store_keys: StoreKeys) -> KeyedDispatcher<'_, R, S, T> {
        KeyedDispatcher {
            store: self,
            store_keys,
        }
    }
}

pub struct KeyedDispatcher<'a, R, S, T> {
    store: &'a mut Store<R, S, T>,
    store_keys: StoreKeys,
}

impl<'a, R, S, T> KeyedDispatcher<'a, R, S, T>
where
    R: Reducer<S, T>,
{
    pub fn store_keys(&self) -> &StoreKeys {
        &self.store_keys
    }

    pub fn dispatch(&mut self, action: impl Into<Action<T>>) -> &S {
        let action = action.into().with_store_keys(&self.store_keys);
        self.store.dispatch(action)
    }

    pub fn state(&self) -> &S {
        self.store.state()
    }
}

/// Builds a [`StoreKeys`] map from `(routing key, instance key)` pairs.
pub fn store_keys<I, K, V>(pairs: I) -> StoreKeys
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Toggle {
        Flip,
    }

    fn toggle(state: Option<&bool>, action: &Action<Toggle>) -> bool {
        let state = state.copied().unwrap_or(false);
        match action.custom() {
            Some(Toggle::Flip) => !state,
            None => state,
        }
    }

    fn toggle_fn() -> fn(Option<&bool>, &Action<Toggle>) -> bool {
        toggle
    }

    #[test]
    fn new_store_runs_init() {
        let store = Store::new(toggle_fn());
        assert!(!*store.state());
    }

    #[test]
    fn preloaded_state_survives_init() {
        let store = Store::with_state(toggle_fn(), true);
        assert!(*store.state());
    }

    #[test]
    fn dispatch_accepts_bare_action_types() {
        let mut store = Store::new(toggle_fn());
        store.dispatch(Toggle::Flip);
        assert!(!*store.dispatch(Toggle::Flip));
    }

    #[test]
    fn keyed_dispatcher_stamps_store_keys() {
        let mut store = Store::new(toggle_fn());
        let mut bound = store.bind_keyed(store_keys([("toggle", "a")]));
        assert_eq!(bound.store_keys().get("toggle").map(String::as_str), Some("a"));
        assert!(*bound.dispatch(Toggle::Flip));
    }
}
