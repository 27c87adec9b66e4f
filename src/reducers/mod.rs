//! Reducer calling convention and the keyed reducer combinator.
//!
//! A reducer is a pure function from a prior state (absent on the very first
//! call) and an action to the next state. Plain functions and closures of the
//! right shape are reducers through the blanket impl below; combinators such
//! as [`KeyedReducer`] implement the trait directly.

pub mod keyed;

pub use keyed::{create_keyed_reducer, try_create_keyed_reducer, KeyedReducer};

use crate::messages::Action;

pub trait Reducer<S, T> {
    fn reduce(&self, state: Option<&S>, action: &Action<T>) -> S;
}

impl<S, T, F> Reducer<S, T> for F
where
    F: Fn(Option<&S>, &Action<T>) -> S,
{
    fn reduce(&self, state: Option<&S>, action: &Action<T>) -> S {
        self(state, action)
    }
}
