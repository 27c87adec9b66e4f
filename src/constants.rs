// Reserved names shared by the keyed reducer and the action model.

// Action type of the sentinel action used to derive a reducer's initial state.
// Base reducers never match on it, so they fall through to their default arm.
pub const SENTINEL_ACTION_TYPE: &str = "@@ReduxKeyedReducerImmutable";

// Instance key whose value is always the base reducer's initial state.
pub const DEFAULT_INSTANCE_KEY: &str = "default";

// Name of the routing map inside action metadata on the wire.
pub const STORE_KEYS_FIELD: &str = "storeKeys";
