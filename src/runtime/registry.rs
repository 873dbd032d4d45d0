//! Process-wide object registry.
//!
//! Capability initializers publish their singletons and module constants
//! here (for example a pool handle under `"db"` or a constant under
//! `"net.DEFAULT_TIMEOUT"`), making them reachable from any evaluation
//! thread regardless of lexical scope.

use lazy_static::lazy_static;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::runtime::value::Value;

lazy_static! {
    /// Global object table. The namespace is flat; dotted names are plain
    /// keys with no hierarchy.
    static ref GLOBAL_OBJECTS: RwLock<HashMap<String, Value>> = RwLock::new(HashMap::new());
}

/// Publish a named object for the whole process.
/// Re-registering a name replaces the previous value.
pub fn set_global_object(name: impl Into<String>, value: Value) {
    GLOBAL_OBJECTS.write().unwrap().insert(name.into(), value);
}

/// Look up a published object by name.
pub fn get_global_object(name: &str) -> Option<Value> {
    GLOBAL_OBJECTS.read().unwrap().get(name).cloned()
}
