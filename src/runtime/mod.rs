//! The Lumo object model and execution environments.
//!
//! Everything the evaluator and the native capability families share lives
//! here: runtime values, classes and dispatch, lexical scopes, call frames
//! with deferred calls, and the process-wide object registry.

pub mod builtins;
pub mod call_stack;
pub mod class;
pub mod environment;
pub mod instance;
pub mod registry;
pub mod value;

pub use builtins::{
    builtin_class, fnv1a_64, install_builtin_classes, is_builtin_class, root_class,
    OVERRIDE_CLASS_NAME, ROOT_CLASS_NAME,
};
pub use call_stack::{CallFrame, CallStack, DeferredCall};
pub use class::{instance_of, Class, MemberGroup, MemberKind, MethodValue};
pub use environment::Environment;
pub use instance::Instance;
pub use registry::{get_global_object, set_global_object};
pub use value::{
    empty_hash, hash_from_pairs, Function, HashKey, NativeMethod, NativeObject, Value, ValueMap,
};

use crate::error::RuntimeError;

/// Result alias used throughout the runtime.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
