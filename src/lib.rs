//! Lumo core runtime: the object model and execution environments of the
//! Lumo scripting language.
//!
//! This crate holds what the evaluator and every native capability family
//! share: runtime values, classes with single inheritance and visibility,
//! concurrent lexical scopes, call frames with deferred calls, and the
//! process-wide object registry. Lexing, parsing, and statement evaluation
//! live in the embedding host.
//!
//! ```
//! use lumo_core::runtime::{Environment, Value};
//!
//! let root = Environment::new();
//! let child = Environment::with_enclosing(root.clone());
//!
//! // Unbound names assigned through a child land in the root scope
//! child.assign("greeting", Value::String("hello".to_string()));
//! assert_eq!(root.get_local("greeting"), Some(Value::String("hello".to_string())));
//! ```

// Allow some clippy lints that are stylistic and not critical
#![allow(clippy::result_large_err)]

pub mod ast;
pub mod error;
pub mod runtime;
pub mod span;
