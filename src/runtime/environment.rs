//! Lexical scopes.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, Weak};

use crate::runtime::builtins;
use crate::runtime::call_stack::{CallFrame, CallStack};
use crate::runtime::value::Value;

/// A lexical scope: a binding table, an optional parent, and the call stack
/// shared by the whole scope tree of one root evaluation.
///
/// Every node carries its own lock. Chain walks acquire child before parent
/// and keep the child guard held until the walk returns, so two threads can
/// never close a wait cycle over the same chain.
#[derive(Debug)]
pub struct Environment {
    values: RwLock<HashMap<String, Value>>,
    enclosing: Option<Arc<Environment>>,
    call_stack: Arc<CallStack>,
}

impl Environment {
    /// Create a root scope. It owns a brand-new call stack seeded with one
    /// frame whose scope is the root itself.
    pub fn new() -> Arc<Environment> {
        Arc::new_cyclic(|weak: &Weak<Environment>| {
            let call_stack = CallStack::new();
            call_stack.push(Arc::new(CallFrame::new(weak.clone())));
            Environment {
                values: RwLock::new(HashMap::new()),
                enclosing: None,
                call_stack: Arc::new(call_stack),
            }
        })
    }

    /// Create a child scope sharing the parent's call stack.
    pub fn with_enclosing(enclosing: Arc<Environment>) -> Arc<Environment> {
        let call_stack = Arc::clone(&enclosing.call_stack);
        Arc::new(Environment {
            values: RwLock::new(HashMap::new()),
            enclosing: Some(enclosing),
            call_stack,
        })
    }

    /// Look up a name. Builtin class names always win over local bindings;
    /// the builtin set is consulted before this scope's lock is taken, so no
    /// caller ever holds a scope lock and the builtin lock at once.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(class) = builtins::builtin_class(name) {
            return Some(Value::Class(class));
        }
        self.lookup(name)
    }

    fn lookup(&self, name: &str) -> Option<Value> {
        let values = self.values.read().unwrap();
        if let Some(value) = values.get(name) {
            return Some(value.clone());
        }
        match &self.enclosing {
            Some(parent) => parent.lookup(name),
            None => None,
        }
    }

    /// Create or overwrite a binding in this scope only.
    pub fn define(&self, name: String, value: Value) {
        self.values.write().unwrap().insert(name, value);
    }

    /// Overwrite the nearest scope that owns `name`. When no scope along the
    /// chain owns it, the root creates the binding, so assignment always
    /// lands somewhere.
    pub fn assign(&self, name: &str, value: Value) {
        let mut values = self.values.write().unwrap();
        if values.contains_key(name) {
            values.insert(name.to_string(), value);
            return;
        }
        match &self.enclosing {
            Some(parent) => parent.assign(name, value),
            None => {
                values.insert(name.to_string(), value);
            }
        }
    }

    /// Whether this scope's own table binds `name`.
    pub fn contains_local(&self, name: &str) -> bool {
        self.values.read().unwrap().contains_key(name)
    }

    /// Read a binding from this scope's own table, without walking the chain
    /// or consulting the builtin set.
    pub fn get_local(&self, name: &str) -> Option<Value> {
        self.values.read().unwrap().get(name).cloned()
    }

    /// Names bound in this scope's own table, in no particular order.
    pub fn var_names(&self) -> Vec<String> {
        self.values.read().unwrap().keys().cloned().collect()
    }

    pub fn enclosing(&self) -> Option<&Arc<Environment>> {
        self.enclosing.as_ref()
    }

    pub fn call_stack(&self) -> &Arc<CallStack> {
        &self.call_stack
    }

    pub fn current_frame(&self) -> Option<Arc<CallFrame>> {
        self.call_stack.current_frame()
    }

    pub fn caller_frame(&self) -> Option<Arc<CallFrame>> {
        self.call_stack.caller_frame()
    }
}
