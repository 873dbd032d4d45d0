//! Runtime values.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock};

use indexmap::IndexMap;

use crate::ast::expr::Expr;
use crate::ast::stmt::{FunctionDecl, MethodDecl, Parameter, Stmt, Visibility};
use crate::error::RuntimeError;
use crate::runtime::class::{Class, MethodValue};
use crate::runtime::environment::Environment;
use crate::runtime::instance::Instance;
use crate::runtime::RuntimeResult;
use crate::span::Span;

/// Ordered map used by hash values.
pub type ValueMap = IndexMap<HashKey, Value, ahash::RandomState>;

/// A hashable key type for use in hash values.
/// This wraps the primitive value kinds that can be used as hash keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HashKey {
    Int(i64),
    String(String),
    Bool(bool),
    Null,
}

impl Hash for HashKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            HashKey::Int(n) => n.hash(state),
            HashKey::String(s) => s.hash(state),
            HashKey::Bool(b) => b.hash(state),
            HashKey::Null => {}
        }
    }
}

impl HashKey {
    /// Convert a Value to a HashKey if possible.
    pub fn from_value(value: &Value) -> Option<HashKey> {
        match value {
            Value::Int(n) => Some(HashKey::Int(*n)),
            Value::String(s) => Some(HashKey::String(s.clone())),
            Value::Bool(b) => Some(HashKey::Bool(*b)),
            Value::Null => Some(HashKey::Null),
            // Floats are not hashable due to NaN != NaN issues
            _ => None,
        }
    }

    /// Convert back to a Value.
    pub fn to_value(&self) -> Value {
        match self {
            HashKey::Int(n) => Value::Int(*n),
            HashKey::String(s) => Value::String(s.clone()),
            HashKey::Bool(b) => Value::Bool(*b),
            HashKey::Null => Value::Null,
        }
    }
}

impl fmt::Display for HashKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashKey::Int(n) => write!(f, "{}", n),
            HashKey::String(s) => write!(f, "{}", s),
            HashKey::Bool(b) => write!(f, "{}", b),
            HashKey::Null => write!(f, "null"),
        }
    }
}

/// Helper function to create a hash Value from string key-value pairs.
pub fn hash_from_pairs<I>(pairs: I) -> Value
where
    I: IntoIterator<Item = (String, Value)>,
{
    let map: ValueMap = pairs
        .into_iter()
        .map(|(k, v)| (HashKey::String(k), v))
        .collect();
    Value::Hash(Arc::new(RwLock::new(map)))
}

/// Helper function to create an empty hash Value.
pub fn empty_hash() -> Value {
    Value::Hash(Arc::new(RwLock::new(ValueMap::default())))
}

/// A runtime value in Lumo.
///
/// Shared interiors sit behind `Arc` + `RwLock` so values can move freely
/// between evaluation threads.
#[derive(Debug, Clone)]
pub enum Value {
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// String value
    String(String),
    /// Boolean value
    Bool(bool),
    /// Null value
    Null,
    /// Array value
    Array(Arc<RwLock<Vec<Value>>>),
    /// Hash/Map value (ordered, O(1) lookup)
    Hash(Arc<RwLock<ValueMap>>),
    /// Function value (closure)
    Function(Arc<Function>),
    /// Host-native method
    NativeMethod(Arc<NativeMethod>),
    /// Class definition
    Class(Arc<Class>),
    /// Class instance
    Instance(Arc<Instance>),
    /// Native capability collaborator (socket, cursor, database handle, ...)
    Object(Arc<dyn NativeObject>),
}

/// Contract implemented by native capability collaborators.
///
/// The runtime owns no capability code; collaborators are reached only
/// through this trait and the global registry.
pub trait NativeObject: Send + Sync {
    /// Human-readable description used by `Display`.
    fn describe(&self) -> String;

    /// The type tag this collaborator reports.
    fn type_name(&self) -> String;

    /// Invoke a named method with already-evaluated arguments.
    fn invoke(&self, method: &str, args: Vec<Value>, span: Span) -> RuntimeResult<Value>;
}

impl fmt::Debug for dyn NativeObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeObject({})", self.type_name())
    }
}

impl Value {
    pub fn type_name(&self) -> String {
        match self {
            Value::Int(_) => "int".to_string(),
            Value::Float(_) => "float".to_string(),
            Value::String(_) => "string".to_string(),
            Value::Bool(_) => "bool".to_string(),
            Value::Null => "null".to_string(),
            Value::Array(_) => "array".to_string(),
            Value::Hash(_) => "hash".to_string(),
            Value::Function(_) => "Function".to_string(),
            Value::NativeMethod(_) => "Function".to_string(),
            Value::Class(_) => "Class".to_string(),
            Value::Instance(i) => i.class.name.clone(),
            Value::Object(o) => o.type_name(),
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Null => false,
            Value::Int(0) => false,
            Value::String(s) if s.is_empty() => false,
            Value::Array(arr) if arr.read().unwrap().is_empty() => false,
            Value::Hash(hash) if hash.read().unwrap().is_empty() => false,
            _ => true,
        }
    }

    /// Check if this value can be used as a hash key (must be comparable).
    /// Note: Floats are excluded because NaN != NaN breaks hash map invariants.
    pub fn is_hashable(&self) -> bool {
        matches!(
            self,
            Value::Int(_) | Value::String(_) | Value::Bool(_) | Value::Null
        )
    }

    /// Convert this value to a HashKey if possible.
    pub fn to_hash_key(&self) -> Option<HashKey> {
        HashKey::from_value(self)
    }

    /// Invoke a named method on this value with already-evaluated arguments.
    ///
    /// Capability collaborators handle their own dispatch; instances resolve
    /// through their class chain and execute native methods. Methods that
    /// resolve to user-defined closures belong to the evaluator and fault
    /// here. Every other value kind has no methods of its own.
    pub fn invoke(&self, method: &str, args: Vec<Value>, span: Span) -> RuntimeResult<Value> {
        match self {
            Value::Object(object) => object.invoke(method, args, span),
            Value::Instance(instance) => Instance::invoke(instance, method, args, span),
            // Bare class-level call: natives run with no receiver bound.
            Value::Class(class) => match class.find_method(method) {
                Some(MethodValue::Native(native)) => native.invoke(None, args, span),
                Some(MethodValue::Closure(_)) => Err(RuntimeError::new(
                    format!("Cannot invoke script method '{}' natively", method),
                    span,
                )),
                None => Err(RuntimeError::no_such_method(
                    class.name.clone(),
                    method,
                    span,
                )),
            },
            _ => Err(RuntimeError::no_such_method(self.type_name(), method, span)),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) => (*a as f64) == *b,
            (Value::Float(a), Value::Int(b)) => *a == (*b as f64),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Array(a), Value::Array(b)) => {
                // Structural equality for arrays
                let a_ref = a.read().unwrap();
                let b_ref = b.read().unwrap();
                if a_ref.len() != b_ref.len() {
                    return false;
                }
                a_ref.iter().zip(b_ref.iter()).all(|(x, y)| x == y)
            }
            (Value::Hash(a), Value::Hash(b)) => {
                // Structural equality for hashes
                let a_ref = a.read().unwrap();
                let b_ref = b.read().unwrap();
                if a_ref.len() != b_ref.len() {
                    return false;
                }
                a_ref.iter().all(|(k, v_a)| b_ref.get(k) == Some(v_a))
            }
            // Classes, instances and collaborators compare by identity
            (Value::Class(a), Value::Class(b)) => Arc::ptr_eq(a, b),
            (Value::Instance(a), Value::Instance(b)) => Arc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Null => write!(f, "null"),
            Value::Array(arr) => {
                write!(f, "[")?;
                let arr = arr.read().unwrap();
                for (i, val) in arr.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", val)?;
                }
                write!(f, "]")
            }
            Value::Hash(hash) => {
                write!(f, "{{")?;
                let hash = hash.read().unwrap();
                for (i, (key, val)) in hash.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} => {}", key.to_value(), val)?;
                }
                write!(f, "}}")
            }
            Value::Function(func) => write!(f, "<fn {}>", func.name),
            Value::NativeMethod(func) => write!(f, "<native fn {}>", func.name),
            Value::Class(class) => write!(f, "<class {}>", class.name),
            Value::Instance(inst) => write!(f, "<{} instance>", inst.class.name),
            Value::Object(object) => write!(f, "{}", object.describe()),
        }
    }
}

/// A user-defined function.
#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub params: Vec<Parameter>,
    pub body: Vec<Stmt>,
    pub closure: Arc<Environment>,
    pub is_method: bool,
    pub visibility: Visibility,
    pub span: Option<Span>,
}

impl Default for Function {
    fn default() -> Self {
        Self {
            name: String::new(),
            params: Vec::new(),
            body: Vec::new(),
            closure: Environment::new(),
            is_method: false,
            visibility: Visibility::Unset,
            span: None,
        }
    }
}

impl Function {
    pub fn from_decl(decl: &FunctionDecl, closure: Arc<Environment>) -> Self {
        Self {
            name: decl.name.clone(),
            params: decl.params.clone(),
            body: decl.body.clone(),
            closure,
            is_method: false,
            visibility: Visibility::Unset,
            span: Some(decl.span),
        }
    }

    pub fn from_method(decl: &MethodDecl, closure: Arc<Environment>) -> Self {
        Self {
            name: decl.name.clone(),
            params: decl.params.clone(),
            body: decl.body.clone(),
            closure,
            is_method: true,
            visibility: decl.visibility,
            span: Some(decl.span),
        }
    }

    /// The number of required parameters (params without defaults).
    pub fn arity(&self) -> usize {
        self.params
            .iter()
            .filter(|p| p.default_value.is_none())
            .count()
    }

    /// Full arity including optional parameters.
    pub fn full_arity(&self) -> usize {
        self.params.len()
    }

    /// Check if a parameter at index has a default value.
    pub fn param_has_default(&self, index: usize) -> bool {
        self.params
            .get(index)
            .map(|p| p.default_value.is_some())
            .unwrap_or(false)
    }

    /// Get the default value expression for a parameter at index.
    pub fn param_default_value(&self, index: usize) -> Option<&Expr> {
        self.params
            .get(index)
            .and_then(|p| p.default_value.as_ref())
    }

    /// Check that this function can be called back with `supplied` arguments.
    /// Native operations apply this to user-supplied callbacks before use.
    pub fn check_callback_arity(&self, supplied: usize, span: Span) -> RuntimeResult<()> {
        if supplied < self.arity() || supplied > self.full_arity() {
            return Err(RuntimeError::callback_arity(self.arity(), supplied, span));
        }
        Ok(())
    }
}

type NativeFn = dyn Fn(Option<Arc<Instance>>, Vec<Value>, Span) -> RuntimeResult<Value>
    + Send
    + Sync;

/// A host-native method, invokable on an instance or without a receiver.
#[derive(Clone)]
pub struct NativeMethod {
    pub name: String,
    pub arity: Option<usize>, // None means variadic
    pub visibility: Visibility,
    pub func: Arc<NativeFn>,
}

impl NativeMethod {
    pub fn new<F>(name: impl Into<String>, arity: Option<usize>, visibility: Visibility, func: F) -> Self
    where
        F: Fn(Option<Arc<Instance>>, Vec<Value>, Span) -> RuntimeResult<Value>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.into(),
            arity,
            visibility,
            func: Arc::new(func),
        }
    }

    /// Run the method, enforcing the declared arity first.
    pub fn invoke(
        &self,
        receiver: Option<Arc<Instance>>,
        args: Vec<Value>,
        span: Span,
    ) -> RuntimeResult<Value> {
        if let Some(expected) = self.arity {
            if args.len() != expected {
                return Err(RuntimeError::wrong_arity(expected, args.len(), span));
            }
        }
        (self.func)(receiver, args, span)
    }
}

impl fmt::Debug for NativeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeMethod({})", self.name)
    }
}
