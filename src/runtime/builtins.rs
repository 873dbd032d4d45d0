//! Builtin classes and the root of every hierarchy.
//!
//! The builtin set is fixed: the root class `object`, which terminates
//! every superclass chain and carries the universal native methods, and the
//! inert annotation marker `Override`. Builtin class names always shadow
//! local bindings during scope lookup.

use lazy_static::lazy_static;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::ast::stmt::Visibility;
use crate::error::RuntimeError;
use crate::runtime::class::{instance_of, Class, MethodValue};
use crate::runtime::instance::Instance;
use crate::runtime::value::{NativeMethod, Value};
use crate::runtime::RuntimeResult;
use crate::span::Span;

/// Name of the root class.
pub const ROOT_CLASS_NAME: &str = "object";

/// Name of the annotation marker class.
pub const OVERRIDE_CLASS_NAME: &str = "Override";

const FNV_OFFSET_BASIS: u64 = 14695981039346656037;
const FNV_PRIME: u64 = 1099511628211;

lazy_static! {
    static ref ROOT_CLASS: Arc<Class> = Arc::new(build_root_class());

    /// The builtin class set, keyed by name. Populated once, before any
    /// lookup can observe it.
    static ref BUILTIN_CLASSES: RwLock<HashMap<String, Arc<Class>>> = {
        let root = Arc::clone(&ROOT_CLASS);
        let marker = Arc::new(build_override_class(Arc::clone(&root)));
        let mut classes = HashMap::new();
        classes.insert(root.name.clone(), root);
        classes.insert(marker.name.clone(), marker);
        RwLock::new(classes)
    };
}

/// Force the builtin class set into existence. Hosts call this once at
/// startup; every accessor below also self-installs, so a missed call only
/// moves the work to the first lookup.
pub fn install_builtin_classes() {
    lazy_static::initialize(&BUILTIN_CLASSES);
}

/// The root class every superclass chain terminates at.
pub fn root_class() -> Arc<Class> {
    Arc::clone(&ROOT_CLASS)
}

/// Look up a builtin class by name.
pub fn builtin_class(name: &str) -> Option<Arc<Class>> {
    BUILTIN_CLASSES.read().unwrap().get(name).cloned()
}

/// Whether `name` names a builtin class.
pub fn is_builtin_class(name: &str) -> bool {
    BUILTIN_CLASSES.read().unwrap().contains_key(name)
}

/// 64-bit FNV-1a over the code points of `input`.
pub fn fnv1a_64(input: &str) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for ch in input.chars() {
        hash ^= ch as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

fn build_root_class() -> Class {
    let mut methods = HashMap::new();
    add_native(&mut methods, "toString", Some(0), native_to_string);
    add_native(&mut methods, "instanceOf", Some(1), native_instance_of);
    add_native(&mut methods, "is_a", Some(1), native_instance_of);
    add_native(&mut methods, "classOf", Some(0), native_class_of);
    add_native(&mut methods, "hashCode", Some(0), native_hash_code);
    Class {
        name: ROOT_CLASS_NAME.to_string(),
        superclass: None,
        members: Vec::new(),
        methods,
        properties: HashMap::new(),
    }
}

fn build_override_class(root: Arc<Class>) -> Class {
    Class {
        name: OVERRIDE_CLASS_NAME.to_string(),
        superclass: Some(root),
        members: Vec::new(),
        methods: HashMap::new(),
        properties: HashMap::new(),
    }
}

fn add_native(
    methods: &mut HashMap<String, MethodValue>,
    name: &str,
    arity: Option<usize>,
    func: fn(Option<Arc<Instance>>, Vec<Value>, Span) -> RuntimeResult<Value>,
) {
    methods.insert(
        name.to_string(),
        MethodValue::Native(Arc::new(NativeMethod::new(
            name,
            arity,
            Visibility::Public,
            func,
        ))),
    );
}

fn native_to_string(
    receiver: Option<Arc<Instance>>,
    _args: Vec<Value>,
    _span: Span,
) -> RuntimeResult<Value> {
    let text = match receiver {
        Some(instance) => format!("<{} instance>", instance.class.name),
        None => String::new(),
    };
    Ok(Value::String(text))
}

fn native_instance_of(
    receiver: Option<Arc<Instance>>,
    args: Vec<Value>,
    span: Span,
) -> RuntimeResult<Value> {
    let class_name = match &args[0] {
        Value::String(name) => name.clone(),
        Value::Class(class) => class.name.clone(),
        other => {
            return Err(RuntimeError::new(
                format!(
                    "instanceOf expects a class name or class, got {}",
                    other.type_name()
                ),
                span,
            ))
        }
    };
    Ok(Value::Bool(instance_of(&class_name, receiver.as_ref())))
}

fn native_class_of(
    receiver: Option<Arc<Instance>>,
    _args: Vec<Value>,
    _span: Span,
) -> RuntimeResult<Value> {
    let name = match receiver {
        Some(instance) => instance.class.name.clone(),
        None => String::new(),
    };
    Ok(Value::String(name))
}

fn native_hash_code(
    receiver: Option<Arc<Instance>>,
    _args: Vec<Value>,
    _span: Span,
) -> RuntimeResult<Value> {
    let hash = match receiver {
        Some(instance) => fnv1a_64(&instance.class.name) as i64,
        None => 0,
    };
    Ok(Value::Int(hash))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_class(name: &str) -> Arc<Class> {
        Arc::new(
            Class::new(
                name.to_string(),
                Some(root_class()),
                vec![],
                HashMap::new(),
                HashMap::new(),
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_fnv1a_known_vectors() {
        assert_eq!(fnv1a_64(""), 14695981039346656037);
        assert_eq!(fnv1a_64("object"), 10231808476453998586);
        assert_eq!(fnv1a_64("Override"), 8403308602241462269);
    }

    #[test]
    fn test_fnv1a_folds_code_points_not_bytes() {
        // U+00E9 is two bytes in UTF-8 but folds as one code point
        assert_eq!(fnv1a_64("é"), 12638336734137078692);
    }

    #[test]
    fn test_fnv1a_distinct_names_differ() {
        assert_eq!(fnv1a_64("A"), 12638222384927744748);
        assert_eq!(fnv1a_64("B"), 12638225683462629381);
        assert_ne!(fnv1a_64("A"), fnv1a_64("B"));
    }

    #[test]
    fn test_builtin_set_contents() {
        install_builtin_classes();
        assert!(is_builtin_class(ROOT_CLASS_NAME));
        assert!(is_builtin_class(OVERRIDE_CLASS_NAME));
        assert!(!is_builtin_class("Widget"));

        let root = builtin_class(ROOT_CLASS_NAME).unwrap();
        assert!(Arc::ptr_eq(&root, &root_class()));
        assert!(root.superclass.is_none());

        let marker = builtin_class(OVERRIDE_CLASS_NAME).unwrap();
        assert!(Arc::ptr_eq(marker.superclass.as_ref().unwrap(), &root));
        assert!(marker.methods.is_empty());
        // The marker still reaches the universal methods through its chain
        assert!(marker.find_method("toString").is_some());
    }

    #[test]
    fn test_root_class_methods() {
        let root = root_class();
        for name in ["toString", "instanceOf", "is_a", "classOf", "hashCode"] {
            let method = root.find_method(name).unwrap();
            assert_eq!(method.visibility(), Visibility::Public);
        }
        assert!(root.find_method("missing").is_none());
    }

    #[test]
    fn test_to_string_builtin() {
        let instance = Instance::new(user_class("Point"));
        let got = Value::Instance(instance)
            .invoke("toString", vec![], Span::default())
            .unwrap();
        assert_eq!(got, Value::String("<Point instance>".to_string()));

        let method = root_class().find_method("toString").unwrap();
        match method {
            MethodValue::Native(native) => {
                let got = native.invoke(None, vec![], Span::default()).unwrap();
                assert_eq!(got, Value::String(String::new()));
            }
            other => panic!("expected native method, got {:?}", other),
        }
    }

    #[test]
    fn test_bare_class_level_call() {
        // Invoking through a class value runs the native with no receiver.
        let root = Value::Class(root_class());
        let got = root.invoke("toString", vec![], Span::default()).unwrap();
        assert_eq!(got, Value::String(String::new()));

        let got = root.invoke("hashCode", vec![], Span::default()).unwrap();
        assert_eq!(got, Value::Int(0));

        let err = root
            .invoke("missing", vec![], Span::default())
            .unwrap_err();
        match err {
            RuntimeError::NoSuchMethod { type_name, method, .. } => {
                assert_eq!(type_name, ROOT_CLASS_NAME);
                assert_eq!(method, "missing");
            }
            other => panic!("expected NoSuchMethod, got {:?}", other),
        }
    }

    #[test]
    fn test_class_of_builtin() {
        let instance = Instance::new(user_class("Point"));
        let got = Value::Instance(instance)
            .invoke("classOf", vec![], Span::default())
            .unwrap();
        assert_eq!(got, Value::String("Point".to_string()));
    }

    #[test]
    fn test_hash_code_builtin() {
        let class = user_class("Point");
        let a = Value::Instance(Instance::new(Arc::clone(&class)));
        let b = Value::Instance(Instance::new(class));

        let ha = a.invoke("hashCode", vec![], Span::default()).unwrap();
        let hb = b.invoke("hashCode", vec![], Span::default()).unwrap();
        assert_eq!(ha, hb);
        assert_eq!(ha, Value::Int(fnv1a_64("Point") as i64));

        let other = Value::Instance(Instance::new(user_class("Line")));
        let ho = other.invoke("hashCode", vec![], Span::default()).unwrap();
        assert_ne!(ha, ho);
    }

    #[test]
    fn test_instance_of_builtin() {
        let a = user_class("A");
        let b = Arc::new(
            Class::new(
                "B".to_string(),
                Some(Arc::clone(&a)),
                vec![],
                HashMap::new(),
                HashMap::new(),
            )
            .unwrap(),
        );
        let instance = Value::Instance(Instance::new(b));

        // By name
        let got = instance
            .invoke("instanceOf", vec![Value::String("A".to_string())], Span::default())
            .unwrap();
        assert_eq!(got, Value::Bool(true));

        // By class value, through the alias, up to the root
        let got = instance
            .invoke("is_a", vec![Value::Class(root_class())], Span::default())
            .unwrap();
        assert_eq!(got, Value::Bool(true));

        let got = instance
            .invoke("instanceOf", vec![Value::String("Z".to_string())], Span::default())
            .unwrap();
        assert_eq!(got, Value::Bool(false));
    }

    #[test]
    fn test_instance_of_rejects_other_kinds() {
        let instance = Value::Instance(Instance::new(user_class("A")));
        let err = instance.invoke("instanceOf", vec![Value::Int(3)], Span::default());
        match err {
            Err(RuntimeError::General { message, .. }) => {
                assert!(message.contains("instanceOf"));
                assert!(message.contains("int"));
            }
            other => panic!("expected generic fault, got {:?}", other),
        }
    }

    #[test]
    fn test_instance_of_without_receiver() {
        let method = root_class().find_method("instanceOf").unwrap();
        match method {
            MethodValue::Native(native) => {
                let got = native
                    .invoke(None, vec![Value::String("A".to_string())], Span::default())
                    .unwrap();
                assert_eq!(got, Value::Bool(false));
            }
            other => panic!("expected native method, got {:?}", other),
        }
    }

    #[test]
    fn test_builtin_arity_enforced() {
        let instance = Value::Instance(Instance::new(user_class("Point")));
        let err = instance.invoke("toString", vec![Value::Null], Span::default());
        match err {
            Err(RuntimeError::WrongArity { expected, got, .. }) => {
                assert_eq!(expected, 0);
                assert_eq!(got, 1);
            }
            other => panic!("expected arity fault, got {:?}", other),
        }
    }

    #[test]
    fn test_hash_code_without_receiver() {
        let method = root_class().find_method("hashCode").unwrap();
        match method {
            MethodValue::Native(native) => {
                let got = native.invoke(None, vec![], Span::default()).unwrap();
                assert_eq!(got, Value::Int(0));
            }
            other => panic!("expected native method, got {:?}", other),
        }
    }
}
