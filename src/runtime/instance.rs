//! Object instances.

use std::sync::Arc;

use crate::error::RuntimeError;
use crate::runtime::class::{Class, MethodValue};
use crate::runtime::environment::Environment;
use crate::runtime::value::Value;
use crate::runtime::RuntimeResult;
use crate::span::Span;

/// An instance of a class.
///
/// The field scope is parentless and owned by this instance alone, so every
/// instance carries its own freshly seeded call stack alongside its fields.
#[derive(Debug)]
pub struct Instance {
    pub class: Arc<Class>,
    pub fields: Arc<Environment>,
}

impl Instance {
    /// Create an instance with every member declared along the class chain
    /// pre-defined as null. Ancestors are walked first so a redeclaration in
    /// a subclass lands last.
    pub fn new(class: Arc<Class>) -> Arc<Instance> {
        let fields = Environment::new();
        Self::define_members(&class, &fields);
        Arc::new(Instance { class, fields })
    }

    fn define_members(class: &Class, fields: &Arc<Environment>) {
        if let Some(superclass) = &class.superclass {
            Self::define_members(superclass, fields);
        }
        for group in &class.members {
            for name in &group.names {
                fields.define(name.clone(), Value::Null);
            }
        }
    }

    /// Read a field.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.fields.get(name)
    }

    /// Write a field.
    pub fn set(&self, name: &str, value: Value) {
        self.fields.define(name.to_string(), value);
    }

    /// Resolve a method through the class chain.
    pub fn find_method(&self, name: &str) -> Option<MethodValue> {
        self.class.find_method(name)
    }

    /// Native dispatch used by `Value::invoke`.
    ///
    /// Runs host-native methods with the receiver bound. Methods backed by
    /// user-defined closures execute only in the evaluator, which resolves
    /// them with `find_method` instead of coming through here.
    pub fn invoke(
        receiver: &Arc<Instance>,
        method: &str,
        args: Vec<Value>,
        span: Span,
    ) -> RuntimeResult<Value> {
        match receiver.class.find_method(method) {
            Some(MethodValue::Native(native)) => {
                native.invoke(Some(Arc::clone(receiver)), args, span)
            }
            Some(MethodValue::Closure(_)) => Err(RuntimeError::new(
                format!("Cannot invoke script method '{}' natively", method),
                span,
            )),
            None => Err(RuntimeError::no_such_method(
                receiver.class.name.clone(),
                method,
                span,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::stmt::Visibility;
    use crate::runtime::class::MemberGroup;
    use crate::runtime::value::{Function, NativeMethod};
    use std::collections::HashMap;

    fn class_with_members(
        name: &str,
        superclass: Option<Arc<Class>>,
        names: &[&str],
    ) -> Arc<Class> {
        let members = if names.is_empty() {
            vec![]
        } else {
            vec![MemberGroup {
                visibility: Visibility::Unset,
                names: names.iter().map(|n| n.to_string()).collect(),
            }]
        };
        Arc::new(
            Class::new(name.to_string(), superclass, members, HashMap::new(), HashMap::new())
                .unwrap(),
        )
    }

    #[test]
    fn test_members_predefined_null() {
        let base = class_with_members("Base", None, &["id", "tag"]);
        let derived = class_with_members("Derived", Some(base), &["tag", "extra"]);

        let instance = Instance::new(derived);
        assert_eq!(instance.get("id"), Some(Value::Null));
        assert_eq!(instance.get("tag"), Some(Value::Null));
        assert_eq!(instance.get("extra"), Some(Value::Null));
        assert_eq!(instance.get("unknown"), None);
    }

    #[test]
    fn test_field_set_and_get() {
        let class = class_with_members("Point", None, &["x"]);
        let instance = Instance::new(class);

        instance.set("x", Value::Int(4));
        assert_eq!(instance.get("x"), Some(Value::Int(4)));
    }

    #[test]
    fn test_each_instance_owns_its_fields() {
        let class = class_with_members("Point", None, &["x"]);
        let a = Instance::new(Arc::clone(&class));
        let b = Instance::new(class);

        a.set("x", Value::Int(1));
        assert_eq!(a.get("x"), Some(Value::Int(1)));
        assert_eq!(b.get("x"), Some(Value::Null));
    }

    #[test]
    fn test_field_scope_has_seeded_stack() {
        let class = class_with_members("Point", None, &[]);
        let instance = Instance::new(class);
        assert_eq!(instance.fields.call_stack().len(), 1);
    }

    #[test]
    fn test_invoke_native_method() {
        let mut methods = HashMap::new();
        methods.insert(
            "ping".to_string(),
            MethodValue::Native(Arc::new(NativeMethod::new(
                "ping",
                Some(0),
                Visibility::Public,
                |receiver, _, _| {
                    let name = receiver.map(|r| r.class.name.clone()).unwrap_or_default();
                    Ok(Value::String(name))
                },
            ))),
        );
        let class = Arc::new(
            Class::new("Echo".to_string(), None, vec![], methods, HashMap::new()).unwrap(),
        );
        let instance = Instance::new(class);

        let got = Instance::invoke(&instance, "ping", vec![], Span::default()).unwrap();
        assert_eq!(got, Value::String("Echo".to_string()));
    }

    #[test]
    fn test_invoke_script_method_needs_evaluator() {
        let func = Arc::new(Function {
            name: "update".to_string(),
            ..Function::default()
        });
        let mut methods = HashMap::new();
        methods.insert("update".to_string(), MethodValue::Closure(func));
        let class = Arc::new(
            Class::new("Widget".to_string(), None, vec![], methods, HashMap::new()).unwrap(),
        );
        let instance = Instance::new(class);

        let err = Instance::invoke(&instance, "update", vec![], Span::default());
        match err {
            Err(RuntimeError::General { message, .. }) => {
                assert!(message.contains("update"));
            }
            other => panic!("expected generic fault, got {:?}", other),
        }
    }

    #[test]
    fn test_invoke_unknown_method_faults() {
        let class = class_with_members("Point", None, &[]);
        let instance = Instance::new(class);

        let err = Instance::invoke(&instance, "fly", vec![], Span::default());
        match err {
            Err(RuntimeError::NoSuchMethod { type_name, method, .. }) => {
                assert_eq!(type_name, "Point");
                assert_eq!(method, "fly");
            }
            other => panic!("expected method fault, got {:?}", other),
        }
    }
}
