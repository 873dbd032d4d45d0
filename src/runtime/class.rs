//! Classes, member resolution and the type test.

use std::collections::HashMap;
use std::sync::Arc;

use crate::ast::stmt::{ClassDecl, PropertyDecl, Visibility};
use crate::error::RuntimeError;
use crate::runtime::instance::Instance;
use crate::runtime::value::{Function, NativeMethod};
use crate::runtime::RuntimeResult;
use crate::span::Span;

/// One `let` declaration in a class body: several names sharing one
/// visibility.
#[derive(Debug, Clone)]
pub struct MemberGroup {
    pub visibility: Visibility,
    pub names: Vec<String>,
}

/// A resolved method: a user-defined closure or a host-native method.
#[derive(Debug, Clone)]
pub enum MethodValue {
    Closure(Arc<Function>),
    Native(Arc<NativeMethod>),
}

impl MethodValue {
    pub fn name(&self) -> &str {
        match self {
            MethodValue::Closure(func) => &func.name,
            MethodValue::Native(native) => &native.name,
        }
    }

    pub fn visibility(&self) -> Visibility {
        match self {
            MethodValue::Closure(func) => func.visibility,
            MethodValue::Native(native) => native.visibility,
        }
    }
}

/// The member namespace a visibility query targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Field,
    Method,
    Property,
    Indexer,
}

/// A class definition.
///
/// Classes are immutable once built; every lookup is a lock-free read, so a
/// single `Arc<Class>` serves all evaluation threads.
#[derive(Debug)]
pub struct Class {
    pub name: String,
    pub superclass: Option<Arc<Class>>,
    pub members: Vec<MemberGroup>,
    pub methods: HashMap<String, MethodValue>,
    pub properties: HashMap<String, PropertyDecl>,
}

impl Class {
    /// Build a class, rejecting a superclass chain that already carries the
    /// new class's name.
    pub fn new(
        name: String,
        superclass: Option<Arc<Class>>,
        members: Vec<MemberGroup>,
        methods: HashMap<String, MethodValue>,
        properties: HashMap<String, PropertyDecl>,
    ) -> RuntimeResult<Class> {
        Self::check_no_cycle(&name, superclass.as_ref(), Span::default())?;
        Ok(Class {
            name,
            superclass,
            members,
            methods,
            properties,
        })
    }

    /// Build a class from its declaration, a resolved superclass, and the
    /// method values the evaluator closed over its scope.
    pub fn from_decl(
        decl: &ClassDecl,
        superclass: Option<Arc<Class>>,
        methods: HashMap<String, MethodValue>,
    ) -> RuntimeResult<Class> {
        Self::check_no_cycle(&decl.name, superclass.as_ref(), decl.span)?;
        let members = decl
            .fields
            .iter()
            .map(|field| MemberGroup {
                visibility: field.visibility,
                names: field.bindings.iter().map(|b| b.name.clone()).collect(),
            })
            .collect();
        let properties = decl
            .properties
            .iter()
            .map(|prop| (prop.name.clone(), prop.clone()))
            .collect();
        Ok(Class {
            name: decl.name.clone(),
            superclass,
            members,
            methods,
            properties,
        })
    }

    fn check_no_cycle(
        name: &str,
        superclass: Option<&Arc<Class>>,
        span: Span,
    ) -> RuntimeResult<()> {
        if let Some(parent) = superclass {
            if parent.has_ancestor(name) {
                return Err(RuntimeError::new(
                    format!("Class '{}' cannot inherit from itself", name),
                    span,
                ));
            }
        }
        Ok(())
    }

    /// Find a method, walking up the superclass chain.
    /// The nearest declaration wins.
    pub fn find_method(&self, name: &str) -> Option<MethodValue> {
        if let Some(method) = self.methods.get(name) {
            return Some(method.clone());
        }
        if let Some(superclass) = &self.superclass {
            return superclass.find_method(name);
        }
        None
    }

    /// Find a property declaration, walking up the superclass chain.
    pub fn find_property(&self, name: &str) -> Option<&PropertyDecl> {
        if let Some(prop) = self.properties.get(name) {
            return Some(prop);
        }
        if let Some(superclass) = &self.superclass {
            return superclass.find_property(name);
        }
        None
    }

    /// The access level enforced for a member.
    ///
    /// Fields answer from the declaring class's own groups; the superclass
    /// chain is not consulted. Methods answer through `find_method`.
    /// Properties and indexers are declared-but-inert and carry no level of
    /// their own. Unannotated members collapse to private.
    pub fn modifier_level(&self, name: &str, kind: MemberKind) -> Visibility {
        let declared = match kind {
            MemberKind::Field => self
                .members
                .iter()
                .find(|group| group.names.iter().any(|n| n == name))
                .map(|group| group.visibility)
                .unwrap_or(Visibility::Unset),
            MemberKind::Method => self
                .find_method(name)
                .map(|method| method.visibility())
                .unwrap_or(Visibility::Unset),
            MemberKind::Property | MemberKind::Indexer => Visibility::Unset,
        };
        declared.effective()
    }

    /// Whether this class or any ancestor carries `name`.
    pub fn has_ancestor(&self, name: &str) -> bool {
        if self.name == name {
            return true;
        }
        if let Some(superclass) = &self.superclass {
            return superclass.has_ancestor(name);
        }
        false
    }
}

/// The single authoritative type test.
///
/// False for an absent instance; otherwise true iff the instance's class or
/// any ancestor matches by name.
pub fn instance_of(class_name: &str, instance: Option<&Arc<Instance>>) -> bool {
    match instance {
        Some(instance) => instance.class.has_ancestor(class_name),
        None => false,
    }
}
