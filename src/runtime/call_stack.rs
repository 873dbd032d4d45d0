//! Call frames and deferred calls.

use std::sync::{Arc, Mutex, RwLock, Weak};

use crate::ast::expr::Expr;
use crate::runtime::environment::Environment;
use crate::runtime::value::Value;
use crate::runtime::RuntimeResult;
use crate::span::Span;

/// A call registered by `defer`, with its arguments already evaluated.
#[derive(Debug, Clone)]
pub struct DeferredCall {
    pub callee: Value,
    pub args: Vec<Value>,
    pub span: Span,
}

/// One entry in the call chain.
///
/// The scope reference is weak: the scope owns the stack which owns the
/// frame, and the evaluator keeps the scope alive for as long as its frame
/// is pushed.
#[derive(Debug)]
pub struct CallFrame {
    scope: Weak<Environment>,
    call_site: RwLock<Option<Expr>>,
    defers: Mutex<Vec<DeferredCall>>,
}

impl CallFrame {
    pub fn new(scope: Weak<Environment>) -> Self {
        Self {
            scope,
            call_site: RwLock::new(None),
            defers: Mutex::new(Vec::new()),
        }
    }

    /// The frame's scope, if it is still alive.
    pub fn scope(&self) -> Option<Arc<Environment>> {
        self.scope.upgrade()
    }

    /// Record the call expression this frame is currently executing.
    pub fn set_call_site(&self, expr: Option<Expr>) {
        *self.call_site.write().unwrap() = expr;
    }

    pub fn call_site(&self) -> Option<Expr> {
        self.call_site.read().unwrap().clone()
    }

    /// Register a deferred call on this frame.
    pub fn push_defer(&self, callee: Value, args: Vec<Value>, span: Span) {
        self.defers
            .lock()
            .unwrap()
            .push(DeferredCall { callee, args, span });
    }

    /// Drain the registered defers in run order, last registered first.
    pub fn take_defers(&self) -> Vec<DeferredCall> {
        let mut defers = self.defers.lock().unwrap();
        let mut drained: Vec<DeferredCall> = defers.drain(..).collect();
        drained.reverse();
        drained
    }

    /// Run every registered defer through `call`, last registered first.
    /// A failing defer does not stop the rest; the first fault is kept and
    /// returned once the whole list has run.
    pub fn run_defers<F>(&self, mut call: F) -> RuntimeResult<()>
    where
        F: FnMut(&Value, Vec<Value>, Span) -> RuntimeResult<Value>,
    {
        let mut first_err = None;
        for deferred in self.take_defers() {
            if let Err(err) = call(&deferred.callee, deferred.args, deferred.span) {
                if first_err.is_none() {
                    first_err = Some(err);
                }
            }
        }
        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// The call chain shared by every scope of one root evaluation.
///
/// Frames are pushed and popped by the evaluator around each call.
#[derive(Debug, Default)]
pub struct CallStack {
    frames: RwLock<Vec<Arc<CallFrame>>>,
}

impl CallStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, frame: Arc<CallFrame>) {
        self.frames.write().unwrap().push(frame);
    }

    pub fn pop(&self) -> Option<Arc<CallFrame>> {
        self.frames.write().unwrap().pop()
    }

    /// The frame currently executing.
    pub fn current_frame(&self) -> Option<Arc<CallFrame>> {
        self.frames.read().unwrap().last().cloned()
    }

    /// The frame that called the current one.
    pub fn caller_frame(&self) -> Option<Arc<CallFrame>> {
        let frames = self.frames.read().unwrap();
        if frames.len() < 2 {
            return None;
        }
        frames.get(frames.len() - 2).cloned()
    }

    pub fn len(&self) -> usize {
        self.frames.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.read().unwrap().is_empty()
    }
}
