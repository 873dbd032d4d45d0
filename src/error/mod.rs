//! Runtime fault types.

use crate::span::Span;
use thiserror::Error;

/// Runtime errors.
///
/// Every variant is a programmer error raised at the point of detection and
/// propagated to the embedding host; the runtime never recovers locally.
/// External failures (a missing file, a closed socket) are not faults and
/// travel back as ordinary absent results instead.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Wrong number of arguments: expected {expected}, got {got} at {span}")]
    WrongArity {
        expected: usize,
        got: usize,
        span: Span,
    },

    #[error("Wrong argument type for '{operation}': parameter {position} expects {expected}, found {found} at {span}")]
    ParamType {
        operation: String,
        position: usize,
        expected: String,
        found: String,
        span: Span,
    },

    #[error("Undefined method '{method}' on {type_name} at {span}")]
    NoSuchMethod {
        type_name: String,
        method: String,
        span: Span,
    },

    #[error("Callback expects {expected} arguments, got {got} at {span}")]
    CallbackArity {
        expected: usize,
        got: usize,
        span: Span,
    },

    #[error("{message} at {span}")]
    General { message: String, span: Span },
}

impl RuntimeError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self::General {
            message: message.into(),
            span,
        }
    }

    pub fn wrong_arity(expected: usize, got: usize, span: Span) -> Self {
        Self::WrongArity {
            expected,
            got,
            span,
        }
    }

    pub fn param_type(
        operation: impl Into<String>,
        position: usize,
        expected: impl Into<String>,
        found: impl Into<String>,
        span: Span,
    ) -> Self {
        Self::ParamType {
            operation: operation.into(),
            position,
            expected: expected.into(),
            found: found.into(),
            span,
        }
    }

    pub fn no_such_method(
        type_name: impl Into<String>,
        method: impl Into<String>,
        span: Span,
    ) -> Self {
        Self::NoSuchMethod {
            type_name: type_name.into(),
            method: method.into(),
            span,
        }
    }

    pub fn callback_arity(expected: usize, got: usize, span: Span) -> Self {
        Self::CallbackArity {
            expected,
            got,
            span,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::WrongArity { span, .. } => *span,
            Self::ParamType { span, .. } => *span,
            Self::NoSuchMethod { span, .. } => *span,
            Self::CallbackArity { span, .. } => *span,
            Self::General { span, .. } => *span,
        }
    }
}
