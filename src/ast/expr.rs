//! Expression AST nodes.

use crate::ast::stmt::{Parameter, Stmt};
use crate::span::Span;

/// An expression in the AST.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// All expression variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Integer literal: 42
    IntLiteral(i64),
    /// Float literal: 3.14
    FloatLiteral(f64),
    /// String literal: "hello"
    StringLiteral(String),
    /// Boolean literal: true, false
    BoolLiteral(bool),
    /// Null literal
    Null,

    /// Variable reference: foo
    Variable(String),

    /// Binary operation: a + b
    Binary {
        left: Box<Expr>,
        operator: BinaryOp,
        right: Box<Expr>,
    },

    /// Unary operation: -x, !x
    Unary {
        operator: UnaryOp,
        operand: Box<Expr>,
    },

    /// Function or method call: foo(a, b), obj.m(a)
    Call {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
    },

    /// Member access: obj.field
    Member { object: Box<Expr>, name: String },

    /// Array index: arr[index]
    Index { object: Box<Expr>, index: Box<Expr> },

    /// this reference
    This,

    /// Object instantiation: new ClassName(args)
    New {
        class_name: String,
        arguments: Vec<Expr>,
    },

    /// Array literal: [1, 2, 3]
    Array(Vec<Expr>),

    /// Hash literal: { "key" => "value", ... }
    Hash(Vec<(Expr, Expr)>),

    /// Assignment expression: x = 5
    Assign { target: Box<Expr>, value: Box<Expr> },

    /// Lambda/anonymous function: |x, y| { stmt; }
    Lambda {
        params: Vec<Parameter>,
        body: Vec<Stmt>,
    },
}

impl ExprKind {
    /// The callee name of a call expression, when the callee is a plain
    /// variable or member access. Frames use this for diagnostics.
    pub fn callee_name(&self) -> Option<&str> {
        match self {
            ExprKind::Call { callee, .. } => match &callee.kind {
                ExprKind::Variable(name) => Some(name),
                ExprKind::Member { name, .. } => Some(name),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
}

impl std::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinaryOp::Add => write!(f, "+"),
            BinaryOp::Subtract => write!(f, "-"),
            BinaryOp::Multiply => write!(f, "*"),
            BinaryOp::Divide => write!(f, "/"),
            BinaryOp::Modulo => write!(f, "%"),
            BinaryOp::Equal => write!(f, "=="),
            BinaryOp::NotEqual => write!(f, "!="),
            BinaryOp::Less => write!(f, "<"),
            BinaryOp::LessEqual => write!(f, "<="),
            BinaryOp::Greater => write!(f, ">"),
            BinaryOp::GreaterEqual => write!(f, ">="),
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
    Not,
}

impl std::fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnaryOp::Negate => write!(f, "-"),
            UnaryOp::Not => write!(f, "!"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callee_name_of_call() {
        let span = Span::default();
        let call = ExprKind::Call {
            callee: Box::new(Expr::new(ExprKind::Variable("connect".to_string()), span)),
            arguments: vec![],
        };
        assert_eq!(call.callee_name(), Some("connect"));

        let method_call = ExprKind::Call {
            callee: Box::new(Expr::new(
                ExprKind::Member {
                    object: Box::new(Expr::new(ExprKind::This, span)),
                    name: "close".to_string(),
                },
                span,
            )),
            arguments: vec![],
        };
        assert_eq!(method_call.callee_name(), Some("close"));

        assert_eq!(ExprKind::Null.callee_name(), None);
    }
}
