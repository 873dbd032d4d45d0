//! Abstract Syntax Tree for Lumo.
//!
//! The runtime stores these nodes (method bodies, call-site expressions,
//! member declarations); building them from source is the parser's job and
//! lives outside this crate.

pub mod expr;
pub mod stmt;

pub use expr::{BinaryOp, Expr, ExprKind, UnaryOp};
pub use stmt::{
    ClassDecl, FieldDecl, FunctionDecl, LetBinding, MethodDecl, Parameter, PropertyDecl, Stmt,
    StmtKind, Visibility,
};
