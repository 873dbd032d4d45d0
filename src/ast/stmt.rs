//! Statement AST nodes.

use crate::ast::expr::Expr;
use crate::span::Span;

/// A statement in the AST.
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Statement variants.
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// Expression statement: expr;
    Expression(Expr),

    /// Variable declaration: let x = expr, y = expr;
    Let { bindings: Vec<LetBinding> },

    /// Block: { statements }
    Block(Vec<Stmt>),

    /// If statement: if (cond) { ... } else { ... }
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },

    /// While loop: while (cond) { ... }
    While { condition: Expr, body: Box<Stmt> },

    /// Return statement: return expr;
    Return(Option<Expr>),

    /// Deferred call: defer expr; runs when the enclosing frame unwinds
    Defer(Expr),

    /// Function declaration
    Function(FunctionDecl),

    /// Class declaration
    Class(ClassDecl),
}

/// One name bound by a `let` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct LetBinding {
    pub name: String,
    pub initializer: Option<Expr>,
}

/// Function declaration: fn name(params) { body }
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    pub params: Vec<Parameter>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// Function parameter, with an optional default value.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub default_value: Option<Expr>,
    pub span: Span,
}

/// Class declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: String,
    pub superclass: Option<String>,
    pub fields: Vec<FieldDecl>,
    pub methods: Vec<MethodDecl>,
    pub properties: Vec<PropertyDecl>,
    pub span: Span,
}

/// Field declaration inside a class body. A single declaration can
/// introduce several names, all sharing one visibility.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub visibility: Visibility,
    pub bindings: Vec<LetBinding>,
    pub span: Span,
}

/// Method declaration inside a class body.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub visibility: Visibility,
    pub name: String,
    pub params: Vec<Parameter>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// Property declaration inside a class body, with optional getter and
/// setter bodies.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDecl {
    pub visibility: Visibility,
    pub name: String,
    pub getter: Option<Vec<Stmt>>,
    pub setter: Option<Vec<Stmt>>,
    pub span: Span,
}

/// Access level of a class member. Members declared without a keyword
/// stay `Unset` in the AST; the runtime treats them as private.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Unset,
    Public,
    Protected,
    Private,
}

impl Visibility {
    /// The level the runtime enforces. Unannotated members are private.
    pub fn effective(self) -> Visibility {
        match self {
            Visibility::Unset => Visibility::Private,
            other => other,
        }
    }
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Visibility::Unset => write!(f, "unset"),
            Visibility::Public => write!(f, "public"),
            Visibility::Protected => write!(f, "protected"),
            Visibility::Private => write!(f, "private"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_visibility_is_private() {
        assert_eq!(Visibility::default(), Visibility::Unset);
        assert_eq!(Visibility::Unset.effective(), Visibility::Private);
        assert_eq!(Visibility::Private.effective(), Visibility::Private);
        assert_eq!(Visibility::Public.effective(), Visibility::Public);
        assert_eq!(Visibility::Protected.effective(), Visibility::Protected);
    }
}
