//! The typed syntax tree handed over by the front end.
//!
//! The tree is immutable input: compilation never rewrites it. Every node
//! already carries the type spelled in the source; inference beyond literal
//! self-description happens during lowering, not here.

use crate::types::ValueType;

/// A whole translation unit: globals and functions in declaration order.
#[derive(Debug, Clone)]
pub struct Module {
    pub globals: Vec<GlobalDecl>,
    pub functions: Vec<FunctionDecl>,
}

/// A file-scope variable declaration, optionally initialized.
#[derive(Debug, Clone)]
pub struct GlobalDecl {
    pub name: String,
    pub ty: ValueType,
    pub init: Option<Expr>,
}

/// A function definition.
#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub name: String,
    pub return_type: ValueType,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub ty: ValueType,
}

/// A statement in a function body.
#[derive(Debug, Clone)]
pub enum Stmt {
    /// An expression evaluated for its effect; a non-`void` result is
    /// discarded.
    Expr(Expr),
    /// `return` with an optional value.
    Return(Option<Expr>),
    /// A local variable declaration, optionally initialized.
    Local {
        name: String,
        ty: ValueType,
        init: Option<Expr>,
    },
    /// Inline-assembly escape: the word is emitted verbatim.
    Asm(u64),
}

/// An expression.
#[derive(Debug, Clone)]
pub enum Expr {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Char(char),
    Str(String),
    /// A name: a local, an argument, a global, or a function reference.
    Ident(String),
    Assign {
        target: String,
        value: Box<Expr>,
    },
    Call {
        name: String,
        args: Vec<Expr>,
    },
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Unary {
        op: UnOp,
        operand: Box<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Plus,
    Neg,
}
