//! Abstract syntax tree definitions
//!
//! All nodes are serde-serializable so the CLI can dump a parsed program as
//! JSON.

use crate::span::Span;
use serde::{Deserialize, Serialize};

/// A complete program: a sequence of top-level statements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub stmts: Vec<Stmt>,
}

/// An identifier with its source location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

/// Declared type in a typed assignment or array declaration
///
/// Type names are ordinary identifiers in the token stream; the parser maps
/// them here when they appear in declaration position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeName {
    Integer,
    Boolean,
    String,
    Array,
}

impl TypeName {
    /// Map an identifier lexeme to a type name, if it is one
    pub fn from_lexeme(s: &str) -> Option<TypeName> {
        match s {
            "integer" => Some(TypeName::Integer),
            "boolean" => Some(TypeName::Boolean),
            "string" => Some(TypeName::String),
            "array" => Some(TypeName::Array),
            _ => None,
        }
    }
}

/// Binary operators, loosest-binding first in the precedence ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

/// An expression; always integer-valued when evaluated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Integer literal
    Number(u64, Span),
    /// `true` or `false`
    Bool(bool, Span),
    /// Variable read
    Variable(Ident),
    /// Array element read: `name[index]`
    Index(IndexExpr),
    /// Function call: `name(args)`
    Call(CallExpr),
    /// Logical negation (an odd-length `!` run; even runs vanish at parse time)
    Unary(UnaryExpr),
    /// Binary operation
    Binary(BinaryExpr),
    /// `print(...)` in expression position; prints, then yields 0
    Print(PrintStmt),
}

impl Expr {
    /// Source location of this expression
    pub fn span(&self) -> Span {
        match self {
            Expr::Number(_, span) | Expr::Bool(_, span) => *span,
            Expr::Variable(id) => id.span,
            Expr::Index(ix) => ix.span,
            Expr::Call(call) => call.span,
            Expr::Unary(unary) => unary.span,
            Expr::Binary(binary) => binary.span,
            Expr::Print(print) => print.span,
        }
    }
}

/// Array element read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexExpr {
    pub name: Ident,
    pub index: Box<Expr>,
    pub span: Span,
}

/// Function call (expression or statement position)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallExpr {
    pub name: Ident,
    pub args: Vec<Expr>,
    pub span: Span,
}

/// Logical negation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryExpr {
    pub expr: Box<Expr>,
    pub span: Span,
}

/// Binary operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryExpr {
    pub op: BinOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub span: Span,
}

/// A statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    Print(PrintStmt),
    If(IfStmt),
    While(WhileStmt),
    For(ForStmt),
    FunDecl(FunDecl),
    Return(ReturnStmt),
    /// Function call whose result is discarded
    Call(CallExpr),
    /// `TYPE? name = rhs`
    Assign(AssignStmt),
    /// `TYPE? name[size]`
    ArrayDecl(ArrayDeclStmt),
    /// `name[index] = expr`; always stores an integer
    ElementAssign(ElementAssignStmt),
}

/// A braced statement sequence; does NOT open a variable scope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

/// `print(frag + frag + ...)`, emitting fragments then one newline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintStmt {
    pub args: Vec<PrintArg>,
    pub span: Span,
}

/// One print fragment; `+` between fragments is concatenation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PrintArg {
    /// String literal, emitted verbatim
    Text(String),
    /// Parenthesized expression, emitted as decimal
    Group(Expr),
    /// Variable, rendered according to its stored type
    Named(Ident),
    /// Call or element fragment, or a trailing full expression, as decimal
    Expr(Expr),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfStmt {
    pub cond: Expr,
    pub then_block: Block,
    pub else_block: Option<Block>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhileStmt {
    pub cond: Expr,
    pub body: Block,
    pub span: Span,
}

/// `for (integer x = init; cond; y = step) { body }`
///
/// The init expression runs only when `x` is absent from the current scope,
/// and the update may target a different variable than the counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForStmt {
    pub var: Ident,
    pub init: Expr,
    pub cond: Expr,
    pub step_var: Ident,
    pub step: Expr,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunDecl {
    pub name: Ident,
    pub params: Vec<Ident>,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnStmt {
    pub value: Expr,
    pub span: Span,
}

/// Assignment or typed declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignStmt {
    /// Declared type, when written `integer x = ...` style
    pub type_name: Option<TypeName>,
    pub name: Ident,
    pub rhs: Rhs,
    pub span: Span,
}

/// Right-hand side of an assignment
///
/// The same token sequence can be a valid expression and a valid string
/// concatenation (`(1) + (2)` is 3 or "12" depending on the target's type),
/// so the parser keeps both readings when they consume the same tokens and
/// the executor picks one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Rhs {
    Expr(Expr),
    Concat(Vec<StrPart>),
    Either { expr: Expr, pieces: Vec<StrPart> },
}

/// One piece of a string concatenation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StrPart {
    Literal(String),
    /// Parenthesized expression, rendered as decimal
    Group(Expr),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayDeclStmt {
    pub name: Ident,
    pub size: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementAssignStmt {
    pub name: Ident,
    pub index: Expr,
    pub value: Expr,
    pub span: Span,
}
