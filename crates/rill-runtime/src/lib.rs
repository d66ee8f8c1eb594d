//! Rill Runtime - Core language implementation
//!
//! A direct-execution interpreter for the Rill scripting language:
//! - Lexical analysis and parsing into an AST
//! - Tree-walking evaluation over wrapping 64-bit unsigned integers
//! - Two-level variable scoping backed by open-addressed probe tables
//! - A single terminal fault kind reported with byte offsets

/// Rill runtime version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Public API modules
pub mod ast;
pub mod fault;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod runtime;
pub mod span;
pub mod table;
pub mod token;
pub mod value;

// Re-export commonly used types
pub use fault::{Fault, FaultKind};
pub use interpreter::{Interpreter, ScopeKind};
pub use lexer::Lexer;
pub use parser::Parser;
pub use runtime::{Rill, RunOutcome};
pub use span::Span;
pub use table::ProbeTable;
pub use token::{Token, TokenKind};
pub use value::Value;
