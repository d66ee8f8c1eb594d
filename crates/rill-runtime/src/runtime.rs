//! Rill runtime API for embedding
//!
//! Drives the full pipeline: lex, parse, interpret. The printed output is
//! always returned, even when the program faults partway through.

use crate::ast::Program;
use crate::fault::Fault;
use crate::interpreter::Interpreter;
use crate::lexer::Lexer;
use crate::parser::Parser;

/// The result of running a program: everything it printed, and how it ended
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    /// Output printed before completion or fault
    pub output: String,
    /// Ok on normal completion, or the terminal fault
    pub result: Result<(), Fault>,
}

/// Rill runtime instance
///
/// # Examples
///
/// ```
/// use rill_runtime::Rill;
///
/// let mut runtime = Rill::new();
/// let outcome = runtime.run("print(2 + 3 * 4)");
/// assert_eq!(outcome.output, "14\n");
/// assert!(outcome.result.is_ok());
/// ```
pub struct Rill {
    interpreter: Interpreter,
}

impl Rill {
    /// Create a new runtime instance
    pub fn new() -> Self {
        Self {
            interpreter: Interpreter::new(),
        }
    }

    /// Run a program
    ///
    /// Globals and function definitions persist across calls on the same
    /// instance.
    pub fn run(&mut self, source: &str) -> RunOutcome {
        let result = self.run_inner(source);
        RunOutcome {
            output: self.interpreter.take_output(),
            result,
        }
    }

    fn run_inner(&mut self, source: &str) -> Result<(), Fault> {
        let program = Self::parse(source)?;
        self.interpreter.run(&program)
    }

    /// Parse a program without executing it
    pub fn parse(source: &str) -> Result<Program, Fault> {
        let tokens = Lexer::new(source).tokenize()?;
        Parser::new(tokens).parse()
    }
}

impl Default for Rill {
    fn default() -> Self {
        Self::new()
    }
}
