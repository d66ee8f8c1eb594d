//! AST interpreter (tree-walking)
//!
//! Direct AST evaluation with probe-table variable storage. Supports:
//! - Expression evaluation over wrapping 64-bit unsigned integers
//! - Statement execution (assignments, declarations, control flow)
//! - Function calls with one fresh local table per active call
//! - Two-level scope resolution: current local table, then globals
//!
//! The interpreter owns its output buffer so that a program which faults
//! mid-run still yields everything it printed before the fault.

mod expr;
mod stmt;

use crate::ast::{Block, Ident, Program};
use crate::fault::{Fault, FaultKind};
use crate::span::Span;
use crate::table::ProbeTable;
use crate::value::Value;

/// Where a variable name resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// The local table of the innermost active function call
    Local,
    /// The program-lifetime global table
    Global,
}

/// Control flow signal for propagating `return` out of nested blocks
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Flow {
    Normal,
    Return(u64, Span),
}

/// A registered function: parameter names (arity) plus the parsed body
#[derive(Debug, Clone)]
pub(super) struct FunctionDef {
    pub(super) params: Vec<Ident>,
    pub(super) body: Block,
}

/// Interpreter state
pub struct Interpreter {
    /// Global variables (program lifetime)
    pub(super) globals: ProbeTable<Value>,
    /// Local tables, one per active function call
    pub(super) frames: Vec<ProbeTable<Value>>,
    /// Registered functions (redeclaration overwrites)
    pub(super) functions: ProbeTable<FunctionDef>,
    /// Accumulated print output
    pub(super) output: String,
}

impl Interpreter {
    /// Create a new interpreter
    pub fn new() -> Self {
        Self {
            globals: ProbeTable::new(),
            frames: Vec::new(),
            functions: ProbeTable::new(),
            output: String::new(),
        }
    }

    /// Execute a program's top-level statements
    ///
    /// A `return` that reaches the top level is a fault; there is no function
    /// to return from.
    pub fn run(&mut self, program: &Program) -> Result<(), Fault> {
        for stmt in &program.stmts {
            if let Flow::Return(_, span) = self.exec_stmt(stmt)? {
                return Err(Fault::new(FaultKind::ReturnOutsideFunction, span.start));
            }
        }
        Ok(())
    }

    /// Take the output printed so far, leaving the buffer empty
    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }

    /// Run a block's statements, stopping early on a `return`
    pub(super) fn exec_block(&mut self, block: &Block) -> Result<Flow, Fault> {
        for stmt in &block.stmts {
            match self.exec_stmt(stmt)? {
                Flow::Normal => {}
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Normal)
    }

    // === Scope resolution ===

    /// Resolve which table holds `name`: the innermost local table first,
    /// then globals.
    pub(super) fn resolve(&self, name: &str) -> Option<ScopeKind> {
        if let Some(frame) = self.frames.last() {
            if frame.lookup(name).is_some() {
                return Some(ScopeKind::Local);
            }
        }
        if self.globals.lookup(name).is_some() {
            return Some(ScopeKind::Global);
        }
        None
    }

    /// Read a variable's stored value
    pub(super) fn lookup_value(&self, name: &str) -> Option<&Value> {
        match self.resolve(name)? {
            ScopeKind::Local => self.frames.last().unwrap().lookup(name),
            ScopeKind::Global => self.globals.lookup(name),
        }
    }

    /// Write a variable: overwrite where it already lives (local first, then
    /// global), otherwise create it in the current table.
    pub(super) fn set_value(&mut self, name: &str, value: Value) {
        match self.resolve(name) {
            Some(ScopeKind::Local) => self.frames.last_mut().unwrap().insert(name, value),
            Some(ScopeKind::Global) => self.globals.insert(name, value),
            None => self.current_table().insert(name, value),
        }
    }

    /// The table new bindings land in: the innermost call's local table, or
    /// globals at top level.
    pub(super) fn current_table(&mut self) -> &mut ProbeTable<Value> {
        self.frames.last_mut().unwrap_or(&mut self.globals)
    }

    /// Check whether `name` is bound in the current table only (no global
    /// fallback); the `for` init-skip quirk and array redeclaration both key
    /// off this.
    pub(super) fn current_has(&self, name: &str) -> bool {
        self.frames
            .last()
            .unwrap_or(&self.globals)
            .lookup(name)
            .is_some()
    }

    /// Read a variable coerced to an integer, faulting at the identifier's
    /// span when it is missing or non-numeric.
    pub(super) fn numeric_variable(&self, id: &Ident) -> Result<u64, Fault> {
        let value = self.lookup_value(&id.name).ok_or_else(|| {
            Fault::new(FaultKind::UndefinedVariable(id.name.clone()), id.span.start)
        })?;
        value
            .as_numeric()
            .ok_or_else(|| Fault::new(FaultKind::NotNumeric(id.name.clone()), id.span.start))
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
