//! Statement execution

use crate::ast::*;
use crate::fault::{Fault, FaultKind};
use crate::interpreter::{Flow, FunctionDef, Interpreter, ScopeKind};
use crate::value::{format_int, Value};

/// Largest declarable array length
const MAX_ARRAY_LEN: u64 = 1 << 32;

impl Interpreter {
    /// Execute a statement
    pub(super) fn exec_stmt(&mut self, stmt: &Stmt) -> Result<Flow, Fault> {
        match stmt {
            Stmt::Print(print) => {
                self.exec_print(print)?;
                Ok(Flow::Normal)
            }
            Stmt::If(if_stmt) => self.exec_if(if_stmt),
            Stmt::While(while_stmt) => self.exec_while(while_stmt),
            Stmt::For(for_stmt) => self.exec_for(for_stmt),
            Stmt::FunDecl(decl) => {
                self.functions.insert(
                    &decl.name.name,
                    FunctionDef {
                        params: decl.params.clone(),
                        body: decl.body.clone(),
                    },
                );
                Ok(Flow::Normal)
            }
            Stmt::Return(ret) => {
                let value = self.eval_expr(&ret.value)?;
                Ok(Flow::Return(value, ret.span))
            }
            Stmt::Call(call) => {
                self.call_function(call)?;
                Ok(Flow::Normal)
            }
            Stmt::Assign(assign) => {
                self.exec_assign(assign)?;
                Ok(Flow::Normal)
            }
            Stmt::ArrayDecl(decl) => {
                self.exec_array_decl(decl)?;
                Ok(Flow::Normal)
            }
            Stmt::ElementAssign(assign) => {
                self.exec_element_assign(assign)?;
                Ok(Flow::Normal)
            }
        }
    }

    /// Emit print fragments in order, then exactly one newline
    pub(super) fn exec_print(&mut self, print: &PrintStmt) -> Result<(), Fault> {
        for arg in &print.args {
            match arg {
                PrintArg::Text(text) => self.output.push_str(text),
                PrintArg::Group(expr) | PrintArg::Expr(expr) => {
                    let value = self.eval_expr(expr)?;
                    self.output.push_str(&format_int(value));
                }
                PrintArg::Named(id) => {
                    let value = self.lookup_value(&id.name).cloned().ok_or_else(|| {
                        Fault::new(FaultKind::UndefinedVariable(id.name.clone()), id.span.start)
                    })?;
                    match value {
                        Value::Integer(n) => self.output.push_str(&format_int(n)),
                        Value::Boolean(b) => self.output.push(if b { '1' } else { '0' }),
                        Value::Str(s) => self.output.push_str(&s),
                        Value::Array(_) | Value::Empty => {
                            return Err(Fault::new(
                                FaultKind::Unprintable(id.name.clone()),
                                id.span.start,
                            ))
                        }
                    }
                }
            }
        }

        self.output.push('\n');
        Ok(())
    }

    /// Execute an if statement; the untaken branch is never touched
    fn exec_if(&mut self, if_stmt: &IfStmt) -> Result<Flow, Fault> {
        if self.eval_expr(&if_stmt.cond)? != 0 {
            self.exec_block(&if_stmt.then_block)
        } else if let Some(else_block) = &if_stmt.else_block {
            self.exec_block(else_block)
        } else {
            Ok(Flow::Normal)
        }
    }

    /// Execute a while loop; the body shares the enclosing scope
    fn exec_while(&mut self, while_stmt: &WhileStmt) -> Result<Flow, Fault> {
        while self.eval_expr(&while_stmt.cond)? != 0 {
            match self.exec_block(&while_stmt.body)? {
                Flow::Normal => {}
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Normal)
    }

    /// Execute a for loop
    ///
    /// The init expression is skipped entirely when the counter already exists
    /// in the current table; the update runs after each body pass and may
    /// target a different variable; the counter stays bound after the loop.
    fn exec_for(&mut self, for_stmt: &ForStmt) -> Result<Flow, Fault> {
        if !self.current_has(&for_stmt.var.name) {
            let init = self.eval_expr(&for_stmt.init)?;
            self.current_table()
                .insert(&for_stmt.var.name, Value::Integer(init));
        }

        loop {
            if self.eval_expr(&for_stmt.cond)? == 0 {
                break;
            }

            match self.exec_block(&for_stmt.body)? {
                Flow::Normal => {}
                flow => return Ok(flow),
            }

            let step = self.eval_expr(&for_stmt.step)?;
            self.current_table()
                .insert(&for_stmt.step_var.name, Value::Integer(step));
        }

        Ok(Flow::Normal)
    }

    /// Execute an assignment or typed declaration
    ///
    /// The declared type wins; otherwise the existing binding's stored type
    /// decides how the rhs is read; a fresh untyped binding becomes an
    /// integer, or a string when the rhs only parses as a concatenation.
    fn exec_assign(&mut self, assign: &AssignStmt) -> Result<(), Fault> {
        let name = &assign.name.name;
        let target = assign
            .type_name
            .or_else(|| self.lookup_value(name).and_then(stored_type));

        let value = match target {
            Some(TypeName::Integer) => {
                Value::Integer(self.rhs_numeric(&assign.rhs, &assign.name)?)
            }
            Some(TypeName::Boolean) => {
                // The original's exact test: only the value 1 is true
                Value::Boolean(self.rhs_numeric(&assign.rhs, &assign.name)? == 1)
            }
            Some(TypeName::String) => Value::Str(self.rhs_string(&assign.rhs, &assign.name)?),
            Some(TypeName::Array) => {
                return Err(Fault::new(
                    FaultKind::InvalidAssignment(name.clone()),
                    assign.span.start,
                ))
            }
            None => match &assign.rhs {
                Rhs::Expr(expr) | Rhs::Either { expr, .. } => {
                    Value::Integer(self.eval_expr(expr)?)
                }
                Rhs::Concat(pieces) => Value::Str(self.concat_pieces(pieces)?),
            },
        };

        self.set_value(name, value);
        Ok(())
    }

    /// Read a rhs as an integer expression
    fn rhs_numeric(&mut self, rhs: &Rhs, name: &Ident) -> Result<u64, Fault> {
        match rhs {
            Rhs::Expr(expr) | Rhs::Either { expr, .. } => self.eval_expr(expr),
            Rhs::Concat(_) => Err(Fault::new(
                FaultKind::InvalidAssignment(name.name.clone()),
                name.span.start,
            )),
        }
    }

    /// Read a rhs as a string concatenation
    fn rhs_string(&mut self, rhs: &Rhs, name: &Ident) -> Result<String, Fault> {
        match rhs {
            Rhs::Concat(pieces) | Rhs::Either { pieces, .. } => self.concat_pieces(pieces),
            Rhs::Expr(_) => Err(Fault::new(
                FaultKind::InvalidAssignment(name.name.clone()),
                name.span.start,
            )),
        }
    }

    /// Join concatenation pieces; parenthesized groups render as decimal
    fn concat_pieces(&mut self, pieces: &[StrPart]) -> Result<String, Fault> {
        let mut result = String::new();
        for piece in pieces {
            match piece {
                StrPart::Literal(text) => result.push_str(text),
                StrPart::Group(expr) => {
                    let value = self.eval_expr(expr)?;
                    result.push_str(&format_int(value));
                }
            }
        }
        Ok(result)
    }

    /// Declare a fixed-length array of zeroed integer slots
    ///
    /// A wrapped "negative" size faults instead of attempting the allocation.
    fn exec_array_decl(&mut self, decl: &ArrayDeclStmt) -> Result<(), Fault> {
        if self.current_has(&decl.name.name) {
            return Err(Fault::new(
                FaultKind::Redeclaration(decl.name.name.clone()),
                decl.span.start,
            ));
        }

        let size = self.eval_expr(&decl.size)?;
        if size > MAX_ARRAY_LEN {
            return Err(Fault::new(
                FaultKind::ArrayTooLarge(size),
                decl.span.start,
            ));
        }
        let items = vec![Value::Integer(0); size as usize];
        self.current_table()
            .insert(&decl.name.name, Value::Array(items));
        Ok(())
    }

    /// Assign one array element; the stored value is always an integer,
    /// whatever the slot held before.
    fn exec_element_assign(&mut self, assign: &ElementAssignStmt) -> Result<(), Fault> {
        let index = self.eval_expr(&assign.index)?;
        let value = self.eval_expr(&assign.value)?;

        let scope = self.resolve(&assign.name.name).ok_or_else(|| {
            Fault::new(
                FaultKind::UndefinedVariable(assign.name.name.clone()),
                assign.name.span.start,
            )
        })?;
        let table = match scope {
            ScopeKind::Local => self.frames.last_mut().unwrap(),
            ScopeKind::Global => &mut self.globals,
        };

        // Resolved above, so the entry exists
        let slot = table.lookup_mut(&assign.name.name).unwrap();
        let items = match slot {
            Value::Array(items) => items,
            _ => {
                return Err(Fault::new(
                    FaultKind::NotAnArray(assign.name.name.clone()),
                    assign.name.span.start,
                ))
            }
        };

        let len = items.len();
        match items.get_mut(index as usize) {
            Some(element) => {
                *element = Value::Integer(value);
                Ok(())
            }
            None => Err(Fault::new(
                FaultKind::IndexOutOfBounds { index, len },
                assign.span.start,
            )),
        }
    }
}

/// Map a stored value back to the type name that governs rhs interpretation
fn stored_type(value: &Value) -> Option<TypeName> {
    match value {
        Value::Integer(_) => Some(TypeName::Integer),
        Value::Boolean(_) => Some(TypeName::Boolean),
        Value::Str(_) => Some(TypeName::String),
        Value::Array(_) => Some(TypeName::Array),
        Value::Empty => None,
    }
}
