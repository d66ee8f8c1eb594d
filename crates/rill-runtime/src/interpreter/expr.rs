//! Expression evaluation
//!
//! Every expression evaluates to a raw u64. Arithmetic wraps, division and
//! modulo by zero yield 0, and `&&`/`||` always evaluate both operands before
//! combining: side effects on the right-hand side happen even when the left
//! already decides the answer.

use crate::ast::*;
use crate::fault::{Fault, FaultKind};
use crate::interpreter::{Flow, FunctionDef, Interpreter};
use crate::table::ProbeTable;
use crate::value::Value;

impl Interpreter {
    /// Evaluate an expression to an integer
    pub(super) fn eval_expr(&mut self, expr: &Expr) -> Result<u64, Fault> {
        match expr {
            Expr::Number(n, _) => Ok(*n),
            Expr::Bool(b, _) => Ok(u64::from(*b)),
            Expr::Variable(id) => self.numeric_variable(id),
            Expr::Index(ix) => self.eval_index(ix),
            Expr::Call(call) => self.call_function(call),
            Expr::Unary(unary) => {
                let operand = self.eval_expr(&unary.expr)?;
                Ok(u64::from(operand == 0))
            }
            Expr::Binary(binary) => self.eval_binary(binary),
            Expr::Print(print) => {
                self.exec_print(print)?;
                Ok(0)
            }
        }
    }

    /// Evaluate a binary expression; both operands are always evaluated first
    fn eval_binary(&mut self, binary: &BinaryExpr) -> Result<u64, Fault> {
        let left = self.eval_expr(&binary.left)?;
        let right = self.eval_expr(&binary.right)?;

        Ok(match binary.op {
            BinOp::Add => left.wrapping_add(right),
            BinOp::Sub => left.wrapping_sub(right),
            BinOp::Mul => left.wrapping_mul(right),
            BinOp::Div => {
                if right == 0 {
                    0
                } else {
                    left / right
                }
            }
            BinOp::Mod => {
                if right == 0 {
                    0
                } else {
                    left % right
                }
            }
            BinOp::Eq => u64::from(left == right),
            BinOp::Ne => u64::from(left != right),
            BinOp::Lt => u64::from(left < right),
            BinOp::Le => u64::from(left <= right),
            BinOp::Gt => u64::from(left > right),
            BinOp::Ge => u64::from(left >= right),
            BinOp::And => u64::from(left != 0 && right != 0),
            BinOp::Or => u64::from(left != 0 || right != 0),
        })
    }

    /// Read an array element (always an integer)
    fn eval_index(&mut self, ix: &IndexExpr) -> Result<u64, Fault> {
        let index = self.eval_expr(&ix.index)?;

        let value = self.lookup_value(&ix.name.name).ok_or_else(|| {
            Fault::new(
                FaultKind::UndefinedVariable(ix.name.name.clone()),
                ix.name.span.start,
            )
        })?;

        let items = match value {
            Value::Array(items) => items,
            _ => {
                return Err(Fault::new(
                    FaultKind::NotAnArray(ix.name.name.clone()),
                    ix.name.span.start,
                ))
            }
        };

        let len = items.len();
        match items.get(index as usize) {
            // Elements are only ever integers or booleans from initialization
            Some(element) => Ok(element.as_numeric().unwrap_or(0)),
            None => Err(Fault::new(
                FaultKind::IndexOutOfBounds { index, len },
                ix.span.start,
            )),
        }
    }

    /// Call a function: arguments evaluate in the caller's scope, then the
    /// body runs against a brand-new local table. Caller locals are invisible
    /// inside; globals stay reachable through the scope fallback.
    pub(super) fn call_function(&mut self, call: &CallExpr) -> Result<u64, Fault> {
        let def: FunctionDef = match self.functions.lookup(&call.name.name) {
            Some(def) => def.clone(),
            None => {
                return Err(Fault::new(
                    FaultKind::UnknownFunction(call.name.name.clone()),
                    call.span.start,
                ))
            }
        };

        let mut args = Vec::with_capacity(call.args.len());
        for arg in &call.args {
            args.push(self.eval_expr(arg)?);
        }

        if args.len() != def.params.len() {
            return Err(Fault::new(
                FaultKind::ArityMismatch {
                    name: call.name.name.clone(),
                    expected: def.params.len(),
                    got: args.len(),
                },
                call.span.start,
            ));
        }

        let mut frame = ProbeTable::new();
        for (param, value) in def.params.iter().zip(args) {
            frame.insert(&param.name, Value::Integer(value));
        }

        self.frames.push(frame);
        let flow = self.exec_block(&def.body);
        self.frames.pop();

        match flow? {
            Flow::Return(value, _) => Ok(value),
            // Falling off the closing brace returns 0
            Flow::Normal => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser::Parser;

    fn eval(source: &str) -> u64 {
        let tokens = Lexer::new(source).tokenize().unwrap();
        let mut parser = Parser::new(tokens);
        let expr = parser.parse_expression().unwrap();
        Interpreter::new().eval_expr(&expr).unwrap()
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval("2 + 3 * 4"), 14);
        assert_eq!(eval("(2 + 3) * 4"), 20);
    }

    #[test]
    fn test_wrapping_arithmetic() {
        assert_eq!(eval("0 - 1"), u64::MAX);
        assert_eq!(eval("18446744073709551615 + 1"), 0);
    }

    #[test]
    fn test_division_by_zero_yields_zero() {
        assert_eq!(eval("5 / 0"), 0);
        assert_eq!(eval("5 % 0"), 0);
        assert_eq!(eval("7 / 2"), 3);
        assert_eq!(eval("7 % 2"), 1);
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(eval("1 < 2"), 1);
        assert_eq!(eval("2 < 1"), 0);
        assert_eq!(eval("2 <= 2"), 1);
        assert_eq!(eval("3 > 2"), 1);
        assert_eq!(eval("2 >= 3"), 0);
        assert_eq!(eval("4 == 4"), 1);
        assert_eq!(eval("4 != 4"), 0);
    }

    #[test]
    fn test_logical_operators() {
        assert_eq!(eval("1 && 2"), 1);
        assert_eq!(eval("1 && 0"), 0);
        assert_eq!(eval("0 || 0"), 0);
        assert_eq!(eval("0 || 7"), 1);
    }

    #[test]
    fn test_bang_parity() {
        assert_eq!(eval("!0"), 1);
        assert_eq!(eval("!5"), 0);
        assert_eq!(eval("!!0"), 0);
        assert_eq!(eval("!!!0"), 1);
    }

    #[test]
    fn test_bool_literals_coerce() {
        assert_eq!(eval("true + true"), 2);
        assert_eq!(eval("false"), 0);
    }

    #[test]
    fn test_undefined_variable_faults() {
        let tokens = Lexer::new("nope + 1").tokenize().unwrap();
        let expr = Parser::new(tokens).parse_expression().unwrap();
        let fault = Interpreter::new().eval_expr(&expr).unwrap_err();
        assert_eq!(
            fault.kind,
            FaultKind::UndefinedVariable("nope".to_string())
        );
        assert_eq!(fault.offset, 0);
    }

    #[test]
    fn test_string_in_numeric_context_faults() {
        let mut interp = Interpreter::new();
        interp
            .globals
            .insert("s", Value::Str("hello".to_string()));

        let tokens = Lexer::new("s + 1").tokenize().unwrap();
        let expr = Parser::new(tokens).parse_expression().unwrap();
        let fault = interp.eval_expr(&expr).unwrap_err();
        assert_eq!(fault.kind, FaultKind::NotNumeric("s".to_string()));
    }
}
