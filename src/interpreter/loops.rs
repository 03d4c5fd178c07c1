//! Loop statement execution (`while`, `do-while`, `for`).
//!
//! Adds `impl Interpreter` methods for the three loop forms. `break` and
//! `continue` are consumed via `LoopBodyResult` so the loop driver can react
//! without inspecting [`ControlFlow`] itself. A `return` inside the body
//! unwinds the loop and propagates to the enclosing function.

use crate::interpreter::engine::{ControlFlow, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::parser::ast::{Expr, Stmt};

/// Result returned by [`Interpreter::execute_loop_body`] to signal how the body ended.
pub(crate) enum LoopBodyResult {
    /// Body completed normally or via `continue`; the loop should iterate again.
    Continue,
    /// `break` was encountered; the loop should exit cleanly.
    Break,
    /// `return` was triggered; the loop unwinds with this flow.
    Exit(ControlFlow),
}

impl Interpreter {
    pub(crate) fn execute_loop_body(&mut self, body: &Stmt) -> Result<LoopBodyResult, RuntimeError> {
        Ok(match self.execute_statement(body)? {
            ControlFlow::Normal | ControlFlow::Continue => LoopBodyResult::Continue,
            ControlFlow::Break => LoopBodyResult::Break,
            flow @ ControlFlow::Return(_) => LoopBodyResult::Exit(flow),
        })
    }

    /// Executes a `while (test) body` loop.
    pub(crate) fn execute_while(&mut self, test: &Expr, body: &Stmt) -> Result<ControlFlow, RuntimeError> {
        while self.evaluate_expression(test)?.is_truthy() {
            match self.execute_loop_body(body)? {
                LoopBodyResult::Continue => {}
                LoopBodyResult::Break => break,
                LoopBodyResult::Exit(flow) => return Ok(flow),
            }
        }
        Ok(ControlFlow::Normal)
    }

    /// Executes a `do body while (test)` loop; the body runs at least once.
    pub(crate) fn execute_do_while(&mut self, body: &Stmt, test: &Expr) -> Result<ControlFlow, RuntimeError> {
        loop {
            match self.execute_loop_body(body)? {
                LoopBodyResult::Continue => {}
                LoopBodyResult::Break => break,
                LoopBodyResult::Exit(flow) => return Ok(flow),
            }
            if !self.evaluate_expression(test)?.is_truthy() {
                break;
            }
        }
        Ok(ControlFlow::Normal)
    }

    /// Executes a `for (init; test; update) body` loop.
    ///
    /// A missing test is treated as `true`.
    pub(crate) fn execute_for(
        &mut self,
        init: Option<&Stmt>,
        test: Option<&Expr>,
        update: Option<&Expr>,
        body: &Stmt,
    ) -> Result<ControlFlow, RuntimeError> {
        if let Some(init) = init {
            self.execute_statement(init)?;
        }

        loop {
            if let Some(test) = test {
                if !self.evaluate_expression(test)?.is_truthy() {
                    break;
                }
            }

            match self.execute_loop_body(body)? {
                LoopBodyResult::Continue => {}
                LoopBodyResult::Break => break,
                LoopBodyResult::Exit(flow) => return Ok(flow),
            }

            if let Some(update) = update {
                self.evaluate_expression(update)?;
            }
        }
        Ok(ControlFlow::Normal)
    }
}
