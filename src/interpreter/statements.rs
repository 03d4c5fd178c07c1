//! Statement execution implementation
//!
//! This module handles the execution of all supported statement types:
//!
//! - Variable declarations (the names are already bound on function entry;
//!   executing the declaration only stores initializers)
//! - Control flow (`if`/`else`); loops live in [`loops`](super::loops)
//! - `return`, `break`, `continue` and `throw`
//! - Blocks and expression statements
//!
//! # Implementation
//!
//! All statement execution methods are implemented as `pub(crate)` methods
//! on the [`Interpreter`] struct. Each returns a [`ControlFlow`] describing how
//! the statement finished so enclosing constructs can react.

use crate::interpreter::engine::{ControlFlow, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::parser::ast::*;

impl Interpreter {
    /// Execute statements in order, stopping at the first abrupt completion
    pub(crate) fn execute_block(&mut self, body: &[Stmt]) -> Result<ControlFlow, RuntimeError> {
        for stmt in body {
            let flow = self.execute_statement(stmt)?;
            if flow != ControlFlow::Normal {
                return Ok(flow);
            }
        }
        Ok(ControlFlow::Normal)
    }

    /// Execute a single statement
    pub(crate) fn execute_statement(&mut self, stmt: &Stmt) -> Result<ControlFlow, RuntimeError> {
        self.current_location = stmt.location();

        match stmt {
            Stmt::VariableDeclaration { declarations, .. } => {
                self.execute_var_decl(declarations)?;
                Ok(ControlFlow::Normal)
            }

            // Bound when the enclosing function was entered
            Stmt::FunctionDeclaration(_) => Ok(ControlFlow::Normal),

            Stmt::If {
                test,
                consequent,
                alternate,
                ..
            } => {
                if self.evaluate_expression(test)?.is_truthy() {
                    self.execute_statement(consequent)
                } else if let Some(alternate) = alternate {
                    self.execute_statement(alternate)
                } else {
                    Ok(ControlFlow::Normal)
                }
            }

            Stmt::Block { body, .. } => self.execute_block(body),

            Stmt::Expression { expression, .. } => {
                self.evaluate_expression(expression)?;
                Ok(ControlFlow::Normal)
            }

            Stmt::Return { argument, .. } => {
                let value = match argument {
                    Some(argument) => self.evaluate_expression(argument)?,
                    None => Default::default(),
                };
                Ok(ControlFlow::Return(value))
            }

            Stmt::While { test, body, .. } => self.execute_while(test, body),

            Stmt::DoWhile { body, test, .. } => self.execute_do_while(body, test),

            Stmt::For {
                init,
                test,
                update,
                body,
                ..
            } => self.execute_for(init.as_deref(), test.as_ref(), update.as_ref(), body),

            Stmt::Break { .. } => Ok(ControlFlow::Break),

            Stmt::Continue { .. } => Ok(ControlFlow::Continue),

            Stmt::Throw { argument, location } => {
                let value = self.evaluate_expression(argument)?;
                Err(RuntimeError::Thrown {
                    value,
                    location: *location,
                })
            }

            Stmt::Empty { .. } => Ok(ControlFlow::Normal),
        }
    }

    pub(crate) fn execute_var_decl(
        &mut self,
        declarations: &[VariableDeclarator],
    ) -> Result<(), RuntimeError> {
        for declarator in declarations {
            match &declarator.init {
                Some(init) => {
                    let value = self.evaluate_expression(init)?;
                    self.scope.borrow_mut().define(&declarator.id, value);
                }
                None => self.scope.borrow_mut().declare(&declarator.id),
            }
        }
        Ok(())
    }
}
