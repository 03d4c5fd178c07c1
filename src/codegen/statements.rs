//! Statement rendering
//!
//! Every statement starts on its own line at the current nesting level and
//! ends with a newline. Block bodies open on the line of their header; a
//! non-block body goes on the next line, one level deeper.

use super::Printer;
use crate::parser::ast::*;

impl Printer {
    pub(crate) fn statement(&mut self, stmt: &Stmt) {
        self.write_indent();
        self.statement_inline(stmt);
        self.newline();
    }

    /// Render `stmt` at the current position without leading indentation or
    /// the trailing newline
    fn statement_inline(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::VariableDeclaration { declarations, .. } => {
                self.var_declaration(declarations);
                self.write(";");
            }

            Stmt::FunctionDeclaration(function) => self.function(function),

            Stmt::If {
                test,
                consequent,
                alternate,
                ..
            } => self.if_statement(test, consequent, alternate.as_deref()),

            Stmt::Block { body, .. } => self.block(body),

            Stmt::Expression { expression, .. } => {
                if starts_ambiguously(expression) {
                    self.write("(");
                    self.expression(expression);
                    self.write(")");
                } else {
                    self.expression(expression);
                }
                self.write(";");
            }

            Stmt::Return { argument, .. } => match argument {
                Some(argument) => {
                    self.write("return ");
                    self.expression(argument);
                    self.write(";");
                }
                None => self.write("return;"),
            },

            Stmt::While { test, body, .. } => {
                self.write("while (");
                self.expression(test);
                self.write(")");
                self.body(body);
            }

            Stmt::DoWhile { body, test, .. } => {
                self.write("do");
                if self.body(body) {
                    self.write(" ");
                } else {
                    self.newline();
                    self.write_indent();
                }
                self.write("while (");
                self.expression(test);
                self.write(");");
            }

            Stmt::For {
                init,
                test,
                update,
                body,
                ..
            } => {
                self.write("for (");
                match init.as_deref() {
                    Some(Stmt::VariableDeclaration { declarations, .. }) => {
                        self.var_declaration(declarations)
                    }
                    Some(Stmt::Expression { expression, .. }) => self.expression(expression),
                    _ => {}
                }
                self.write(";");
                if let Some(test) = test {
                    self.write(" ");
                    self.expression(test);
                }
                self.write(";");
                if let Some(update) = update {
                    self.write(" ");
                    self.expression(update);
                }
                self.write(")");
                self.body(body);
            }

            Stmt::Break { .. } => self.write("break;"),

            Stmt::Continue { .. } => self.write("continue;"),

            Stmt::Throw { argument, .. } => {
                self.write("throw ");
                self.expression(argument);
                self.write(";");
            }

            Stmt::Empty { .. } => self.write(";"),
        }
    }

    fn var_declaration(&mut self, declarations: &[VariableDeclarator]) {
        self.write("var ");
        for (i, declarator) in declarations.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.write(&declarator.id);
            if let Some(init) = &declarator.init {
                self.write(" = ");
                self.assignment_operand(init);
            }
        }
    }

    fn if_statement(&mut self, test: &Expr, consequent: &Stmt, alternate: Option<&Stmt>) {
        self.write("if (");
        self.expression(test);
        self.write(")");

        // An `else` would otherwise attach to the inner `if`
        let dangling = alternate.is_some()
            && matches!(consequent, Stmt::If { alternate: None, .. });
        let consequent_is_block = if dangling {
            self.write(" ");
            self.block(std::slice::from_ref(consequent));
            true
        } else {
            self.body(consequent)
        };

        let Some(alternate) = alternate else {
            return;
        };
        if consequent_is_block {
            self.write(" ");
        } else {
            self.newline();
            self.write_indent();
        }
        self.write("else");
        match alternate {
            Stmt::If { .. } => {
                self.write(" ");
                self.statement_inline(alternate);
            }
            _ => {
                self.body(alternate);
            }
        }
    }

    /// Render the body of a compound statement; returns true when it was a
    /// block (so the caller can continue on the closing brace's line)
    fn body(&mut self, body: &Stmt) -> bool {
        match body {
            Stmt::Block { body, .. } => {
                self.write(" ");
                self.block(body);
                true
            }
            other => {
                self.newline();
                self.indented(|printer| {
                    printer.write_indent();
                    printer.statement_inline(other);
                });
                false
            }
        }
    }

    pub(crate) fn block(&mut self, body: &[Stmt]) {
        if body.is_empty() {
            self.write("{}");
            return;
        }
        self.write("{");
        self.newline();
        self.indented(|printer| {
            for stmt in body {
                printer.statement(stmt);
            }
        });
        self.write_indent();
        self.write("}");
    }

    /// `function name(params) { body }`
    pub(crate) fn function(&mut self, function: &Function) {
        self.write("function ");
        if let Some(id) = &function.id {
            self.write(id);
        }
        self.write("(");
        self.write(&function.params.join(", "));
        self.write(") ");
        self.block(&function.body);
    }
}

/// An expression statement may not begin with `function` or `{`
fn starts_ambiguously(expr: &Expr) -> bool {
    match expr {
        Expr::Function(_) | Expr::Object { .. } => true,
        Expr::Binary { left, .. } | Expr::Logical { left, .. } | Expr::Assignment { left, .. } => {
            starts_ambiguously(left)
        }
        Expr::Conditional { test, .. } => starts_ambiguously(test),
        Expr::Call { callee, .. } => starts_ambiguously(callee),
        Expr::Member { object, .. } => starts_ambiguously(object),
        Expr::Update {
            prefix: false,
            argument,
            ..
        } => starts_ambiguously(argument),
        _ => false,
    }
}
