//! Declaration hoisting
//!
//! Moves every `var` declaration and function declaration of a function body
//! to the head of the body, right after the directive prologue:
//!
//! ```text
//! prologue ++ [var <all declarators>] ++ <function declarations> ++ rest
//! ```
//!
//! A declaration with initializers is replaced in place by one `name = init;`
//! statement per initialized declarator, so initialization still happens at
//! the original point of execution. Declarations nested in blocks, branches
//! and loops are rewritten the same way: each step later runs inside its own
//! closure, and a declaration left there would bind a closure-local variable.
//! That includes function declarations in a branch, which join the top-level
//! ones in source order. Nested function bodies are never entered.

use crate::parser::ast::*;
use std::rc::Rc;
use tracing::debug;

/// Declarations pulled out of a body, in source order
#[derive(Debug, Default)]
struct Declarations {
    variables: Vec<VariableDeclarator>,
    functions: Vec<Rc<Function>>,
}

/// Hoist the declarations of `body`; the first `prologue_len` statements stay
/// where they are.
pub fn prehoist(body: Vec<Stmt>, prologue_len: usize) -> Vec<Stmt> {
    let prologue_len = prologue_len.min(body.len());
    let mut statements = body.into_iter();
    let prologue: Vec<Stmt> = statements.by_ref().take(prologue_len).collect();

    let mut declarations = Declarations::default();
    let mut rest = Vec::new();
    for stmt in statements {
        rest.extend(declarations.strip(stmt));
    }

    debug!(
        variables = declarations.variables.len(),
        functions = declarations.functions.len(),
        statements = rest.len(),
        "hoisted declarations"
    );

    let location = prologue
        .last()
        .map(Stmt::location)
        .unwrap_or_else(|| SourceLocation::new(1, 1));

    let mut hoisted = prologue;
    if !declarations.variables.is_empty() {
        hoisted.push(Stmt::VariableDeclaration {
            declarations: declarations.variables,
            location,
        });
    }
    hoisted.extend(
        declarations
            .functions
            .into_iter()
            .map(Stmt::FunctionDeclaration),
    );
    hoisted.extend(rest);
    hoisted
}

impl Declarations {
    /// Record the declarations in `stmt` and return what replaces it
    fn strip(&mut self, stmt: Stmt) -> Vec<Stmt> {
        match stmt {
            Stmt::VariableDeclaration { declarations, .. } => declarations
                .into_iter()
                .filter_map(|declarator| self.declare(declarator))
                .collect(),

            Stmt::FunctionDeclaration(function) => {
                self.functions.push(function);
                Vec::new()
            }

            Stmt::Block { body, location } => vec![Stmt::Block {
                body: self.strip_all(body),
                location,
            }],

            Stmt::If {
                test,
                consequent,
                alternate,
                location,
            } => {
                let consequent = self.strip_single(*consequent);
                let alternate = alternate.map(|alternate| Box::new(self.strip_single(*alternate)));
                vec![Stmt::If {
                    test,
                    consequent: Box::new(consequent),
                    alternate,
                    location,
                }]
            }

            Stmt::While {
                test,
                body,
                location,
            } => vec![Stmt::While {
                test,
                body: Box::new(self.strip_single(*body)),
                location,
            }],

            Stmt::DoWhile {
                body,
                test,
                location,
            } => vec![Stmt::DoWhile {
                body: Box::new(self.strip_single(*body)),
                test,
                location,
            }],

            Stmt::For {
                init,
                test,
                update,
                body,
                location,
            } => {
                let (mut before, init) = match init.map(|init| *init) {
                    Some(Stmt::VariableDeclaration { declarations, .. }) => {
                        let mut assignments: Vec<Stmt> = declarations
                            .into_iter()
                            .filter_map(|declarator| self.declare(declarator))
                            .collect();
                        // The subset has no comma operator: a lone initializer
                        // stays in the header, several run just before the loop
                        if assignments.len() == 1 {
                            (Vec::new(), assignments.pop())
                        } else {
                            (assignments, None)
                        }
                    }
                    other => (Vec::new(), other),
                };
                before.push(Stmt::For {
                    init: init.map(Box::new),
                    test,
                    update,
                    body: Box::new(self.strip_single(*body)),
                    location,
                });
                before
            }

            other => vec![other],
        }
    }

    fn strip_all(&mut self, body: Vec<Stmt>) -> Vec<Stmt> {
        body.into_iter().flat_map(|stmt| self.strip(stmt)).collect()
    }

    /// Strip a statement that must stay a single statement (a branch or loop
    /// body)
    fn strip_single(&mut self, stmt: Stmt) -> Stmt {
        let location = stmt.location();
        let mut replaced = self.strip(stmt);
        match replaced.len() {
            0 => Stmt::Empty { location },
            1 => replaced.remove(0),
            _ => Stmt::Block {
                body: replaced,
                location,
            },
        }
    }

    /// Record a declarator; returns its initializer assignment, if any
    fn declare(&mut self, declarator: VariableDeclarator) -> Option<Stmt> {
        let VariableDeclarator { id, init, location } = declarator;
        self.variables.push(VariableDeclarator {
            id: id.clone(),
            init: None,
            location,
        });
        init.map(|init| Stmt::assignment(&id, init, location))
    }
}
