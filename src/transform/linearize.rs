//! Control-flow linearization
//!
//! Flattens a statement list into a fixed sequence of [`Step`]s. Each step
//! runs as one unit; control transfer between steps is expressed with jump
//! instructions that the step driver interprets after running the step.
//!
//! An `if` statement is split into its test and the statements of each
//! branch:
//!
//! ```text
//! if (t) { c1; c2; } else { a1; }
//!
//! [ConditionalJump { t, if_true: 0, if_false: 2 }]
//! [Execute(c1)]
//! [Execute(c2), Jump(1)]
//! [Execute(a1)]
//! ```
//!
//! The driver always advances by one after a step, so an offset counts the
//! steps skipped on top of that. Only the outermost `if` is split: loops,
//! nested `if`s and `else if` chains run as one indivisible step.

use crate::parser::ast::*;
use tracing::debug;

/// One action inside a step
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// Run a statement
    Execute(Stmt),
    /// Skip the next `n` steps
    Jump(usize),
    /// Evaluate `test`, then skip the next `offset_if_true` or
    /// `offset_if_false` steps depending on its truthiness
    ConditionalJump {
        test: Expr,
        offset_if_true: usize,
        offset_if_false: usize,
    },
}

/// A position-indexed unit of execution
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub instructions: Vec<Instruction>,
    pub location: SourceLocation,
}

impl Step {
    fn execute(stmt: Stmt) -> Self {
        Step {
            location: stmt.location(),
            instructions: vec![Instruction::Execute(stmt)],
        }
    }

    /// Skip distance once this step has run, given its result's truthiness
    pub fn skip(&self, truthy: bool) -> usize {
        self.instructions
            .iter()
            .map(|instruction| match instruction {
                Instruction::Execute(_) => 0,
                Instruction::Jump(n) => *n,
                Instruction::ConditionalJump {
                    offset_if_true,
                    offset_if_false,
                    ..
                } => {
                    if truthy {
                        *offset_if_true
                    } else {
                        *offset_if_false
                    }
                }
            })
            .sum()
    }

    /// The `if` test, when this step is one
    pub fn test(&self) -> Option<&Expr> {
        self.instructions.iter().find_map(|instruction| match instruction {
            Instruction::ConditionalJump { test, .. } => Some(test),
            _ => None,
        })
    }
}

/// Statements of an `if` branch: a block contributes its body, any other
/// statement counts as a one-statement branch
fn branch_statements(branch: Option<Stmt>) -> Vec<Stmt> {
    match branch {
        Some(Stmt::Block { body, .. }) => body,
        Some(stmt) => vec![stmt],
        None => Vec::new(),
    }
}

/// Linearize `statements` into steps
pub fn linearize(statements: Vec<Stmt>) -> Vec<Step> {
    let mut steps = Vec::with_capacity(statements.len());

    for stmt in statements {
        match stmt {
            Stmt::If {
                test,
                consequent,
                alternate,
                location,
            } => {
                let consequent = branch_statements(Some(*consequent));
                let alternate = branch_statements(alternate.map(|alternate| *alternate));

                // With no consequent step to carry the jump over the
                // alternate, the test step carries it
                let offset_if_true = if consequent.is_empty() {
                    alternate.len()
                } else {
                    0
                };
                steps.push(Step {
                    instructions: vec![Instruction::ConditionalJump {
                        test,
                        offset_if_true,
                        offset_if_false: consequent.len(),
                    }],
                    location,
                });

                let last = consequent.len().saturating_sub(1);
                let alternate_len = alternate.len();
                for (index, stmt) in consequent.into_iter().enumerate() {
                    let mut step = Step::execute(stmt);
                    if index == last && alternate_len > 0 {
                        step.instructions.push(Instruction::Jump(alternate_len));
                    }
                    steps.push(step);
                }
                steps.extend(alternate.into_iter().map(Step::execute));
            }
            other => steps.push(Step::execute(other)),
        }
    }

    debug!(steps = steps.len(), "linearized statements");
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn steps(source: &str) -> Vec<Step> {
        linearize(Parser::new(source).unwrap().parse_program().unwrap().body)
    }

    #[test]
    fn test_straight_line_is_one_step_per_statement() {
        let steps = steps("a = 1;\nb = 2;\nc();");
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[1].location.line, 2);
        assert!(steps.iter().all(|step| step.skip(true) == 0 && step.skip(false) == 0));
    }

    #[test]
    fn test_if_else_offsets() {
        let steps = steps("if (t) { c1(); c2(); } else { a1(); a2(); a3(); }\nafter();");
        assert_eq!(steps.len(), 1 + 2 + 3 + 1);

        // Falsy test lands on the first alternate step
        assert_eq!(steps[0].skip(false), 2);
        assert_eq!(steps[0].skip(true), 0);
        assert!(steps[0].test().is_some());

        // The last consequent step jumps over the alternate
        assert_eq!(steps[1].skip(true), 0);
        assert_eq!(steps[2].skip(true), 3);
        assert_eq!(steps[3].skip(false), 0);
    }

    #[test]
    fn test_if_without_else() {
        let steps = steps("if (t) { c1(); }\nafter();");
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].skip(false), 1);
        assert_eq!(steps[1].instructions.len(), 1);
    }

    #[test]
    fn test_non_block_branches_count_as_one_statement() {
        let steps = steps("if (t) c1(); else a1();");
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].skip(false), 1);
        assert_eq!(steps[1].skip(true), 1);
    }

    #[test]
    fn test_empty_consequent_jumps_over_alternate_when_truthy() {
        let steps = steps("if (t) {} else { a1(); a2(); }");
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].skip(true), 2);
        assert_eq!(steps[0].skip(false), 0);
    }

    #[test]
    fn test_nested_control_flow_is_indivisible() {
        let steps = steps("if (t) { if (u) x(); } else if (v) { y(); }\nwhile (w) z();");
        // test, nested if, else-if chain, while
        assert_eq!(steps.len(), 4);
        assert!(matches!(
            steps[2].instructions[0],
            Instruction::Execute(Stmt::If { .. })
        ));
        assert!(matches!(
            steps[3].instructions[0],
            Instruction::Execute(Stmt::While { .. })
        ));
    }
}
