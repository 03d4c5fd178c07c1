//! Execution artifact synthesis
//!
//! Builds the statement that ends every transformed body:
//!
//! ```text
//! return {
//!     evaluator: function (__expression__) {
//!         return eval(__expression__);
//!     },
//!     statementWrappers: [
//!         function () { <step 0> },
//!         function () { <step 1> },
//!         ...
//!     ]
//! };
//! ```
//!
//! Every function closes over the transformed function's scope, so the
//! evaluator sees what the steps wrote.

use super::linearize::{Instruction, Step};
use crate::parser::ast::*;
use std::rc::Rc;

/// Artifact property holding the evaluator
pub const EVALUATOR_KEY: &str = "evaluator";
/// Artifact property holding the step closures
pub const STEPS_KEY: &str = "statementWrappers";
/// Evaluator parameter; unlikely to shadow a local the user wants to inspect
pub const EXPRESSION_PARAM: &str = "__expression__";

fn closure(params: Vec<String>, body: Vec<Stmt>, location: SourceLocation) -> Expr {
    Expr::Function(Rc::new(Function {
        id: None,
        params,
        body,
        location,
    }))
}

fn evaluator(location: SourceLocation) -> Expr {
    let call = Expr::Call {
        callee: Box::new(Expr::identifier("eval", location)),
        arguments: vec![Expr::identifier(EXPRESSION_PARAM, location)],
        location,
    };
    closure(
        vec![EXPRESSION_PARAM.to_string()],
        vec![Stmt::Return {
            argument: Some(call),
            location,
        }],
        location,
    )
}

/// Body of the closure running one step. Jumps are left to the driver.
fn step_body(step: &Step) -> Vec<Stmt> {
    let mut body = Vec::new();
    for instruction in &step.instructions {
        match instruction {
            Instruction::Execute(Stmt::Block { body: inner, .. }) => {
                body.extend(inner.iter().cloned())
            }
            Instruction::Execute(stmt) => body.push(stmt.clone()),
            Instruction::ConditionalJump { test, .. } => body.push(Stmt::Return {
                argument: Some(test.clone()),
                location: step.location,
            }),
            Instruction::Jump(_) => {}
        }
    }
    body
}

/// The `return { evaluator, statementWrappers }` statement for `steps`
pub fn synthesize(steps: &[Step], location: SourceLocation) -> Stmt {
    let wrappers = steps
        .iter()
        .map(|step| closure(Vec::new(), step_body(step), step.location))
        .collect();

    let artifact = Expr::Object {
        properties: vec![
            Property {
                key: EVALUATOR_KEY.to_string(),
                value: evaluator(location),
                location,
            },
            Property {
                key: STEPS_KEY.to_string(),
                value: Expr::Array {
                    elements: wrappers,
                    location,
                },
                location,
            },
        ],
        location,
    };

    Stmt::Return {
        argument: Some(artifact),
        location,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::Generator;
    use crate::parser::Parser;
    use crate::transform::linearize::linearize;

    fn render(source: &str) -> String {
        let body = Parser::new(source).unwrap().parse_program().unwrap().body;
        let steps = linearize(body);
        let artifact = synthesize(&steps, SourceLocation::new(1, 1));
        Generator::new(2).generate(&Program::new(vec![artifact]))
    }

    #[test]
    fn test_no_steps() {
        assert_eq!(
            render(""),
            "return {\n  evaluator: function (__expression__) {\n    return eval(__expression__);\n  },\n  statementWrappers: []\n};\n"
        );
    }

    #[test]
    fn test_steps_become_closures() {
        let out = render("a = 1;\nif (a > 0) { b = 2; } else c = 3;");
        assert!(out.contains(
            "statementWrappers: [\n    function () {\n      a = 1;\n    },\n    function () {\n      return a > 0;\n    },\n    function () {\n      b = 2;\n    },\n    function () {\n      c = 3;\n    }\n  ]"
        ));
    }

    #[test]
    fn test_block_step_is_unwrapped() {
        let steps = vec![Step {
            instructions: vec![Instruction::Execute(Stmt::Block {
                body: vec![Stmt::Empty {
                    location: SourceLocation::new(1, 1),
                }],
                location: SourceLocation::new(1, 1),
            })],
            location: SourceLocation::new(1, 1),
        }];
        assert_eq!(step_body(&steps[0]).len(), 1);
        assert!(matches!(step_body(&steps[0])[0], Stmt::Empty { .. }));
    }

    #[test]
    fn test_output_reparses() {
        let out = render("x = 1;\nif (x) { y(); }");
        let program = Parser::new(&out).unwrap().parse_program().unwrap();
        assert_eq!(program.body.len(), 1);
        assert!(matches!(program.body[0], Stmt::Return { .. }));
    }
}
