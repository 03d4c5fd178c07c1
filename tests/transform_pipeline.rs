// End-to-end checks of the transformation: generated source, bounds policy
// and equivalence of stepped and direct execution

use jstep::codegen::Generator;
use jstep::interpreter::Interpreter;
use jstep::memory::Value;
use jstep::parser::ast::{Node, NodeKind, SourceLocation, Stmt};
use jstep::parser::Parser;
use jstep::stepper::{Stepper, StepperError};
use jstep::transform::{Ast, TransformError};

/// Run `body` untransformed and return `snapshot` evaluated at its end
fn run_directly(body: &str, snapshot: &str) -> String {
    let mut interpreter = Interpreter::new();
    let function = interpreter
        .compile(&[], &format!("{}\nreturn {};", body, snapshot))
        .expect("Compile failed");
    interpreter
        .call_function(&function, Value::Undefined, Vec::new(), SourceLocation::new(1, 1))
        .expect("Direct run failed")
        .inspect()
}

/// Step through every step of `body` and return `snapshot` evaluated at the end
fn run_stepped(body: &str, snapshot: &str) -> String {
    let mut stepper = Stepper::new();
    stepper
        .parse(&format!("function () {{\n{}\n}}", body))
        .expect("Parse failed");
    stepper
        .call(Value::Undefined, Vec::new())
        .expect("Call failed");
    while !stepper.is_finished() {
        stepper.step().expect("Step failed");
    }
    stepper.evaluate(snapshot).expect("Evaluate failed").inspect()
}

#[test]
fn test_stepping_matches_direct_execution() {
    let cases = [
        ("var a = 1, b; b = a + 1; var c = b * 10;", "[a, b, c]"),
        (
            "var x = 5;\nif (x > 3) { var y = 'big'; x = x - 1; } else { y = 'small'; }\nvar z = y + x;",
            "[x, y, z]",
        ),
        (
            "var x = 1;\nif (x > 3) { var y = 'big'; x = x - 1; } else { y = 'small'; }\nvar z = y + x;",
            "[x, y, z]",
        ),
        (
            "var n = 0;\nif (n) { n = 10; } else if (n === 0) { n = 20; } else { n = 30; }",
            "n",
        ),
        (
            "var s = '';\nvar i;\nfor (i = 0; i < 3; i++) { s = s + i; }\nif (!s) {} else { s = s + '!'; }",
            "[s, i]",
        ),
        (
            "var t = twice(4);\nfunction twice(v) { return v * 2; }\nif (t === 8) t = t + 1;",
            "t",
        ),
        (
            "\"use strict\";\nvar o = { items: [] };\no.items[0] = 'first';\nif (o.items.length) { o.count = 1; }",
            "[o.items.length, o.count]",
        ),
        (
            "var r;\nif (true) { function g() { return 1; } }\nr = g();",
            "[r, typeof g]",
        ),
    ];

    for (body, snapshot) in cases {
        assert_eq!(
            run_stepped(body, snapshot),
            run_directly(body, snapshot),
            "Mismatch for:\n{}",
            body
        );
    }
}

#[test]
fn test_generated_source() {
    let mut stepper = Stepper::with_generator(Generator::new(2));
    stepper
        .parse("function (flag) {\n  \"use strict\";\n  var a = 1;\n  if (flag) {\n    a = 2;\n  }\n}")
        .expect("Parse failed");

    assert_eq!(
        stepper.generated_source().expect("No generated source"),
        "\"use strict\";
var a;
return {
  evaluator: function (__expression__) {
    return eval(__expression__);
  },
  statementWrappers: [
    function () {
      a = 1;
    },
    function () {
      return flag;
    },
    function () {
      a = 2;
    }
  ]
};
"
    );
}

#[test]
fn test_empty_consequent_skips_the_alternate() {
    let mut stepper = Stepper::new();
    stepper
        .parse("function (flag) {\n    var a = 0;\n    if (flag) {} else { a = 1; a = 2; }\n    a = a + 10;\n}")
        .expect("Parse failed");

    stepper
        .call(Value::Undefined, vec![Value::Boolean(true)])
        .expect("Call failed");
    while !stepper.is_finished() {
        stepper.step().expect("Step failed");
    }
    assert_eq!(stepper.evaluate("a").expect("Evaluate failed"), Value::Number(10.0));

    stepper
        .call(Value::Undefined, vec![Value::Boolean(false)])
        .expect("Call failed");
    while !stepper.is_finished() {
        stepper.step().expect("Step failed");
    }
    assert_eq!(stepper.evaluate("a").expect("Evaluate failed"), Value::Number(12.0));
}

#[test]
fn test_bounds_policy() {
    let mut stepper = Stepper::new();
    assert!(matches!(
        stepper.call(Value::Undefined, Vec::new()),
        Err(StepperError::NotCompiled)
    ));

    stepper
        .parse("function () {\n    a = 1;\n    a = 2;\n}")
        .expect("Parse failed");
    assert!(matches!(stepper.step(), Err(StepperError::NotCalled)));
    assert!(matches!(stepper.evaluate("a"), Err(StepperError::NotCalled)));

    stepper
        .call(Value::Undefined, Vec::new())
        .expect("Call failed");
    assert!(matches!(stepper.back(), Err(StepperError::OutOfBounds { .. })));
    assert_eq!(stepper.position(), 0);

    stepper.step().expect("Step failed");
    stepper.step().expect("Step failed");
    assert!(matches!(stepper.step(), Err(StepperError::EndOfSteps { .. })));
    assert!(matches!(stepper.forward(), Err(StepperError::OutOfBounds { .. })));
    assert_eq!(stepper.position(), 2);

    // A fresh call starts over in a fresh scope
    stepper
        .call(Value::Undefined, Vec::new())
        .expect("Call failed");
    assert_eq!(stepper.position(), 0);
}

#[test]
fn test_evaluate_errors_propagate() {
    let mut stepper = Stepper::new();
    stepper.parse("function () { var a = 1; }").expect("Parse failed");
    stepper
        .call(Value::Undefined, Vec::new())
        .expect("Call failed");

    assert!(matches!(stepper.evaluate("missing"), Err(StepperError::Runtime(_))));
    assert!(matches!(stepper.evaluate("a +"), Err(StepperError::Runtime(_))));
    assert!(matches!(stepper.evaluate("a()"), Err(StepperError::Runtime(_))));
}

#[test]
fn test_ast_rejects_non_program_roots() {
    let mut ast = Ast::default();
    let stmt = Parser::new("x = 1;")
        .expect("Parser creation failed")
        .parse_program()
        .expect("Parsing failed")
        .body
        .remove(0);
    assert!(matches!(stmt, Stmt::Expression { .. }));

    let err = ast
        .parse_syntax(Some(Node::Statement(stmt)))
        .expect_err("Statement root accepted");
    assert_eq!(
        err,
        TransformError::InvalidSyntaxRoot {
            found: NodeKind::ExpressionStatement.to_string()
        }
    );
    assert!(matches!(
        ast.parse_syntax(None),
        Err(TransformError::InvalidSyntaxRoot { .. })
    ));
}
