// Sample stepping sessions driven through the public Stepper API

use jstep::memory::Value;
use jstep::stepper::Stepper;

fn parsed(text: &str) -> Stepper {
    let mut stepper = Stepper::new();
    stepper.parse(text).expect("Parse failed");
    stepper
}

fn called(text: &str) -> Stepper {
    let mut stepper = parsed(text);
    stepper.call(Value::Null, Vec::new()).expect("Call failed");
    stepper
}

/// A `{ value: 0 }` object created inside the stepper's engine
fn data_object(stepper: &mut Stepper) -> Value {
    stepper
        .interpreter_mut()
        .run("({ value: 0 });")
        .expect("Object literal failed")
}

fn field(object: &Value, key: &str) -> Value {
    match object {
        Value::Object(object) => object.borrow().get(key).cloned().unwrap_or_default(),
        other => panic!("Expected an object, got {:?}", other),
    }
}

fn eval(stepper: &mut Stepper, expression: &str) -> Value {
    stepper.evaluate(expression).expect("Evaluate failed")
}

fn step(stepper: &mut Stepper) {
    stepper.step().expect("Step failed");
}

#[test]
fn test_two_declarations_combine_into_one() {
    let mut stepper = called("function () {\n    var a = 1;\n    var b = 2;\n}");

    assert!(eval(&mut stepper, "a").is_undefined());
    assert!(eval(&mut stepper, "b").is_undefined());
    step(&mut stepper);
    assert_eq!(eval(&mut stepper, "a"), Value::Number(1.0));
    assert!(eval(&mut stepper, "b").is_undefined());
    step(&mut stepper);
    assert_eq!(eval(&mut stepper, "a"), Value::Number(1.0));
    assert_eq!(eval(&mut stepper, "b"), Value::Number(2.0));
}

#[test]
fn test_prehoist_one_declarator_keeps_initializer_in_place() {
    let mut stepper = called("function () {\n    a = 1;\n    var a = 2;\n    a = 3;\n}");

    assert_eq!(stepper.len(), 3);
    assert!(eval(&mut stepper, "a").is_undefined());
    step(&mut stepper);
    assert_eq!(eval(&mut stepper, "a"), Value::Number(1.0));
    step(&mut stepper);
    assert_eq!(eval(&mut stepper, "a"), Value::Number(2.0));
    step(&mut stepper);
    assert_eq!(eval(&mut stepper, "a"), Value::Number(3.0));
}

#[test]
fn test_prehoist_two_declarators_keeps_initializers_in_place() {
    let mut stepper = called("function () {\n    a = 1;\n    var a = 2, b = 1;\n    a = 3;\n}");

    assert!(eval(&mut stepper, "a").is_undefined());
    assert!(eval(&mut stepper, "b").is_undefined());
    step(&mut stepper);
    assert_eq!(eval(&mut stepper, "a"), Value::Number(1.0));
    assert!(eval(&mut stepper, "b").is_undefined());
    step(&mut stepper);
    assert_eq!(eval(&mut stepper, "a"), Value::Number(2.0));
    assert!(eval(&mut stepper, "b").is_undefined());
    step(&mut stepper);
    assert_eq!(eval(&mut stepper, "b"), Value::Number(1.0));
}

#[test]
fn test_rewind_executes_the_same_statement_twice() {
    let mut stepper = parsed("function (data) {\n    data.value += 2;\n}");
    let data = data_object(&mut stepper);
    stepper
        .call(Value::Null, vec![data.clone()])
        .expect("Call failed");

    assert_eq!(field(&data, "value"), Value::Number(0.0));
    step(&mut stepper);
    assert_eq!(field(&data, "value"), Value::Number(2.0));
    stepper.back().expect("Back failed");
    step(&mut stepper);
    assert_eq!(field(&data, "value"), Value::Number(4.0));
    stepper.back().expect("Back failed");
    step(&mut stepper);
    assert_eq!(field(&data, "value"), Value::Number(6.0));
}

#[test]
fn test_single_stepping_a_simple_function() {
    let mut stepper = parsed(
        "function (data) {\n    data.value = 1;\n    data.value = 2;\n    data.value = 3;\n}",
    );
    let data = data_object(&mut stepper);
    stepper
        .call(Value::Null, vec![data.clone()])
        .expect("Call failed");

    assert_eq!(field(&data, "value"), Value::Number(0.0));
    for expected in [1.0, 2.0, 3.0] {
        step(&mut stepper);
        assert_eq!(field(&data, "value"), Value::Number(expected));
    }
    assert!(stepper.is_finished());
}

#[test]
fn test_eval_in_the_function_scope() {
    let mut stepper = parsed("function (data) {\n    var a = 7;\n\n    data.value = 1;\n}");
    let data = data_object(&mut stepper);
    stepper
        .call(Value::Null, vec![data.clone()])
        .expect("Call failed");

    step(&mut stepper);
    assert_eq!(field(&data, "value"), Value::Number(0.0));
    step(&mut stepper);
    assert_eq!(field(&data, "value"), Value::Number(1.0));
    assert_eq!(eval(&mut stepper, "a + 1"), Value::Number(8.0));
    assert_eq!(eval(&mut stepper, "data.value"), Value::Number(1.0));
}

#[test]
fn test_variable_declaration_is_visible_to_eval() {
    let mut stepper = parsed("function (data) {\n    var a = 7;\n}");
    let data = data_object(&mut stepper);
    stepper.call(Value::Null, vec![data]).expect("Call failed");

    step(&mut stepper);
    assert_eq!(eval(&mut stepper, "a + 2"), Value::Number(9.0));
}

#[test]
fn test_use_strict_pragma_is_not_a_step() {
    let mut stepper = parsed("function (data) {\n    \"use strict\";\n    data.value = 2;\n}");
    let data = data_object(&mut stepper);
    stepper
        .call(Value::Null, vec![data.clone()])
        .expect("Call failed");

    assert_eq!(stepper.len(), 1);
    step(&mut stepper);
    assert_eq!(field(&data, "value"), Value::Number(2.0));
}

#[test]
fn test_forward_skips_a_statement() {
    let mut stepper = called(
        "function () {\n    var a = \"begin\";\n    a = \"not me!\";\n    a = \"yah me\";\n}",
    );

    step(&mut stepper);
    assert_eq!(eval(&mut stepper, "a"), Value::string("begin"));
    stepper.forward().expect("Forward failed");
    step(&mut stepper);
    assert_eq!(eval(&mut stepper, "a"), Value::string("yah me"));
}

#[test]
fn test_if_test_is_its_own_step() {
    let mut stepper = called(
        "function () {\n    var a = \"to begin\";\n\n    if ((a = \"assignment\") === \"assignment\") {\n        a = \"inside\";\n    }\n}",
    );

    step(&mut stepper);
    assert_eq!(eval(&mut stepper, "a"), Value::string("to begin"));
    step(&mut stepper);
    assert_eq!(eval(&mut stepper, "a"), Value::string("assignment"));
    step(&mut stepper);
    assert_eq!(eval(&mut stepper, "a"), Value::string("inside"));
    assert!(stepper.is_finished());
}

const BRANCHES: &str = "function () {
    var a = \"to begin\";

    if (TEST) {
        a = \"success\";
    } else {
        a = \"failure\";
    }

    a = \"after\";
}";

#[test]
fn test_truthy_test_runs_the_consequent() {
    let mut stepper = called(&BRANCHES.replace("TEST", "1 === 1"));

    step(&mut stepper);
    assert_eq!(eval(&mut stepper, "a"), Value::string("to begin"));
    step(&mut stepper);
    step(&mut stepper);
    assert_eq!(eval(&mut stepper, "a"), Value::string("success"));
    step(&mut stepper);
    assert_eq!(eval(&mut stepper, "a"), Value::string("after"));
    assert!(stepper.is_finished());
}

#[test]
fn test_falsy_test_runs_the_alternate() {
    let mut stepper = called(&BRANCHES.replace("TEST", "1 === 2"));

    step(&mut stepper);
    assert_eq!(eval(&mut stepper, "a"), Value::string("to begin"));
    step(&mut stepper);
    step(&mut stepper);
    assert_eq!(eval(&mut stepper, "a"), Value::string("failure"));
    step(&mut stepper);
    assert_eq!(eval(&mut stepper, "a"), Value::string("after"));
    assert!(stepper.is_finished());
}

#[test]
fn test_both_branches_converge_on_the_same_position() {
    let mut truthy = called(&BRANCHES.replace("TEST", "true"));
    let mut falsy = called(&BRANCHES.replace("TEST", "false"));

    for stepper in [&mut truthy, &mut falsy] {
        step(stepper);
        step(stepper);
        step(stepper);
    }
    assert_eq!(truthy.position(), falsy.position());
    assert_eq!(truthy.position(), truthy.len() - 1);
}

#[test]
fn test_step_over_a_call_in_void_context() {
    let mut stepper = called(
        "function () {\n    var a = \"to begin\";\n\n    function process() {\n        a = \"inside\";\n    }\n\n    process();\n\n    a = \"after\";\n}",
    );

    step(&mut stepper);
    assert_eq!(eval(&mut stepper, "a"), Value::string("to begin"));
    step(&mut stepper);
    assert_eq!(eval(&mut stepper, "a"), Value::string("inside"));
    step(&mut stepper);
    assert_eq!(eval(&mut stepper, "a"), Value::string("after"));
}

#[test]
fn test_step_in_preserves_state() {
    let mut stepper = called(
        "function () {\n    var a = \"begin\";\n\n    function process() {\n        a = \"processed 1\";\n        a = \"processed 2\";\n    }\n\n    process();\n\n    a = \"finished\";\n}",
    );

    step(&mut stepper);
    assert_eq!(eval(&mut stepper, "a"), Value::string("begin"));

    let position = stepper.position();
    stepper.step_in().expect("Step in failed");
    assert_eq!(stepper.position(), position);
    assert_eq!(eval(&mut stepper, "a"), Value::string("begin"));

    // The call still runs as a single step
    step(&mut stepper);
    assert_eq!(eval(&mut stepper, "a"), Value::string("processed 2"));
    step(&mut stepper);
    assert_eq!(eval(&mut stepper, "a"), Value::string("finished"));
}

#[test]
fn test_console_output_is_captured() {
    let mut stepper = called("function () {\n    console.log(\"one\", 1);\n    console.log([1, 2]);\n}");
    assert!(stepper.console().is_empty());
    step(&mut stepper);
    step(&mut stepper);
    assert_eq!(stepper.console().get_output(), vec!["one 1", "[1, 2]"]);
}
