//! Step driver
//!
//! A [`Stepper`] owns one script engine and walks a transformed function one
//! statement at a time.
//!
//! # Lifecycle
//!
//! ```text
//! new ──parse──▶ compiled ──call──▶ ready (position 0) ──step/back/forward──▶ ...
//! ```
//!
//! `parse` turns the function text into a compiled function whose body only
//! declares the locals and returns the step closures. `call` runs it once
//! with the caller's `this` and arguments. Stepping then runs the closures by
//! position; they all share the function's scope, so every step sees what the
//! earlier ones wrote and [`Stepper::evaluate`] can inspect it.
//!
//! # Position bounds
//!
//! The position ranges over `0..=len`. `step` at `len`, `forward` at `len`
//! and `back` at 0 fail and leave the position where it was. `back` only
//! repositions; side effects of the steps it passes are kept.

mod errors;
pub mod source;

pub use errors::StepperError;
pub use source::{extract_function, FunctionSource};

use crate::codegen::Generator;
use crate::console::Console;
use crate::interpreter::Interpreter;
use crate::memory::Value;
use crate::parser::ast::{Node, SourceLocation};
use crate::parser::Parser;
use crate::transform::synthesize::{EVALUATOR_KEY, STEPS_KEY};
use crate::transform::{Ast, Step};
use tracing::{debug, trace, warn};

/// What the compiled function hands back
struct Artifact {
    evaluator: Value,
    steps: Vec<Value>,
}

impl Artifact {
    fn from_value(value: &Value) -> Result<Self, StepperError> {
        let malformed = || StepperError::MalformedArtifact {
            found: value.inspect(),
        };

        let Value::Object(object) = value else {
            return Err(malformed());
        };
        let object = object.borrow();

        let evaluator = object
            .get(EVALUATOR_KEY)
            .filter(|evaluator| evaluator.is_callable())
            .cloned()
            .ok_or_else(malformed)?;
        let steps = match object.get(STEPS_KEY) {
            Some(Value::Array(steps)) => steps.borrow().clone(),
            _ => return Err(malformed()),
        };
        if !steps.iter().all(Value::is_callable) {
            return Err(malformed());
        }

        Ok(Artifact { evaluator, steps })
    }
}

/// Statement-level driver for one function
pub struct Stepper {
    interpreter: Interpreter,
    generator: Generator,
    source: Option<FunctionSource>,
    generated: Option<String>,
    compiled: Option<Value>,
    steps: Vec<Step>,
    artifact: Option<Artifact>,
    context: Value,
    position: usize,
}

impl Stepper {
    pub fn new() -> Self {
        Self::with_generator(Generator::default())
    }

    pub fn with_generator(generator: Generator) -> Self {
        Stepper {
            interpreter: Interpreter::new(),
            generator,
            source: None,
            generated: None,
            compiled: None,
            steps: Vec::new(),
            artifact: None,
            context: Value::Undefined,
            position: 0,
        }
    }

    /// Transform and compile `text`, a function as written
    /// (`function name(a, b) { ... }`).
    ///
    /// Replaces anything parsed or called before.
    pub fn parse(&mut self, text: &str) -> Result<(), StepperError> {
        let source = FunctionSource::split(text)?;
        let program = Parser::new(&source.body)
            .and_then(|mut parser| parser.parse_program())
            .map_err(|err| source.error_in_function(err))?;

        let mut ast = Ast::new(self.generator);
        ast.parse_syntax(Some(Node::Program(program)))?;
        ast.prehoist()?;
        let steps = ast.wrap_statements()?;
        let generated = ast.generate()?;

        let compiled = self.interpreter.compile(&source.params, &generated)?;
        debug!(
            params = source.params.len(),
            steps = steps.len(),
            bytes = generated.len(),
            "parsed function"
        );

        self.source = Some(source);
        self.generated = Some(generated);
        self.compiled = Some(compiled);
        self.steps = steps;
        self.artifact = None;
        self.position = 0;
        Ok(())
    }

    /// Run the compiled function with `context` as `this`. No step runs yet;
    /// the position goes back to 0.
    pub fn call(&mut self, context: Value, args: Vec<Value>) -> Result<(), StepperError> {
        let compiled = self.compiled.clone().ok_or(StepperError::NotCompiled)?;
        let returned = self.interpreter.call_function(
            &compiled,
            context.clone(),
            args,
            SourceLocation::new(1, 1),
        )?;

        let artifact = Artifact::from_value(&returned)?;
        if artifact.steps.len() != self.steps.len() {
            return Err(StepperError::MalformedArtifact {
                found: format!(
                    "{} step closures for {} steps",
                    artifact.steps.len(),
                    self.steps.len()
                ),
            });
        }

        trace!(steps = artifact.steps.len(), "called");
        self.artifact = Some(artifact);
        self.context = context;
        self.position = 0;
        Ok(())
    }

    /// Run the step at the current position, then move past it and past any
    /// steps its jumps skip.
    ///
    /// A step that fails leaves the position unchanged.
    pub fn step(&mut self) -> Result<(), StepperError> {
        let artifact = self.artifact.as_ref().ok_or(StepperError::NotCalled)?;
        let len = artifact.steps.len();
        if self.position >= len {
            warn!(position = self.position, len, "step past the last statement");
            return Err(StepperError::EndOfSteps {
                position: self.position,
                len,
            });
        }

        let wrapper = artifact.steps[self.position].clone();
        let step = &self.steps[self.position];
        let result = self.interpreter.call_function(
            &wrapper,
            self.context.clone(),
            Vec::new(),
            step.location,
        )?;

        let from = self.position;
        let skip = step.skip(result.is_truthy());
        self.position = (from + 1 + skip).min(len);
        trace!(from, to = self.position, "step");
        Ok(())
    }

    /// Move back one position without undoing anything
    pub fn back(&mut self) -> Result<(), StepperError> {
        if self.position == 0 {
            warn!(len = self.len(), "back before the first statement");
            return Err(StepperError::OutOfBounds {
                target: -1,
                len: self.len(),
            });
        }
        self.position -= 1;
        trace!(to = self.position, "back");
        Ok(())
    }

    /// Move forward one position without running the step
    pub fn forward(&mut self) -> Result<(), StepperError> {
        if self.position >= self.len() {
            warn!(len = self.len(), "forward past the last statement");
            return Err(StepperError::OutOfBounds {
                target: self.position as isize + 1,
                len: self.len(),
            });
        }
        self.position += 1;
        trace!(to = self.position, "forward");
        Ok(())
    }

    /// Evaluate `expression` in the function's scope as it stands now.
    ///
    /// Script errors come back as [`StepperError::Runtime`].
    pub fn evaluate(&mut self, expression: &str) -> Result<Value, StepperError> {
        let evaluator = self
            .artifact
            .as_ref()
            .ok_or(StepperError::NotCalled)?
            .evaluator
            .clone();
        let value = self.interpreter.call_function(
            &evaluator,
            self.context.clone(),
            vec![Value::string(expression)],
            SourceLocation::new(1, 1),
        )?;
        trace!(expression, "evaluated");
        Ok(value)
    }

    /// Placeholder for stepping into a called function; changes nothing
    pub fn step_in(&mut self) -> Result<(), StepperError> {
        trace!(position = self.position, "step in (not supported)");
        Ok(())
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of steps of the parsed function
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn is_called(&self) -> bool {
        self.artifact.is_some()
    }

    pub fn is_finished(&self) -> bool {
        self.position >= self.len()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn source(&self) -> Option<&FunctionSource> {
        self.source.as_ref()
    }

    /// Location of the next step in the function text
    pub fn current_location(&self) -> Option<SourceLocation> {
        let step = self.steps.get(self.position)?;
        let source = self.source.as_ref()?;
        Some(source.location_in_function(step.location))
    }

    /// The transformed body handed to the engine
    pub fn generated_source(&self) -> Option<&str> {
        self.generated.as_deref()
    }

    pub fn console(&self) -> &Console {
        self.interpreter.console()
    }

    /// Bindings of the called function's scope, in declaration order
    pub fn locals(&self) -> Vec<(String, Value)> {
        match self.artifact.as_ref().map(|artifact| &artifact.evaluator) {
            Some(Value::Function(closure)) => closure.scope.borrow().locals(),
            _ => Vec::new(),
        }
    }

    /// The engine the function runs in, e.g. to build call arguments
    pub fn interpreter_mut(&mut self) -> &mut Interpreter {
        &mut self.interpreter
    }
}

impl Default for Stepper {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready(text: &str) -> Stepper {
        let mut stepper = Stepper::new();
        stepper.parse(text).unwrap();
        stepper.call(Value::Undefined, Vec::new()).unwrap();
        stepper
    }

    fn number(stepper: &mut Stepper, expression: &str) -> f64 {
        stepper.evaluate(expression).unwrap().to_number()
    }

    #[test]
    fn test_lifecycle_errors() {
        let mut stepper = Stepper::new();
        assert!(matches!(
            stepper.call(Value::Undefined, Vec::new()),
            Err(StepperError::NotCompiled)
        ));

        stepper.parse("function () { a = 1; }").unwrap();
        assert!(matches!(stepper.step(), Err(StepperError::NotCalled)));
        assert!(matches!(stepper.evaluate("1"), Err(StepperError::NotCalled)));
        assert!(!stepper.is_called());
    }

    #[test]
    fn test_parse_errors_point_into_the_function_text() {
        let mut stepper = Stepper::new();
        let err = stepper.parse("function () { var é = 1; }").unwrap_err();
        match err {
            StepperError::Parse(err) => {
                assert_eq!(err.location, SourceLocation::new(1, 19));
                assert!(err.to_string().contains("line 1, column 19"));
            }
            other => panic!("Expected a parse error, got {:?}", other),
        }

        let err = stepper
            .parse("function (a) {\n    a = 1;\n    a = é;\n}")
            .unwrap_err();
        match err {
            StepperError::Parse(err) => assert_eq!(err.location, SourceLocation::new(3, 9)),
            other => panic!("Expected a parse error, got {:?}", other),
        }
        assert!(stepper.generated_source().is_none());
    }

    #[test]
    fn test_steps_share_scope() {
        let mut stepper = ready("function () { var a = 1; var b = a + 1; }");
        assert_eq!(stepper.len(), 2);
        assert!(stepper.evaluate("a").unwrap().is_undefined());

        stepper.step().unwrap();
        assert_eq!(number(&mut stepper, "a"), 1.0);
        stepper.step().unwrap();
        assert_eq!(number(&mut stepper, "b"), 2.0);
        assert!(stepper.is_finished());
    }

    #[test]
    fn test_bounds() {
        let mut stepper = ready("function () { x = 1; }");
        assert!(matches!(
            stepper.back(),
            Err(StepperError::OutOfBounds { target: -1, len: 1 })
        ));
        stepper.forward().unwrap();
        assert!(matches!(
            stepper.forward(),
            Err(StepperError::OutOfBounds { target: 2, len: 1 })
        ));
        assert!(matches!(
            stepper.step(),
            Err(StepperError::EndOfSteps { position: 1, len: 1 })
        ));
        assert_eq!(stepper.position(), 1);
    }

    #[test]
    fn test_failed_step_keeps_position() {
        let mut stepper = ready("function () { missing(); }");
        let err = stepper.step().unwrap_err();
        assert!(matches!(err, StepperError::Runtime(_)));
        assert_eq!(stepper.position(), 0);
    }

    #[test]
    fn test_parameters_and_context() {
        let mut stepper = Stepper::new();
        stepper
            .parse("function (a, b) { var sum = a + b + this.base; }")
            .unwrap();
        let context = stepper.interpreter_mut().run("({ base: 100 });").unwrap();
        stepper
            .call(context, vec![Value::Number(1.0), Value::Number(2.0)])
            .unwrap();
        stepper.step().unwrap();
        assert_eq!(number(&mut stepper, "sum"), 103.0);
        assert_eq!(number(&mut stepper, "this.base"), 100.0);
    }

    #[test]
    fn test_locals_in_declaration_order() {
        let mut stepper = ready("function () { var z = 1; var y; }");
        stepper.step().unwrap();
        let names: Vec<String> = stepper.locals().into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["z", "y"]);
    }

    #[test]
    fn test_current_location_is_in_function_text() {
        let mut stepper = ready("function f() {\n    a = 1;\n    b = 2;\n}");
        assert_eq!(stepper.current_location(), Some(SourceLocation::new(2, 5)));
        stepper.step().unwrap();
        assert_eq!(stepper.current_location(), Some(SourceLocation::new(3, 5)));
        stepper.step().unwrap();
        assert_eq!(stepper.current_location(), None);
    }

    #[test]
    fn test_malformed_function_text() {
        let mut stepper = Stepper::new();
        assert!(matches!(
            stepper.parse("a = 1;"),
            Err(StepperError::MalformedFunction { .. })
        ));
        assert!(matches!(
            stepper.parse("function () { a = ; }"),
            Err(StepperError::Parse(_))
        ));
    }
}
