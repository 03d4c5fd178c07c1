// Execution engine for the JavaScript subset

use crate::console::Console;
use crate::interpreter::constants::MAX_CALL_DEPTH;
use crate::interpreter::errors::RuntimeError;
use crate::memory::{Closure, Scope, ScopeRef, Value};
use crate::parser::ast::*;
use crate::parser::{ParseError, Parser};
use std::rc::Rc;
use tracing::{debug, trace};

/// How a statement finished
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ControlFlow {
    Normal,
    Return(Value),
    Break,
    Continue,
}

/// Tree-walking interpreter with a persistent global scope
pub struct Interpreter {
    /// Outermost scope; holds the built-ins
    global: ScopeRef,

    /// Scope of the activation currently executing
    pub(crate) scope: ScopeRef,

    /// Sink for `console.log`
    console: Console,

    /// Number of script calls currently on the native stack
    call_depth: usize,

    /// Current source location being executed
    pub(crate) current_location: SourceLocation,
}

impl Interpreter {
    pub fn new() -> Self {
        let global = Scope::global();
        Self::install_globals(&global);

        Interpreter {
            scope: Rc::clone(&global),
            global,
            console: Console::new(),
            call_depth: 0,
            current_location: SourceLocation::new(1, 1),
        }
    }

    pub fn global(&self) -> &ScopeRef {
        &self.global
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    pub(crate) fn console_mut(&mut self) -> &mut Console {
        &mut self.console
    }

    /// Turn `source` into an anonymous function taking `params`, closed over
    /// the global scope. Nothing runs until the function is called.
    pub fn compile(&mut self, params: &[String], source: &str) -> Result<Value, ParseError> {
        let program = Parser::new(source)?.parse_program()?;
        debug!(
            params = params.len(),
            statements = program.body.len(),
            "compiled function body"
        );

        let function = Rc::new(Function {
            id: None,
            params: params.to_vec(),
            body: program.body,
            location: program.location,
        });
        Ok(Value::Function(Rc::new(Closure {
            function,
            scope: Rc::clone(&self.global),
        })))
    }

    /// Run `source` as a script in the global scope and return the value of
    /// its last top-level expression statement
    pub fn run(&mut self, source: &str) -> Result<Value, RuntimeError> {
        let global = Rc::clone(&self.global);
        self.with_scope(global, |interp| {
            interp.eval_source(source, SourceLocation::new(1, 1))
        })
    }

    /// Call a script or native function with an explicit `this`
    pub fn call_function(
        &mut self,
        callee: &Value,
        this: Value,
        args: Vec<Value>,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        match callee {
            Value::Function(closure) => self.call_closure(Rc::clone(closure), this, args, location),
            Value::Native(native) => (native.call)(self, this, args, location),
            other => Err(RuntimeError::NotCallable {
                callee: other.inspect(),
                location,
            }),
        }
    }

    fn call_closure(
        &mut self,
        closure: Rc<Closure>,
        this: Value,
        args: Vec<Value>,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        if self.call_depth >= MAX_CALL_DEPTH {
            return Err(RuntimeError::StackOverflow { location });
        }

        let name = match closure.name() {
            "" => "(anonymous)",
            name => name,
        };
        trace!(function = name, args = args.len(), "call");

        let scope = Scope::child(&closure.scope, name, this);
        {
            let mut frame = scope.borrow_mut();
            if let Some(id) = &closure.function.id {
                frame.define(id, Value::Function(Rc::clone(&closure)));
            }
            let mut args = args.into_iter();
            for param in &closure.function.params {
                frame.define(param, args.next().unwrap_or_default());
            }
        }

        self.call_depth += 1;
        let result = self.with_scope(scope, |interp| {
            interp.instantiate_declarations(&closure.function.body);
            interp.execute_block(&closure.function.body)
        });
        self.call_depth -= 1;

        match result? {
            ControlFlow::Normal => Ok(Value::Undefined),
            ControlFlow::Return(value) => Ok(value),
            ControlFlow::Break => Err(RuntimeError::InvalidBreak {
                keyword: "break",
                location: self.current_location,
            }),
            ControlFlow::Continue => Err(RuntimeError::InvalidBreak {
                keyword: "continue",
                location: self.current_location,
            }),
        }
    }

    /// Run `f` with `scope` as the current scope, restoring the previous one
    /// afterwards even when `f` fails
    pub(crate) fn with_scope<T>(
        &mut self,
        scope: ScopeRef,
        f: impl FnOnce(&mut Self) -> Result<T, RuntimeError>,
    ) -> Result<T, RuntimeError> {
        let previous = std::mem::replace(&mut self.scope, scope);
        let result = f(self);
        self.scope = previous;
        result
    }

    /// Create a closure over the current scope
    pub(crate) fn make_closure(&self, function: &Rc<Function>) -> Value {
        Value::Function(Rc::new(Closure {
            function: Rc::clone(function),
            scope: Rc::clone(&self.scope),
        }))
    }

    /// Bind every `var` name (as `undefined` when not yet bound) and every
    /// function declaration of `body` in the current scope. Nested function
    /// bodies are not entered.
    pub(crate) fn instantiate_declarations(&mut self, body: &[Stmt]) {
        let mut names = Vec::new();
        let mut functions = Vec::new();
        collect_declarations(body, &mut names, &mut functions);

        for name in &names {
            self.scope.borrow_mut().declare(name);
        }
        for function in &functions {
            if let Some(id) = &function.id {
                let closure = self.make_closure(function);
                self.scope.borrow_mut().define(id, closure);
            }
        }
    }

    /// Parse `source` and run it in the current scope.
    ///
    /// Declarations land in the current scope. The result is the value of the
    /// last top-level expression statement, or `undefined` when there is none.
    pub(crate) fn eval_source(
        &mut self,
        source: &str,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let program = Parser::new(source)
            .and_then(|mut parser| parser.parse_program())
            .map_err(|err| RuntimeError::EvalSyntax {
                message: err.to_string(),
                location,
            })?;

        self.instantiate_declarations(&program.body);

        let mut completion = Value::Undefined;
        for stmt in &program.body {
            if let Stmt::Expression { expression, location } = stmt {
                self.current_location = *location;
                completion = self.evaluate_expression(expression)?;
                continue;
            }

            let keyword = match self.execute_statement(stmt)? {
                ControlFlow::Normal => continue,
                ControlFlow::Return(_) => "return",
                ControlFlow::Break => "break",
                ControlFlow::Continue => "continue",
            };
            return Err(RuntimeError::InvalidBreak {
                keyword,
                location: stmt.location(),
            });
        }
        Ok(completion)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// Collect `var` names and function declarations reachable without entering
/// another function
fn collect_declarations(body: &[Stmt], names: &mut Vec<String>, functions: &mut Vec<Rc<Function>>) {
    for stmt in body {
        collect_from_statement(stmt, names, functions);
    }
}

fn collect_from_statement(stmt: &Stmt, names: &mut Vec<String>, functions: &mut Vec<Rc<Function>>) {
    match stmt {
        Stmt::VariableDeclaration { declarations, .. } => {
            for declarator in declarations {
                if !names.contains(&declarator.id) {
                    names.push(declarator.id.clone());
                }
            }
        }
        Stmt::FunctionDeclaration(function) => functions.push(Rc::clone(function)),
        Stmt::If {
            consequent,
            alternate,
            ..
        } => {
            collect_from_statement(consequent, names, functions);
            if let Some(alternate) = alternate {
                collect_from_statement(alternate, names, functions);
            }
        }
        Stmt::Block { body, .. } => collect_declarations(body, names, functions),
        Stmt::While { body, .. } | Stmt::DoWhile { body, .. } => {
            collect_from_statement(body, names, functions)
        }
        Stmt::For { init, body, .. } => {
            if let Some(init) = init {
                collect_from_statement(init, names, functions);
            }
            collect_from_statement(body, names, functions);
        }
        Stmt::Expression { .. }
        | Stmt::Return { .. }
        | Stmt::Break { .. }
        | Stmt::Continue { .. }
        | Stmt::Throw { .. }
        | Stmt::Empty { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(source: &str) -> Value {
        Interpreter::new().run(source).unwrap()
    }

    #[test]
    fn test_run_returns_last_expression() {
        assert_eq!(run("var a = 2; a * 21;"), Value::Number(42.0));
        assert_eq!(run("var a = 2;"), Value::Undefined);
    }

    #[test]
    fn test_compile_and_call_with_this() {
        let mut interp = Interpreter::new();
        let params = vec!["x".to_string()];
        let function = interp.compile(&params, "return this.base + x;").unwrap();
        let context = interp.run("({ base: 10 });").unwrap();

        let result = interp
            .call_function(&function, context, vec![Value::Number(5.0)], SourceLocation::default())
            .unwrap();
        assert_eq!(result, Value::Number(15.0));
    }

    #[test]
    fn test_function_declarations_are_hoisted() {
        assert_eq!(run("var r = f(); function f() { return 3; } r;"), Value::Number(3.0));
    }

    #[test]
    fn test_closures_share_scope() {
        let source = "
            function counter() {
                var n = 0;
                return function () { n = n + 1; return n; };
            }
            var next = counter();
            next();
            next();
        ";
        assert_eq!(run(source), Value::Number(2.0));
    }

    #[test]
    fn test_recursion_depth_is_bounded() {
        let handle = std::thread::Builder::new()
            .stack_size(64 * 1024 * 1024)
            .spawn(|| {
                let err = Interpreter::new()
                    .run("function f() { return f(); } f();")
                    .unwrap_err();
                matches!(err, RuntimeError::StackOverflow { .. })
            })
            .unwrap();
        assert!(handle.join().unwrap());
    }

    #[test]
    fn test_top_level_return_is_rejected() {
        let err = Interpreter::new().run("return 1;").unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidBreak { keyword: "return", .. }));
    }

    #[test]
    fn test_compile_reports_parse_errors() {
        let mut interp = Interpreter::new();
        assert!(interp.compile(&[], "var = 1;").is_err());
    }
}
