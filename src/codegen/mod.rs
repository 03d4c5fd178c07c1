//! Source code generation
//!
//! Renders a syntax tree back into source text that the [`parser`](crate::parser)
//! accepts:
//! - [`statements`]: statement layout, blocks and indentation
//! - [`expressions`]: operator precedence and parenthesization
//!
//! # Guarantees
//!
//! Parsing the generated text yields a tree equal to the input apart from
//! source locations. Parentheses are emitted only where precedence,
//! associativity or statement-start ambiguity (`function`, `{`) require them.

mod expressions;
mod statements;

use crate::parser::ast::Program;

/// Default number of spaces per indentation level
pub const DEFAULT_INDENT: usize = 4;

/// Code generator configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generator {
    pub indent: usize,
}

impl Generator {
    pub fn new(indent: usize) -> Self {
        Generator { indent }
    }

    /// Render a whole program, one top-level statement per line
    pub fn generate(&self, program: &Program) -> String {
        let mut printer = Printer::new(self.indent);
        for stmt in &program.body {
            printer.statement(stmt);
        }
        printer.out
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(DEFAULT_INDENT)
    }
}

/// Output buffer plus the current nesting level
pub(crate) struct Printer {
    pub(crate) out: String,
    indent_width: usize,
    level: usize,
}

impl Printer {
    fn new(indent_width: usize) -> Self {
        Printer {
            out: String::new(),
            indent_width,
            level: 0,
        }
    }

    pub(crate) fn write(&mut self, text: &str) {
        self.out.push_str(text);
    }

    /// Start a new line at the current nesting level
    pub(crate) fn write_indent(&mut self) {
        let width = self.indent_width * self.level;
        self.out.extend(std::iter::repeat(' ').take(width));
    }

    pub(crate) fn newline(&mut self) {
        self.out.push('\n');
    }

    pub(crate) fn indented<F: FnOnce(&mut Self)>(&mut self, f: F) {
        self.level += 1;
        f(self);
        self.level -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn round_trip(source: &str) -> (String, String) {
        let generator = Generator::default();
        let first = generator.generate(&Parser::new(source).unwrap().parse_program().unwrap());
        let second = generator.generate(&Parser::new(&first).unwrap().parse_program().unwrap());
        (first, second)
    }

    #[test]
    fn test_layout() {
        let (text, _) = round_trip("var a=1,b;if(a){b=2}else b=3;function f(x){return x*2}");
        assert_eq!(
            text,
            "var a = 1, b;\n\
             if (a) {\n    b = 2;\n} else\n    b = 3;\n\
             function f(x) {\n    return x * 2;\n}\n"
        );
    }

    #[test]
    fn test_indent_width_is_configurable() {
        let program = Parser::new("if (a) { b(); }").unwrap().parse_program().unwrap();
        assert_eq!(Generator::new(2).generate(&program), "if (a) {\n  b();\n}\n");
    }

    #[test]
    fn test_round_trip_is_stable() {
        let sources = [
            "a = (1 + 2) * 3 - (4 - 5);",
            "x = a ? b : c ? d : e;",
            "(a ? b : c) ? d : e;",
            "(function () { return 1; })();",
            "({ a: 1 }).a;",
            "y = - -x + +(+z) - -1;",
            "o['key with space'] = [1, 'two', { 'three': 3 }];",
            "for (var i = 0; i < 3; i++) { if (i) continue; else break; }",
            "do x--; while (x > 0);",
            "\"use strict\";\nvar s = 'quote \" and \\\\ and \\n';",
            "f = function named(a, b) { return typeof a === 'string' && !b; };",
            "a = b = c;",
            "(a = 1) + 2;",
            "(1).toString;",
            "void 0;",
            "(a || b) && c;",
            "a - (b - c);",
            "a / (b * c);",
        ];

        for source in sources {
            let (first, second) = round_trip(source);
            assert_eq!(first, second, "unstable output for {:?}", source);
        }
    }

    #[test]
    fn test_precedence_parentheses_are_preserved() {
        let (text, _) = round_trip("a - (b - c); (a - b) - c; (a || b) && c;");
        assert_eq!(text, "a - (b - c);\na - b - c;\n(a || b) && c;\n");
    }

    #[test]
    fn test_statement_start_ambiguity() {
        let (text, _) = round_trip("(function () {})(); ({ a: 1 }).a;");
        assert_eq!(text, "(function () {}());\n({ a: 1 }.a);\n");
    }
}
