//! Function text handling
//!
//! [`FunctionSource::split`] takes a function as written and separates its
//! parameter list from its body. Locations reported while stepping are in
//! body coordinates; [`FunctionSource::location_in_function`] maps them back
//! onto the function text.

use super::StepperError;
use crate::parser::ast::SourceLocation;
use crate::parser::lexer::{Lexer, Token};
use crate::parser::ParseError;
use regex::Regex;

const PARAMS_PATTERN: &str = r"\(([^\)]*)\)";
const HEADER_PATTERN: &str = r"^\s*function[\s\S]*?\{";
const TRAILER_PATTERN: &str = r"\}\s*$";

/// A function split into parameters and body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSource {
    pub params: Vec<String>,
    pub body: String,
    /// Line breaks between the start of the text and the body
    header_lines: usize,
    /// Characters in front of the body on its first line
    header_column: usize,
}

impl FunctionSource {
    /// Split `text` (`function name(a, b) { body }`) into its parts.
    ///
    /// The parameter list is the first parenthesized group. The body is what
    /// remains once the `function ... {` header and the final `}` are removed.
    pub fn split(text: &str) -> Result<Self, StepperError> {
        let params_text = Regex::new(PARAMS_PATTERN)?
            .captures(text)
            .and_then(|captures| captures.get(1))
            .ok_or_else(|| StepperError::malformed("missing parameter list"))?
            .as_str()
            .trim();
        let params = parse_params(params_text)?;

        let header = Regex::new(HEADER_PATTERN)?
            .find(text)
            .ok_or_else(|| StepperError::malformed("missing `function ... {` header"))?;
        let rest = &text[header.end()..];
        let trailer = Regex::new(TRAILER_PATTERN)?
            .find(rest)
            .ok_or_else(|| StepperError::malformed("missing closing brace"))?;

        let consumed = &text[..header.end()];
        let header_column = consumed
            .rsplit('\n')
            .next()
            .map_or(0, |line| line.chars().count());

        Ok(FunctionSource {
            params,
            body: rest[..trailer.start()].to_string(),
            header_lines: consumed.matches('\n').count(),
            header_column,
        })
    }

    /// Map a location in the body onto the function text
    pub fn location_in_function(&self, location: SourceLocation) -> SourceLocation {
        if location.line <= 1 {
            SourceLocation::new(1 + self.header_lines, location.column + self.header_column)
        } else {
            SourceLocation::new(location.line + self.header_lines, location.column)
        }
    }

    /// Move a parse error of the body onto the function text
    pub fn error_in_function(&self, err: ParseError) -> ParseError {
        ParseError {
            location: self.location_in_function(err.location),
            ..err
        }
    }
}

fn parse_params(text: &str) -> Result<Vec<String>, StepperError> {
    if text.is_empty() {
        return Ok(Vec::new());
    }
    text.split(',')
        .map(|param| {
            let param = param.trim();
            if is_identifier(param) {
                Ok(param.to_string())
            } else {
                Err(StepperError::malformed(format!(
                    "invalid parameter name `{}`",
                    param
                )))
            }
        })
        .collect()
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Cut one function out of a script.
///
/// With a `name`, picks `function name(...) {...}` or
/// `name = function (...) {...}`; without one, the first function in the
/// text.
pub fn extract_function(text: &str, name: Option<&str>) -> Result<String, StepperError> {
    let tokens = Lexer::new(text).tokenize().map_err(ParseError::from)?;

    let is_named = |index: usize| match name {
        None => true,
        Some(name) => {
            let declared = matches!(tokens.get(index + 1), Some(Token::Ident(id, _)) if id == name);
            let assigned = index >= 2
                && matches!(tokens[index - 1], Token::Eq(_))
                && matches!(&tokens[index - 2], Token::Ident(id, _) if id == name);
            declared || assigned
        }
    };
    let start = (0..tokens.len())
        .find(|&index| matches!(tokens[index], Token::Function(_)) && is_named(index))
        .ok_or_else(|| match name {
            Some(name) => StepperError::malformed(format!("no function named `{}`", name)),
            None => StepperError::malformed("no function found"),
        })?;

    let mut depth = 0usize;
    let mut end = None;
    for token in &tokens[start..] {
        match token {
            Token::LBrace(_) => depth += 1,
            Token::RBrace(location) => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    end = Some(*location);
                    break;
                }
            }
            _ => {}
        }
    }
    let end = end.ok_or_else(|| StepperError::malformed("unterminated function body"))?;

    let from = byte_offset(text, tokens[start].location());
    let to = byte_offset(text, end);
    match (from, to) {
        // `}` is one byte wide
        (Some(from), Some(to)) => Ok(text[from..=to].to_string()),
        _ => Err(StepperError::malformed("function location outside the text")),
    }
}

/// Byte index of a lexer location (1-based line, 1-based character column)
fn byte_offset(text: &str, location: SourceLocation) -> Option<usize> {
    let (mut line, mut column) = (1, 1);
    for (index, c) in text.char_indices() {
        if line == location.line && column == location.column {
            return Some(index);
        }
        if c == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_function() {
        let source = FunctionSource::split("function add( a, b ) {\n    return a + b;\n}").unwrap();
        assert_eq!(source.params, vec!["a", "b"]);
        assert_eq!(source.body, "\n    return a + b;\n");
    }

    #[test]
    fn test_split_anonymous_without_params() {
        let source = FunctionSource::split("  function () { x = 1; }  \n").unwrap();
        assert!(source.params.is_empty());
        assert_eq!(source.body, " x = 1; ");
    }

    #[test]
    fn test_split_rejects_malformed_text() {
        assert!(matches!(
            FunctionSource::split("x = 1;"),
            Err(StepperError::MalformedFunction { .. })
        ));
        assert!(matches!(
            FunctionSource::split("function (a) { x = 1;"),
            Err(StepperError::MalformedFunction { .. })
        ));
        assert!(matches!(
            FunctionSource::split("function (a, 1b) {}"),
            Err(StepperError::MalformedFunction { .. })
        ));
    }

    #[test]
    fn test_location_mapping() {
        let source = FunctionSource::split("function f() { a = 1;\n  b = 2;\n}").unwrap();
        // body starts right after `{` on line 1
        assert_eq!(
            source.location_in_function(SourceLocation::new(1, 2)),
            SourceLocation::new(1, 16)
        );
        assert_eq!(
            source.location_in_function(SourceLocation::new(2, 3)),
            SourceLocation::new(2, 3)
        );

        let source = FunctionSource::split("\nfunction f()\n{\n  a = 1;\n}").unwrap();
        assert_eq!(
            source.location_in_function(SourceLocation::new(2, 3)),
            SourceLocation::new(4, 3)
        );
    }

    #[test]
    fn test_extract_function() {
        let text = "var x = 1;\nfunction first() { if (x) { x = 2; } }\nvar second = function (a) {\n  return a;\n};\n";
        assert_eq!(
            extract_function(text, None).unwrap(),
            "function first() { if (x) { x = 2; } }"
        );
        assert_eq!(
            extract_function(text, Some("second")).unwrap(),
            "function (a) {\n  return a;\n}"
        );
        assert!(matches!(
            extract_function(text, Some("third")),
            Err(StepperError::MalformedFunction { .. })
        ));
    }
}
