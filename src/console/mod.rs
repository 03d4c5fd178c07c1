// Captured `console.log` output

use crate::parser::ast::SourceLocation;

/// Sink for `console.log`, kept in memory so the front end can show it
#[derive(Debug, Clone, Default)]
pub struct Console {
    pub lines: Vec<ConsoleLine>,
}

impl Console {
    pub fn new() -> Self {
        Console { lines: Vec::new() }
    }

    /// Append one logged message
    pub fn log(&mut self, text: String, location: SourceLocation) {
        self.lines.push(ConsoleLine { text, location });
    }

    /// Get all lines as a vector of strings
    pub fn get_output(&self) -> Vec<String> {
        self.lines
            .iter()
            .flat_map(|line| line.text.split('\n').map(|s| s.to_string()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

/// A logged message with the location of the call that produced it
#[derive(Debug, Clone)]
pub struct ConsoleLine {
    pub text: String,
    pub location: SourceLocation,
}
