//! Directive prologue entries
//!
//! A pragma is the text of a string-literal expression statement at the head
//! of a function body, such as `"use strict"`. [`PragmaList`] collects them in
//! source order.

mod list;

pub use list::PragmaList;

/// The text of one directive, without quotes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pragma {
    text: String,
}

impl Pragma {
    pub fn from_text(text: &str) -> Self {
        Pragma {
            text: text.to_string(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
