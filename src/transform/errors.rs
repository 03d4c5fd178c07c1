use thiserror::Error;

/// Errors raised by the [`Ast`](super::Ast) facade
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    /// The tree handed to `parse_syntax` is missing or is not a `Program`
    #[error("provided syntax root must be a Program node, found {found}")]
    InvalidSyntaxRoot { found: String },

    /// An operation needed a tree before `parse_syntax` supplied one
    #[error("no syntax tree has been loaded")]
    MissingSyntax,

    #[error("invalid pragma pattern: {0}")]
    Pattern(#[from] regex::Error),
}
