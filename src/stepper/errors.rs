use crate::interpreter::RuntimeError;
use crate::parser::ParseError;
use crate::transform::TransformError;
use thiserror::Error;

/// Everything a [`Stepper`](super::Stepper) operation can fail with
#[derive(Debug, Error)]
pub enum StepperError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    /// A script error raised by a step, the compiled function or the
    /// evaluator, passed through unchanged
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error(transparent)]
    Pattern(#[from] regex::Error),

    /// The text handed to `parse` does not look like a function
    #[error("not a function: {reason}")]
    MalformedFunction { reason: String },

    #[error("no function has been parsed")]
    NotCompiled,

    #[error("the parsed function has not been called")]
    NotCalled,

    #[error("no step left to run (position {position} of {len})")]
    EndOfSteps { position: usize, len: usize },

    #[error("cannot move to position {target}: steps span 0..={len}")]
    OutOfBounds { target: isize, len: usize },

    /// The compiled function did not return `{ evaluator, statementWrappers }`
    #[error("compiled function returned an unexpected value: {found}")]
    MalformedArtifact { found: String },
}

impl StepperError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        StepperError::MalformedFunction {
            reason: reason.into(),
        }
    }
}
