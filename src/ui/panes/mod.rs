//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`source`]: Function text with syntax highlighting and the next-step line
//! - [`steps`]: The linearized steps with their jump annotations
//! - [`locals`]: Bindings of the stepped function's scope and evaluated expressions
//! - [`console`]: Output of `console.log`
//! - [`status`]: Status bar with keybindings, position and the evaluate prompt
//! - `utils`: Shared border and value styling
//!
//! Each pane module exports a `render_*` function; panes own no state beyond
//! the scroll offsets their caller passes in.

mod utils;

pub mod console;
pub mod locals;
pub mod source;
pub mod status;
pub mod steps;

pub use console::render_console_pane;
pub use locals::{render_locals_pane, Evaluation, LocalsRenderData};
pub use source::{render_source_pane, SourceScrollState};
pub use status::{render_status_bar, StatusRenderData};
pub use steps::{render_steps_pane, step_labels, StepLabel};
