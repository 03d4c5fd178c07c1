// Constants for the script engine

/// Deepest nesting of script function calls before `StackOverflow` is reported
pub const MAX_CALL_DEPTH: usize = 100;

/// Longest array the engine will materialize; arrays are dense, so a write
/// past this length fails with `InvalidArrayLength` instead of allocating
pub const MAX_ARRAY_LENGTH: usize = 1 << 24;

/// Name under which the global `eval` is bound; a call through this exact
/// identifier evaluates in the caller's scope
pub const EVAL_NAME: &str = "eval";

/// Name of the global console object
pub const CONSOLE_NAME: &str = "console";
