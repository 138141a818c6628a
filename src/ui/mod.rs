//! User interface module - terminal output for the binary.

pub mod formatter;

pub use formatter::{display_error, display_success, display_values, format_values};
