//! Output formatting utilities
//!
//! Formatters for human-readable and JSON output, plus record rendering.

mod formatter;
mod table;

pub use formatter::Formatter;
pub use table::records_table;

/// Output configuration derived from CLI flags
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    /// Use JSON output format
    pub json: bool,
    /// Disable colored output
    pub no_color: bool,
    /// Suppress non-error output
    pub quiet: bool,
}
