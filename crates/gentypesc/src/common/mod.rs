//! Common infrastructure shared by the tool passes

mod error;
mod span;

pub use error::{DiagnosticReporter, Finding, Severity, ToolError, ToolResult};
pub use span::Span;
