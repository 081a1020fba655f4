//! Error types and diagnostic reporting

use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream, WriteColor};
use thiserror::Error;
use super::Span;

/// Tool error, with a source location where one exists
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Parse error at {span:?}: {message}")]
    Parse { message: String, span: Span },

    #[error("Invalid object file: {message}")]
    Object { message: String },

    #[error("Invalid configuration: {message}")]
    Config { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

impl ToolError {
    pub fn parse(message: impl Into<String>, span: Span) -> Self {
        Self::Parse {
            message: message.into(),
            span,
        }
    }

    pub fn object(message: impl Into<String>) -> Self {
        Self::Object {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

pub type ToolResult<T> = Result<T, ToolError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A located problem found in a C source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub severity: Severity,
    pub message: String,
    /// Short text attached to the primary label
    pub label: String,
    pub span: Span,
    pub notes: Vec<String>,
}

impl Finding {
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Diagnostic reporter for pretty error output
pub struct DiagnosticReporter {
    files: SimpleFiles<String, String>,
    writer: Box<dyn WriteColor>,
    config: term::Config,
}

impl DiagnosticReporter {
    pub fn new() -> Self {
        Self::with_writer(Box::new(StandardStream::stderr(ColorChoice::Auto)))
    }

    /// Reporter that renders into an arbitrary sink, e.g. a buffer in tests
    pub fn with_writer(writer: Box<dyn WriteColor>) -> Self {
        Self {
            files: SimpleFiles::new(),
            writer,
            config: term::Config::default(),
        }
    }

    pub fn add_file(&mut self, name: impl Into<String>, source: impl Into<String>) -> usize {
        self.files.add(name.into(), source.into())
    }

    pub fn report_error(&mut self, file_id: usize, error: &ToolError) {
        let diagnostic = match error {
            ToolError::Parse { message, span } => Diagnostic::error()
                .with_message("Parse error")
                .with_labels(vec![
                    Label::primary(file_id, span.range()).with_message(message)
                ]),

            ToolError::Object { message } => {
                Diagnostic::error().with_message(format!("Invalid object file: {}", message))
            }

            ToolError::Config { message } => {
                Diagnostic::error().with_message(format!("Invalid configuration: {}", message))
            }

            ToolError::Io(err) => {
                Diagnostic::error().with_message(format!("IO error: {}", err))
            }

            ToolError::Walk(err) => {
                Diagnostic::error().with_message(format!("Directory walk error: {}", err))
            }
        };

        self.emit(&diagnostic);
    }

    pub fn report_finding(&mut self, file_id: usize, finding: &Finding) {
        let diagnostic = match finding.severity {
            Severity::Error => Diagnostic::error(),
            Severity::Warning => Diagnostic::warning(),
        };
        let diagnostic = diagnostic
            .with_message(&finding.message)
            .with_labels(vec![
                Label::primary(file_id, finding.span.range()).with_message(&finding.label)
            ])
            .with_notes(finding.notes.clone());

        self.emit(&diagnostic);
    }

    fn emit(&mut self, diagnostic: &Diagnostic<usize>) {
        // Nothing sensible to do if stderr itself is gone
        let _ = term::emit(&mut *self.writer, &self.config, &self.files, diagnostic);
    }
}

impl Default for DiagnosticReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codespan_reporting::term::termcolor::NoColor;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    /// Shared buffer so the test can read what the reporter wrote
    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn reporter() -> (DiagnosticReporter, Capture) {
        let capture = Capture::default();
        let reporter = DiagnosticReporter::with_writer(Box::new(NoColor::new(capture.clone())));
        (reporter, capture)
    }

    fn output(capture: &Capture) -> String {
        String::from_utf8(capture.0.lock().unwrap().clone()).unwrap()
    }

    #[test]
    fn test_report_finding_renders_label_and_note() {
        let (mut reporter, capture) = reporter();
        let id = reporter.add_file("a.c", "typedef int u8;\n");
        reporter.report_finding(id, &Finding {
            severity: Severity::Error,
            message: "conflicting definition of `u8`".into(),
            label: "signed 32-bit here".into(),
            span: Span::new(12, 14),
            notes: vec!["expected unsigned 8-bit".into()],
        });

        let text = output(&capture);
        assert!(text.contains("error: conflicting definition of `u8`"));
        assert!(text.contains("a.c:1:13"));
        assert!(text.contains("signed 32-bit here"));
        assert!(text.contains("expected unsigned 8-bit"));
    }

    #[test]
    fn test_report_warning_and_parse_error() {
        let (mut reporter, capture) = reporter();
        let id = reporter.add_file("b.lst", "80003100:a:b\n");
        reporter.report_finding(id, &Finding {
            severity: Severity::Warning,
            message: "redundant definition".into(),
            label: String::new(),
            span: Span::new(4, 5),
            notes: vec![],
        });
        reporter.report_error(id, &ToolError::parse("more than one `:`", Span::new(0, 12)));
        reporter.report_error(id, &ToolError::object("no .symtab section name"));

        let text = output(&capture);
        assert!(text.contains("warning: redundant definition"));
        assert!(text.contains("error: Parse error"));
        assert!(text.contains("b.lst:1:1"));
        assert!(text.contains("more than one `:`"));
        assert!(text.contains("error: Invalid object file: no .symtab section name"));
    }

    #[test]
    fn test_error_display() {
        let err = ToolError::config("game id must not be empty");
        assert_eq!(err.to_string(), "Invalid configuration: game id must not be empty");
    }
}
