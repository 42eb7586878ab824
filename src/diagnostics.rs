//! Unified, `miette`-based diagnostics for the plotscript interpreter.
//!
//! Evaluation has exactly one failure mode, [`SemanticError`], which carries a
//! human-readable message. The reader reports [`ParseError`] with the source text
//! and a labelled span, and scene extraction reports [`RenderError`]. The
//! [`PlotscriptError`] umbrella is what the session and the CLI hand back to callers;
//! it also carries the CLI's I/O and JSON failures so they never read as
//! evaluation errors.
//!
//! # Error Construction
//!
//! - **Use `semantic_err!` for evaluation failures.**
//!   - `semantic_err!("unknown symbol '{}'", name)`
//!
//! - **Never build a `SemanticError` with a pre-formatted "Error:" prefix.**
//!   The `Display` impl adds it, so REPL output reads `Error: <message>`.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

// ============================================================================
// SEMANTIC ERRORS
// ============================================================================

/// The single evaluation error kind.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("Error: {message}")]
#[diagnostic(code(plotscript::semantic))]
pub struct SemanticError {
    pub message: String,
}

impl SemanticError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The message without the `Error:` prefix.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Constructs a [`SemanticError`] from a format string.
#[macro_export]
macro_rules! semantic_err {
    ($msg:expr) => {
        $crate::diagnostics::SemanticError::new(format!("{}", $msg))
    };
    ($fmt:expr, $($arg:expr),+ $(,)?) => {
        $crate::diagnostics::SemanticError::new(format!($fmt, $($arg),+))
    };
}

// ============================================================================
// PARSE ERRORS
// ============================================================================

/// Reader failure, carrying the offending source for labelled reports.
#[derive(Debug, Error, Diagnostic)]
#[error("Error: Invalid Expression. Could not parse.")]
#[diagnostic(code(plotscript::parse))]
pub struct ParseError {
    #[source_code]
    pub src: NamedSource<String>,
    #[label("{reason}")]
    pub span: SourceSpan,
    pub reason: String,
    #[help]
    pub help: Option<String>,
}

impl ParseError {
    pub fn new(source: &str, span: SourceSpan, reason: impl Into<String>) -> Self {
        Self {
            src: NamedSource::new("input", source.to_string()),
            span,
            reason: reason.into(),
            help: None,
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

// ============================================================================
// RENDER ERRORS
// ============================================================================

/// A property-bearing result whose shape does not match its `object-name`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("Error: cannot render {object}: {reason}")]
#[diagnostic(code(plotscript::render))]
pub struct RenderError {
    pub object: String,
    pub reason: String,
}

impl RenderError {
    pub fn new(object: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            object: object.into(),
            reason: reason.into(),
        }
    }
}

// ============================================================================
// UMBRELLA
// ============================================================================

#[derive(Debug, Error, Diagnostic)]
pub enum PlotscriptError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Semantic(#[from] SemanticError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Render(#[from] RenderError),

    #[error("Error: I/O failure: {0}")]
    #[diagnostic(code(plotscript::io))]
    Io(#[from] std::io::Error),

    #[error("Error: cannot serialize scene: {0}")]
    #[diagnostic(code(plotscript::json))]
    Json(#[from] serde_json::Error),
}

impl PlotscriptError {
    pub fn is_parse(&self) -> bool {
        matches!(self, PlotscriptError::Parse(_))
    }

    pub fn is_semantic(&self) -> bool {
        matches!(self, PlotscriptError::Semantic(_))
    }
}

#[cfg(test)]
mod diagnostics_tests {
    use miette::Report;

    use super::*;

    #[test]
    fn semantic_error_display_has_prefix() {
        let err = semantic_err!("unknown symbol '{}'", "foo");
        assert_eq!(err.to_string(), "Error: unknown symbol 'foo'");
        assert_eq!(err.message(), "unknown symbol 'foo'");
    }

    #[test]
    fn parse_error_report_carries_label_and_help() {
        let err = ParseError::new("(f", SourceSpan::from((2, 0)), "unclosed expression")
            .with_help("add the missing ')'");
        let report = Report::new(err);
        let output = format!("{report:?}");
        assert!(output.contains("Could not parse"));
        assert!(output.contains("unclosed expression"));
        assert!(output.contains("add the missing ')'"));
    }

    #[test]
    fn umbrella_is_transparent() {
        let err: PlotscriptError = semantic_err!("zero arguments to begin").into();
        assert!(err.is_semantic());
        assert!(!err.is_parse());
        assert_eq!(err.to_string(), "Error: zero arguments to begin");
    }

    #[test]
    fn io_failures_are_not_semantic() {
        let err: PlotscriptError = std::io::Error::other("broken pipe").into();
        assert!(!err.is_semantic());
        assert!(matches!(err, PlotscriptError::Io(_)));
        assert_eq!(err.to_string(), "Error: I/O failure: broken pipe");
    }

    #[test]
    fn json_failures_keep_their_own_variant() {
        let err: PlotscriptError = serde_json::from_str::<u8>("nope").unwrap_err().into();
        assert!(matches!(err, PlotscriptError::Json(_)));
        assert!(err.to_string().starts_with("Error: cannot serialize scene:"));
    }
}
