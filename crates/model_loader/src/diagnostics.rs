//! Diagnostic collection for best-effort file loading
//!
//! The model loaders never throw for recoverable problems. Instead every
//! entry point returns a [`FileLoadResult`] pairing a possibly-partial
//! model with the ordered sequence of [`Diagnostic`]s gathered while
//! reading it. Callers should inspect the diagnostics even when a load
//! "succeeds".

use std::error::Error;
use std::fmt;

/// Severity of a diagnostic raised during a file load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The data was understood but something about it is suspect
    /// (unknown directive, dangling material reference, ...).
    Warning,
    /// A piece of the file could not be used; loading continued without it.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Cause type attached to diagnostics that wrap an underlying failure.
pub type DiagnosticCause = Box<dyn Error + Send + Sync + 'static>;

/// A severity-tagged message describing a parse anomaly.
///
/// Diagnostics never abort parsing; they accumulate in file order on the
/// [`FileLoadResult`] produced by the load.
#[derive(Debug)]
pub struct Diagnostic {
    /// How serious the problem is
    pub severity: Severity,
    /// The file the diagnostic refers to, when known
    pub file_name: Option<String>,
    /// 1-based line number within the file, when the problem has one
    pub line_number: Option<u64>,
    /// Human-readable description
    pub details: String,
    /// The underlying failure, when the diagnostic wraps one
    pub cause: Option<DiagnosticCause>,
}

impl Diagnostic {
    /// Create a warning diagnostic.
    pub fn warning(
        file_name: Option<&str>,
        line_number: Option<u64>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Warning,
            file_name: file_name.map(str::to_owned),
            line_number,
            details: details.into(),
            cause: None,
        }
    }

    /// Create an error diagnostic.
    pub fn error(
        file_name: Option<&str>,
        line_number: Option<u64>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Error,
            file_name: file_name.map(str::to_owned),
            line_number,
            details: details.into(),
            cause: None,
        }
    }

    /// Attach the underlying failure that produced this diagnostic.
    #[must_use]
    pub fn with_cause(mut self, cause: impl Into<DiagnosticCause>) -> Self {
        self.cause = Some(cause.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.severity)?;
        if let Some(ref file) = self.file_name {
            write!(f, " [{}", file)?;
            if let Some(line) = self.line_number {
                write!(f, ":{}", line)?;
            }
            write!(f, "]")?;
        } else if let Some(line) = self.line_number {
            write!(f, " [line {}]", line)?;
        }
        write!(f, ": {}", self.details)?;
        if let Some(ref cause) = self.cause {
            write!(f, " ({})", cause)?;
        }
        Ok(())
    }
}

/// A possibly-partial model paired with the diagnostics gathered while
/// loading it.
#[derive(Debug)]
pub struct FileLoadResult<T> {
    /// The loaded (best-effort) model
    pub model: T,
    /// Diagnostics in the order they were raised
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> FileLoadResult<T> {
    /// Pair a model with its diagnostics.
    pub fn new(model: T, diagnostics: Vec<Diagnostic>) -> Self {
        Self { model, diagnostics }
    }

    /// True if any diagnostic has [`Severity::Error`].
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Iterate over the error diagnostics.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
    }

    /// Iterate over the warning diagnostics.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    /// Split into the model and its diagnostics.
    pub fn into_parts(self) -> (T, Vec<Diagnostic>) {
        (self.model, self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_file_and_line() {
        let diag = Diagnostic::error(Some("model.obj"), Some(12), "bad vertex");
        assert_eq!(diag.to_string(), "error [model.obj:12]: bad vertex");
    }

    #[test]
    fn test_display_with_cause() {
        let cause: DiagnosticCause = "twelve".parse::<f32>().unwrap_err().into();
        let diag = Diagnostic::error(None, None, "bad float").with_cause(cause);
        let rendered = diag.to_string();
        assert!(rendered.starts_with("error: bad float ("));
    }

    #[test]
    fn test_result_severity_queries() {
        let result = FileLoadResult::new(
            (),
            vec![
                Diagnostic::warning(None, Some(1), "odd"),
                Diagnostic::error(None, Some(2), "broken"),
            ],
        );
        assert!(result.has_errors());
        assert_eq!(result.warnings().count(), 1);
        assert_eq!(result.errors().count(), 1);
    }

    #[test]
    fn test_result_without_errors() {
        let result = FileLoadResult::new(0_u32, vec![Diagnostic::warning(None, None, "odd")]);
        assert!(!result.has_errors());
        let (model, diagnostics) = result.into_parts();
        assert_eq!(model, 0);
        assert_eq!(diagnostics.len(), 1);
    }
}
