use std::{error, fmt};

use super::{ErrorCode, ErrorType, format_message};

/// Placeholder file name used for diagnostics raised while compiling a query.
pub const QUERY_FILE: &str = "<query>";

/// A single error raised by the resolution pipeline.
///
/// `file` carries the builtin package path the error belongs to, or
/// [`QUERY_FILE`] for query-scoped failures. Wrapped errors keep the original
/// diagnostic as `cause`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub(crate) title: String,
    pub(crate) code: Option<String>,
    pub(crate) error_type: Option<ErrorType>,
    pub(crate) message: Option<String>,
    pub(crate) file: Option<String>,
    pub(crate) hints: Vec<String>,
    pub(crate) cause: Option<Box<Diagnostic>>,
}

impl Diagnostic {
    /// Generic error builder using ErrorCode specification
    pub fn make_error(err_spec: &'static ErrorCode, values: &[&str], file: impl Into<String>) -> Self {
        let message = format_message(err_spec.message, values);
        let hints = err_spec
            .hint
            .map(|hint| vec![format_message(hint, values)])
            .unwrap_or_default();

        Self {
            title: err_spec.title.to_string(),
            code: Some(err_spec.code.to_string()),
            error_type: Some(err_spec.error_type),
            message: Some(message),
            file: Some(file.into()),
            hints,
            cause: None,
        }
    }

    pub fn with_hint_text(mut self, text: impl Into<String>) -> Self {
        self.hints.push(text.into());
        self
    }

    pub fn with_cause(mut self, cause: Diagnostic) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    // Getters for read access
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn error_type(&self) -> Option<ErrorType> {
        self.error_type
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    pub fn cause(&self) -> Option<&Diagnostic> {
        self.cause.as_deref()
    }

    /// Whether this error leaves the runtime unusable rather than just the query.
    pub fn is_fatal(&self) -> bool {
        self.error_type.is_some_and(|t| t.is_fatal())
    }

    pub fn set_file(&mut self, file: impl Into<String>) {
        self.file = Some(file.into());
    }

    /// Multi-line rendering used by command line front ends.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let label = self
            .error_type
            .map(|t| t.prefix())
            .unwrap_or("Error")
            .to_ascii_lowercase();
        let code = self.code.as_deref().unwrap_or("E000");

        // Header: --> resolution error[E201]: IMPORT CYCLE
        out.push_str(&format!("--> {}[{}]: {}\n", label, code, self.title));
        if let Some(file) = self.file.as_deref().filter(|f| !f.is_empty()) {
            out.push_str(&format!("  in {}\n", file));
        }
        if let Some(message) = &self.message {
            out.push('\n');
            out.push_str(message);
            out.push('\n');
        }
        for hint in &self.hints {
            out.push_str(&format!("\nHint:\n  {}\n", hint));
        }
        if let Some(cause) = &self.cause {
            out.push_str("\nCaused by:\n");
            for line in cause.render().lines() {
                out.push_str("  ");
                out.push_str(line);
                out.push('\n');
            }
        }
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = self.code.as_deref().unwrap_or("E000");
        match &self.message {
            Some(message) => write!(f, "[{}] {}", code, message),
            None => write!(f, "[{}] {}", code, self.title),
        }
    }
}

impl error::Error for Diagnostic {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        self.cause.as_deref().map(|c| c as &(dyn error::Error + 'static))
    }
}
