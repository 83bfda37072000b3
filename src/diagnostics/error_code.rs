//! Error code types for the diagnostics system

/// Which stage of the pipeline raised an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum ErrorType {
    /// Defect in the embedding program's startup registrations.
    Registration,
    /// Broken standard library: unknown import, malformed package, mismatch.
    Resolution,
    /// Script evaluation failure.
    Evaluation,
    /// Structurally invalid query specification.
    Specification,
}

impl ErrorType {
    /// Returns the prefix string used in error headers
    pub fn prefix(&self) -> &'static str {
        match self {
            ErrorType::Registration => "Registration error",
            ErrorType::Resolution => "Resolution error",
            ErrorType::Evaluation => "Evaluation error",
            ErrorType::Specification => "Specification error",
        }
    }

    /// Registration and resolution failures leave no usable runtime behind.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ErrorType::Registration | ErrorType::Resolution)
    }
}

/// Error code with message template and optional hint
#[derive(Debug, Clone, Copy)]
pub struct ErrorCode {
    pub code: &'static str,
    pub title: &'static str,
    pub error_type: ErrorType,
    pub message: &'static str,
    pub hint: Option<&'static str>,
}
