use super::error_code::ErrorCode;
use super::resolver_errors::*;

/// Central registry of all error codes
pub const ERROR_CODES: &[ErrorCode] = &[
    // Registration (E100-E199)
    RUNTIME_FINALIZED,
    DUPLICATE_PACKAGE,
    DUPLICATE_BUILTIN_VALUE,
    MISSING_BUILTIN_VALUE,
    RUNTIME_NOT_FINALIZED,
    // Package resolution (E200-E299)
    UNKNOWN_PACKAGE,
    IMPORT_CYCLE,
    MALFORMED_PACKAGE,
    BUILTIN_MISMATCH,
    MISSING_PRELUDE_PACKAGE,
    PACKAGE_EVALUATION_FAILED,
    // Evaluation (E300-E399)
    UNDEFINED_IDENTIFIER,
    TYPE_MISMATCH,
    MISSING_ARGUMENT,
    UNUSED_ARGUMENTS,
    NOT_A_FUNCTION,
    UNKNOWN_MEMBER,
    IMPORT_NOT_FOUND,
    BAD_EXPRESSION,
    // Specification (E400-E499)
    DUPLICATE_OPERATION,
    UNKNOWN_PARENT_OPERATION,
    UNKNOWN_CHILD_OPERATION,
    NO_ROOT_NODES,
    OPERATION_CYCLE,
    MISSING_NOW,
    NO_STREAMING_DATA,
];

/// Look up error code by code string (e.g., "E201", "E404")
pub fn lookup_error_code(code: &str) -> Option<&'static ErrorCode> {
    ERROR_CODES.iter().find(|item| item.code == code)
}
