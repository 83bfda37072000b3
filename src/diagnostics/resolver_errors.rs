use super::error_code::{ErrorCode, ErrorType};

// ===== Registration (E100-E199) =====

pub const RUNTIME_FINALIZED: ErrorCode = ErrorCode {
    code: "E100",
    title: "RUNTIME FINALIZED",
    error_type: ErrorType::Registration,
    message: "Cannot {}: the runtime has already been finalized.",
    hint: Some("Register every builtin package and value before calling finalize."),
};

pub const DUPLICATE_PACKAGE: ErrorCode = ErrorCode {
    code: "E101",
    title: "DUPLICATE PACKAGE",
    error_type: ErrorType::Registration,
    message: "Duplicate builtin package `{}`.",
    hint: None,
};

pub const DUPLICATE_BUILTIN_VALUE: ErrorCode = ErrorCode {
    code: "E102",
    title: "DUPLICATE BUILTIN VALUE",
    error_type: ErrorType::Registration,
    message: "Duplicate registration for builtin `{}.{}`.",
    hint: Some("Use replace_package_value to override an existing registration."),
};

pub const MISSING_BUILTIN_VALUE: ErrorCode = ErrorCode {
    code: "E103",
    title: "MISSING BUILTIN VALUE",
    error_type: ErrorType::Registration,
    message: "Missing builtin `{}.{}`: nothing to replace.",
    hint: Some("Use register_package_value for the first registration."),
};

pub const RUNTIME_NOT_FINALIZED: ErrorCode = ErrorCode {
    code: "E104",
    title: "RUNTIME NOT FINALIZED",
    error_type: ErrorType::Registration,
    message: "Cannot {}: the runtime is not finalized.",
    hint: None,
};

// ===== Package resolution (E200-E299) =====

pub const UNKNOWN_PACKAGE: ErrorCode = ErrorCode {
    code: "E200",
    title: "UNKNOWN PACKAGE",
    error_type: ErrorType::Resolution,
    message: "Unknown builtin package `{}` imported by `{}`.",
    hint: None,
};

pub const IMPORT_CYCLE: ErrorCode = ErrorCode {
    code: "E201",
    title: "IMPORT CYCLE",
    error_type: ErrorType::Resolution,
    message: "Import cycle between builtin packages: {}.",
    hint: Some("Builtin packages must form an acyclic import graph."),
};

pub const MALFORMED_PACKAGE: ErrorCode = ErrorCode {
    code: "E202",
    title: "MALFORMED PACKAGE",
    error_type: ErrorType::Resolution,
    message: "Failed to parse builtin package `{}`: {}",
    hint: None,
};

pub const BUILTIN_MISMATCH: ErrorCode = ErrorCode {
    code: "E203",
    title: "BUILTIN MISMATCH",
    error_type: ErrorType::Resolution,
    message: "Builtin package `{}`: missing builtin values [{}], extra builtin values [{}].",
    hint: Some("Every `builtin` declaration needs exactly one registered value."),
};

pub const MISSING_PRELUDE_PACKAGE: ErrorCode = ErrorCode {
    code: "E204",
    title: "MISSING PRELUDE PACKAGE",
    error_type: ErrorType::Resolution,
    message: "Prelude package `{}` was never registered.",
    hint: None,
};

pub const PACKAGE_EVALUATION_FAILED: ErrorCode = ErrorCode {
    code: "E205",
    title: "PACKAGE EVALUATION FAILED",
    error_type: ErrorType::Resolution,
    message: "Failed to evaluate builtin package `{}`: {}",
    hint: None,
};

// ===== Evaluation (E300-E399) =====

pub const UNDEFINED_IDENTIFIER: ErrorCode = ErrorCode {
    code: "E300",
    title: "UNDEFINED IDENTIFIER",
    error_type: ErrorType::Evaluation,
    message: "Undefined identifier `{}`.",
    hint: None,
};

pub const TYPE_MISMATCH: ErrorCode = ErrorCode {
    code: "E301",
    title: "TYPE MISMATCH",
    error_type: ErrorType::Evaluation,
    message: "Argument `{}` must be {}, got {}.",
    hint: None,
};

pub const MISSING_ARGUMENT: ErrorCode = ErrorCode {
    code: "E302",
    title: "MISSING ARGUMENT",
    error_type: ErrorType::Evaluation,
    message: "Missing required argument `{}`.",
    hint: None,
};

pub const UNUSED_ARGUMENTS: ErrorCode = ErrorCode {
    code: "E303",
    title: "UNUSED ARGUMENTS",
    error_type: ErrorType::Evaluation,
    message: "Function `{}` does not take arguments [{}].",
    hint: None,
};

pub const NOT_A_FUNCTION: ErrorCode = ErrorCode {
    code: "E304",
    title: "NOT A FUNCTION",
    error_type: ErrorType::Evaluation,
    message: "Cannot call a value of type {}.",
    hint: None,
};

pub const UNKNOWN_MEMBER: ErrorCode = ErrorCode {
    code: "E305",
    title: "UNKNOWN MEMBER",
    error_type: ErrorType::Evaluation,
    message: "{} has no member `{}`.",
    hint: None,
};

pub const IMPORT_NOT_FOUND: ErrorCode = ErrorCode {
    code: "E306",
    title: "IMPORT NOT FOUND",
    error_type: ErrorType::Evaluation,
    message: "Cannot import `{}`: no such package is available here.",
    hint: Some("A builtin package may only import packages that precede it."),
};

pub const BAD_EXPRESSION: ErrorCode = ErrorCode {
    code: "E307",
    title: "BAD EXPRESSION",
    error_type: ErrorType::Evaluation,
    message: "Cannot evaluate malformed syntax: {}",
    hint: None,
};

// ===== Specification (E400-E499) =====

pub const DUPLICATE_OPERATION: ErrorCode = ErrorCode {
    code: "E400",
    title: "DUPLICATE OPERATION",
    error_type: ErrorType::Specification,
    message: "Found duplicate operation ID `{}`.",
    hint: None,
};

pub const UNKNOWN_PARENT_OPERATION: ErrorCode = ErrorCode {
    code: "E401",
    title: "UNKNOWN PARENT OPERATION",
    error_type: ErrorType::Specification,
    message: "Edge references unknown parent operation `{}`.",
    hint: None,
};

pub const UNKNOWN_CHILD_OPERATION: ErrorCode = ErrorCode {
    code: "E402",
    title: "UNKNOWN CHILD OPERATION",
    error_type: ErrorType::Specification,
    message: "Edge references unknown child operation `{}`.",
    hint: None,
};

pub const NO_ROOT_NODES: ErrorCode = ErrorCode {
    code: "E403",
    title: "NO ROOT NODES",
    error_type: ErrorType::Specification,
    message: "Query has no root nodes.",
    hint: None,
};

pub const OPERATION_CYCLE: ErrorCode = ErrorCode {
    code: "E404",
    title: "OPERATION CYCLE",
    error_type: ErrorType::Specification,
    message: "Found cycle in query at operation `{}`.",
    hint: None,
};

pub const MISSING_NOW: ErrorCode = ErrorCode {
    code: "E405",
    title: "MISSING NOW",
    error_type: ErrorType::Specification,
    message: "Query must specify an absolute now time.",
    hint: None,
};

pub const NO_STREAMING_DATA: ErrorCode = ErrorCode {
    code: "E406",
    title: "NO STREAMING DATA",
    error_type: ErrorType::Specification,
    message: "This script returns no streaming data.",
    hint: Some(
        "Consider adding a `yield` or invoking streaming functions directly, without performing an assignment.",
    ),
};
