use super::{
    BUILTIN_MISMATCH, Diagnostic, ERROR_CODES, ErrorType, IMPORT_CYCLE, NO_ROOT_NODES,
    UNKNOWN_PACKAGE, format_message, lookup_error_code,
};

#[test]
fn format_message_replaces_placeholders() {
    let msg = format_message("Expected {}, got {}.", &["Int", "String"]);
    assert_eq!(msg, "Expected Int, got String.");
}

#[test]
fn format_message_leaves_missing_values_untouched() {
    let msg = format_message("{} and {}", &["a"]);
    assert_eq!(msg, "a and {}");
}

#[test]
fn format_message_inserts_values_verbatim() {
    let msg = format_message("Package `{}` imports `{}`.", &["tmpl/{}", "b"]);
    assert_eq!(msg, "Package `tmpl/{}` imports `b`.");
}

#[test]
fn error_codes_are_unique() {
    for (i, left) in ERROR_CODES.iter().enumerate() {
        for right in &ERROR_CODES[i + 1..] {
            assert_ne!(left.code, right.code, "duplicate code {}", left.code);
        }
    }
}

#[test]
fn lookup_error_code_finds_registered_codes() {
    let code = lookup_error_code("E201").expect("E201 exists");
    assert_eq!(code.title, IMPORT_CYCLE.title);
    assert!(lookup_error_code("E999").is_none());
}

#[test]
fn make_error_formats_message_and_keeps_file() {
    let diag = Diagnostic::make_error(&UNKNOWN_PACKAGE, &["csv", "universe"], "universe");
    assert_eq!(diag.code(), Some("E200"));
    assert_eq!(
        diag.message(),
        Some("Unknown builtin package `csv` imported by `universe`.")
    );
    assert_eq!(diag.file(), Some("universe"));
    assert_eq!(diag.error_type(), Some(ErrorType::Resolution));
    assert!(diag.is_fatal());
}

#[test]
fn specification_errors_are_not_fatal() {
    let diag = Diagnostic::make_error(&NO_ROOT_NODES, &[], "<query>");
    assert!(!diag.is_fatal());
    assert_eq!(diag.to_string(), "[E403] Query has no root nodes.");
}

#[test]
fn render_includes_header_hint_and_cause() {
    let inner = Diagnostic::make_error(&NO_ROOT_NODES, &[], "<query>");
    let diag = Diagnostic::make_error(&BUILTIN_MISMATCH, &["strings", "trim", ""], "strings")
        .with_cause(inner);
    let rendered = diag.render();

    assert!(rendered.starts_with("--> resolution error[E203]: BUILTIN MISMATCH\n"));
    assert!(rendered.contains("  in strings\n"));
    assert!(rendered.contains("Hint:\n  Every `builtin` declaration"));
    assert!(rendered.contains("Caused by:\n  --> specification error[E403]: NO ROOT NODES"));
}
