mod common;

use common::{NOW, QUERY_PATH, finalized_runtime, register_universe, script};
use fluxplan::{
    diagnostics::ErrorType,
    interpreter::{Importer, Interpreter, value::Value},
    operation::TableValue,
    runtime::{Runtime, RuntimeBuilder, RuntimeConfig, RuntimeState},
    syntax::{
        expression::{Expression, Parameter},
        package::{Import, Package},
        statement::Statement,
    },
};

/// `experimental.latest(bucket)`: `universe.from(bucket) |> universe.recent()`.
fn experimental() -> Package {
    let latest = Expression::function(
        vec![Parameter::new("bucket")],
        vec![Statement::returns(Expression::pipe(
            Expression::call(
                Expression::member(Expression::identifier("universe"), "from"),
                vec![("bucket", Expression::identifier("bucket"))],
            ),
            Expression::call(
                Expression::member(Expression::identifier("universe"), "recent"),
                vec![],
            ),
        ))],
    );
    Package::new("experimental", "experimental")
        .with_import(Import::new("universe"))
        .with_statement(Statement::variable("latest", latest))
}

#[test]
fn finalize_evaluates_imports_before_importers() {
    let mut runtime = Runtime::new();
    runtime.register_package(experimental()).unwrap();
    register_universe(&mut runtime).unwrap();
    runtime.finalize(&Interpreter).unwrap();

    let importer = runtime.importer().unwrap();
    assert_eq!(
        importer.paths().collect::<Vec<_>>(),
        vec!["universe", "experimental"]
    );
    let experimental = importer.import_package("experimental").unwrap();
    assert_eq!(experimental.len(), 1);
    assert!(matches!(experimental.get("latest"), Some(Value::Function(_))));
}

#[test]
fn imported_builtin_closures_build_operations() {
    let mut runtime = Runtime::new();
    register_universe(&mut runtime).unwrap();
    runtime.register_package(experimental()).unwrap();
    runtime.finalize(&Interpreter).unwrap();

    let query = script(vec![Statement::expression(Expression::call(
        Expression::member(Expression::identifier("experimental"), "latest"),
        vec![("bucket", Expression::string("telegraf"))],
    ))])
    .with_import(Import::new("experimental"));

    let evaluation = runtime.eval(&query, &Interpreter).unwrap();
    let handle = evaluation.side_effects[0].as_table().unwrap();
    let view = TableValue::new(&evaluation.arena, handle);
    assert_eq!(view.to_string(), "from -> range");
    assert_eq!(view.get("start"), Some(Value::Int(-1)));

    let stack: Vec<(&str, &str)> = view
        .object()
        .source()
        .iter()
        .map(|entry| (entry.function.as_str(), entry.package.as_str()))
        .collect();
    assert_eq!(
        stack,
        vec![
            ("<closure>", QUERY_PATH),
            ("<closure>", QUERY_PATH),
            ("range", QUERY_PATH)
        ]
    );
}

#[test]
fn builder_build_produces_finalized_runtime() {
    let mut builder = RuntimeBuilder::new();
    builder.register_package(common::universe()).unwrap();
    for name in ["from", "range", "filter", "join"] {
        builder
            .register_package_value("universe", name, Value::Null)
            .unwrap();
    }

    let runtime = builder.build(&Interpreter).unwrap();
    assert!(runtime.is_finalized());
    assert_eq!(runtime.prelude().unwrap().lookup("from"), Some(&Value::Null));
}

#[test]
fn failed_finalize_reports_wrapped_cause() {
    let mut runtime = Runtime::new();
    register_universe(&mut runtime).unwrap();
    runtime
        .register_package(
            Package::new("oops", "oops")
                .with_statement(Statement::variable("x", Expression::identifier("undefined"))),
        )
        .unwrap();

    let err = runtime.finalize(&Interpreter).unwrap_err();
    assert!(err.is_fatal());
    assert_eq!(err.error_type(), Some(ErrorType::Resolution));
    assert_eq!(
        err.render(),
        "--> resolution error[E205]: PACKAGE EVALUATION FAILED\n  in oops\n\nFailed to evaluate builtin package `oops`: Undefined identifier `undefined`.\n\nCaused by:\n  --> evaluation error[E300]: UNDEFINED IDENTIFIER\n    in oops\n  \n  Undefined identifier `undefined`.\n"
    );
    assert_eq!(runtime.state(), RuntimeState::Failed);
}

#[test]
fn finalized_runtime_rejects_registration() {
    let mut runtime = finalized_runtime();

    let err = runtime
        .register_package_value("universe", "extra", Value::Null)
        .unwrap_err();
    assert_eq!(err.code(), Some("E100"));
    assert!(err.is_fatal());

    let err = runtime.finalize(&Interpreter).unwrap_err();
    assert_eq!(err.code(), Some("E100"));
}

#[test]
fn prelude_config_from_json() {
    let config = RuntimeConfig::from_json(
        r#"{"prelude": ["universe"], "resources": {"concurrency_quota": 3, "memory_bytes_quota": 4096}}"#,
    )
    .unwrap();
    let mut runtime = Runtime::with_config(config);
    register_universe(&mut runtime).unwrap();
    runtime.finalize(&Interpreter).unwrap();

    let spec = runtime
        .compile(
            &script(vec![Statement::expression(common::from("telegraf"))]),
            &Interpreter,
            NOW,
        )
        .unwrap();
    assert_eq!(spec.resources.concurrency_quota, 3);
    assert_eq!(spec.resources.memory_bytes_quota, 4096);
}
