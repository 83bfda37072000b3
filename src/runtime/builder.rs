use indexmap::IndexMap;
use tracing::{debug, info};

use crate::{
    diagnostics::{
        BUILTIN_MISMATCH, DUPLICATE_BUILTIN_VALUE, DUPLICATE_PACKAGE, Diagnostic,
        MALFORMED_PACKAGE, MISSING_BUILTIN_VALUE, MISSING_PRELUDE_PACKAGE,
        PACKAGE_EVALUATION_FAILED,
    },
    interpreter::{
        Evaluator,
        package::{Package, PackageTable},
        scope::{PreludeScope, Scope},
        value::Value,
    },
    operation::arena::TableArena,
    runtime::{Runtime, config::RuntimeConfig, package_order::package_order},
    syntax::package::Package as AstPackage,
};

/// Mutable registration phase of a [`Runtime`].
///
/// Collects builtin packages and the host values bound to their `builtin`
/// declarations. [`RuntimeBuilder::build`] consumes the builder, so nothing
/// can be registered once the runtime exists.
#[derive(Debug, Default)]
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    packages: IndexMap<String, AstPackage>,
    values: IndexMap<String, IndexMap<String, Value>>,
}

/// Output of a successful finalize.
#[derive(Debug)]
pub(crate) struct Finalized {
    pub(crate) prelude: PreludeScope,
    pub(crate) packages: PackageTable,
}

impl RuntimeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn register_package(&mut self, package: AstPackage) -> Result<(), Diagnostic> {
        if self.packages.contains_key(&package.path) {
            return Err(Diagnostic::make_error(
                &DUPLICATE_PACKAGE,
                &[&package.path],
                package.path.clone(),
            ));
        }
        self.packages.insert(package.path.clone(), package);
        Ok(())
    }

    /// Binds a host value to `builtin name` in package `path`. The name must
    /// not be bound yet.
    pub fn register_package_value(
        &mut self,
        path: &str,
        name: &str,
        value: Value,
    ) -> Result<(), Diagnostic> {
        let values = self.values.entry(path.to_string()).or_default();
        if values.contains_key(name) {
            return Err(Diagnostic::make_error(
                &DUPLICATE_BUILTIN_VALUE,
                &[path, name],
                path,
            ));
        }
        values.insert(name.to_string(), value);
        Ok(())
    }

    /// Rebinds an already registered host value.
    pub fn replace_package_value(
        &mut self,
        path: &str,
        name: &str,
        value: Value,
    ) -> Result<(), Diagnostic> {
        match self.values.get_mut(path).and_then(|values| values.get_mut(name)) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(Diagnostic::make_error(
                &MISSING_BUILTIN_VALUE,
                &[path, name],
                path,
            )),
        }
    }

    /// Evaluates every registered package and freezes the result.
    pub fn build(self, evaluator: &dyn Evaluator) -> Result<Runtime, Diagnostic> {
        let config = self.config.clone();
        let finalized = self.finish(evaluator)?;
        Ok(Runtime::from_finalized(config, finalized))
    }

    pub(crate) fn finish(self, evaluator: &dyn Evaluator) -> Result<Finalized, Diagnostic> {
        let RuntimeBuilder {
            config,
            packages,
            mut values,
        } = self;
        info!(packages = packages.len(), "finalizing runtime");

        for path in &config.prelude {
            if !packages.contains_key(path) {
                return Err(Diagnostic::make_error(
                    &MISSING_PRELUDE_PACKAGE,
                    &[path.as_str()],
                    path.clone(),
                ));
            }
        }
        for (path, orphans) in &values {
            if !packages.contains_key(path) {
                let extra: Vec<&str> = orphans.keys().map(String::as_str).collect();
                return Err(Diagnostic::make_error(
                    &BUILTIN_MISMATCH,
                    &[path.as_str(), "", extra.join(", ").as_str()],
                    path.clone(),
                ));
            }
        }

        let order = package_order(&packages, &config.prelude)?;

        let mut table = PackageTable::new();
        for path in order {
            let Some(ast) = packages.get(&path) else {
                continue;
            };

            let bad = ast.bad_nodes();
            if !bad.is_empty() {
                return Err(Diagnostic::make_error(
                    &MALFORMED_PACKAGE,
                    &[path.as_str(), bad.join("; ").as_str()],
                    path.clone(),
                ));
            }

            let seeded = values.shift_remove(&path).unwrap_or_default();
            check_builtins(ast, &seeded)?;

            let prelude = PreludeScope::new(prelude_packages(&config, &table));
            let mut scope = Scope::prelude(prelude).nest_with_values(seeded);
            let mut arena = TableArena::new();
            evaluator
                .eval(ast, &mut scope, &table, &mut arena)
                .map_err(|cause| {
                    let reason = cause.message().unwrap_or(cause.title()).to_string();
                    Diagnostic::make_error(
                        &PACKAGE_EVALUATION_FAILED,
                        &[path.as_str(), reason.as_str()],
                        path.clone(),
                    )
                    .with_cause(cause)
                })?;

            let exported = Package::new(ast.name.clone(), path.clone(), scope.local_values());
            debug!(path = %path, exports = exported.len(), "evaluated builtin package");
            table.insert(exported);
        }

        let prelude = prelude_packages(&config, &table);
        info!(
            packages = table.len(),
            prelude = config.prelude.len(),
            "runtime finalized"
        );

        Ok(Finalized {
            prelude: PreludeScope::new(prelude),
            packages: table,
        })
    }
}

/// Prelude packages finalized so far, always in configured order so that
/// shadowing matches what queries see.
fn prelude_packages(config: &RuntimeConfig, table: &PackageTable) -> Vec<Package> {
    config
        .prelude
        .iter()
        .filter_map(|path| table.get(path).map(Package::copy))
        .collect()
}

/// Every `builtin` declaration needs exactly one registered value and every
/// registered value needs a declaration.
fn check_builtins(
    package: &AstPackage,
    values: &IndexMap<String, Value>,
) -> Result<(), Diagnostic> {
    let declared = package.builtin_names();
    let missing: Vec<&str> = declared
        .iter()
        .copied()
        .filter(|name| !values.contains_key(*name))
        .collect();
    let extra: Vec<&str> = values
        .keys()
        .map(String::as_str)
        .filter(|name| !declared.contains(name))
        .collect();

    if missing.is_empty() && extra.is_empty() {
        return Ok(());
    }
    Err(Diagnostic::make_error(
        &BUILTIN_MISMATCH,
        &[&package.path, &missing.join(", "), &extra.join(", ")],
        package.path.clone(),
    ))
}
