//! Builtin package resolution and the finalized runtime.
//!
//! A [`Runtime`] starts in the building state, accepts package and value
//! registrations, and is finalized exactly once. Finalize evaluates every
//! builtin package in import order and freezes the prelude and package
//! table. Afterwards the runtime is read-only and every accessor hands out a
//! fresh copy, so any number of queries can compile against it at once.

use tracing::debug;

use crate::{
    diagnostics::{Diagnostic, RUNTIME_FINALIZED, RUNTIME_NOT_FINALIZED},
    interpreter::{Evaluator, package::PackageTable, scope::Scope, value::Value},
    operation::arena::TableArena,
    spec::Specification,
    syntax::package::Package as AstPackage,
};

pub mod builder;
pub mod config;
mod package_order;

pub use builder::RuntimeBuilder;
pub use config::RuntimeConfig;

use builder::Finalized;

/// File name used for diagnostics that belong to the runtime itself.
const RUNTIME_FILE: &str = "<runtime>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeState {
    Building,
    Finalized,
    /// Finalize was attempted and failed. The runtime cannot be used.
    Failed,
}

#[derive(Debug)]
enum Stage {
    Building(RuntimeBuilder),
    Finalized(Finalized),
    Failed,
}

/// Builtin packages and the prelude every query is evaluated against.
#[derive(Debug)]
pub struct Runtime {
    config: RuntimeConfig,
    stage: Stage,
}

/// Result of evaluating a query script.
#[derive(Debug)]
pub struct ScriptEvaluation {
    /// Values of the script's top-level expression statements.
    pub side_effects: Vec<Value>,
    /// The script's own scope, nested directly under the prelude.
    pub scope: Scope,
    /// Operation nodes built while evaluating.
    pub arena: TableArena,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        Self {
            stage: Stage::Building(RuntimeBuilder::with_config(config.clone())),
            config,
        }
    }

    pub(crate) fn from_finalized(config: RuntimeConfig, finalized: Finalized) -> Self {
        Self {
            config,
            stage: Stage::Finalized(finalized),
        }
    }

    pub fn state(&self) -> RuntimeState {
        match self.stage {
            Stage::Building(_) => RuntimeState::Building,
            Stage::Finalized(_) => RuntimeState::Finalized,
            Stage::Failed => RuntimeState::Failed,
        }
    }

    pub fn is_finalized(&self) -> bool {
        self.state() == RuntimeState::Finalized
    }

    fn builder_mut(&mut self, action: &str) -> Result<&mut RuntimeBuilder, Diagnostic> {
        match &mut self.stage {
            Stage::Building(builder) => Ok(builder),
            Stage::Finalized(_) | Stage::Failed => Err(Diagnostic::make_error(
                &RUNTIME_FINALIZED,
                &[action],
                RUNTIME_FILE,
            )),
        }
    }

    fn finalized(&self, action: &str) -> Result<&Finalized, Diagnostic> {
        match &self.stage {
            Stage::Finalized(finalized) => Ok(finalized),
            Stage::Building(_) | Stage::Failed => Err(Diagnostic::make_error(
                &RUNTIME_NOT_FINALIZED,
                &[action],
                RUNTIME_FILE,
            )),
        }
    }

    pub fn register_package(&mut self, package: AstPackage) -> Result<(), Diagnostic> {
        self.builder_mut("register a package")?
            .register_package(package)
    }

    pub fn register_package_value(
        &mut self,
        path: &str,
        name: &str,
        value: Value,
    ) -> Result<(), Diagnostic> {
        self.builder_mut("register a builtin value")?
            .register_package_value(path, name, value)
    }

    pub fn replace_package_value(
        &mut self,
        path: &str,
        name: &str,
        value: Value,
    ) -> Result<(), Diagnostic> {
        self.builder_mut("replace a builtin value")?
            .replace_package_value(path, name, value)
    }

    /// Evaluates all registered packages. Runs at most once.
    ///
    /// On failure the runtime moves to [`RuntimeState::Failed`] and keeps
    /// nothing of the partial evaluation.
    pub fn finalize(&mut self, evaluator: &dyn Evaluator) -> Result<(), Diagnostic> {
        let builder = match std::mem::replace(&mut self.stage, Stage::Failed) {
            Stage::Building(builder) => builder,
            other => {
                self.stage = other;
                return Err(Diagnostic::make_error(
                    &RUNTIME_FINALIZED,
                    &["finalize"],
                    RUNTIME_FILE,
                ));
            }
        };

        let finalized = builder.finish(evaluator)?;
        self.stage = Stage::Finalized(finalized);
        Ok(())
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// A new scope for a query: an empty frame over a copy of the prelude.
    pub fn prelude(&self) -> Result<Scope, Diagnostic> {
        let finalized = self.finalized("read the prelude")?;
        Ok(Scope::prelude(finalized.prelude.clone()).nest())
    }

    /// A copy of the finalized package table, usable as an importer.
    pub fn importer(&self) -> Result<PackageTable, Diagnostic> {
        let finalized = self.finalized("import packages")?;
        Ok(finalized.packages.copy())
    }

    /// Evaluates a query script against fresh copies of the prelude and the
    /// package table.
    pub fn eval(
        &self,
        script: &AstPackage,
        evaluator: &dyn Evaluator,
    ) -> Result<ScriptEvaluation, Diagnostic> {
        let mut scope = self.prelude()?;
        let importer = self.importer()?;
        let mut arena = TableArena::new();

        let side_effects = evaluator.eval(script, &mut scope, &importer, &mut arena)?;
        Ok(ScriptEvaluation {
            side_effects,
            scope,
            arena,
        })
    }

    /// Evaluates a query script and returns its validated specification.
    pub fn compile(
        &self,
        script: &AstPackage,
        evaluator: &dyn Evaluator,
        now: i64,
    ) -> Result<Specification, Diagnostic> {
        let resources = self.config.resources;
        let ScriptEvaluation {
            side_effects,
            arena,
            ..
        } = self.eval(script, evaluator)?;

        let spec =
            Specification::from_evaluation(arena, &side_effects, now)?.with_resources(resources);
        spec.validate()?;
        debug!(
            path = %script.path,
            operations = spec.operations.len(),
            "compiled query"
        );
        Ok(spec)
    }
}
