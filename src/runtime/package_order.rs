use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::{
    diagnostics::{Diagnostic, IMPORT_CYCLE, UNKNOWN_PACKAGE},
    syntax::package::Package,
};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// Orders builtin packages so every package follows the packages it imports.
///
/// Traversal starts from the prelude paths (in prelude order), then the
/// remaining packages sorted by path, so registration order never matters.
/// Prelude paths that are not registered are skipped here.
pub(crate) fn package_order(
    packages: &IndexMap<String, Package>,
    prelude: &[String],
) -> Result<Vec<String>, Diagnostic> {
    let mut starts: Vec<&str> = prelude
        .iter()
        .map(String::as_str)
        .filter(|path| packages.contains_key(*path))
        .collect();
    let mut rest: Vec<&str> = packages
        .keys()
        .map(String::as_str)
        .filter(|path| !prelude.iter().any(|p| p == path))
        .collect();
    rest.sort_unstable();
    starts.extend(rest);

    fn dfs<'a>(
        path: &'a str,
        packages: &'a IndexMap<String, Package>,
        colors: &mut HashMap<&'a str, Color>,
        stack: &mut Vec<&'a str>,
        order: &mut Vec<String>,
    ) -> Result<(), Diagnostic> {
        colors.insert(path, Color::Gray);
        stack.push(path);

        if let Some(package) = packages.get(path) {
            for import in package.import_paths() {
                let Some((next, _)) = packages.get_key_value(import) else {
                    return Err(Diagnostic::make_error(&UNKNOWN_PACKAGE, &[import, path], path));
                };
                let next = next.as_str();
                match colors.get(next).copied().unwrap_or(Color::White) {
                    Color::White => dfs(next, packages, colors, stack, order)?,
                    Color::Gray => {
                        let start = stack.iter().position(|item| *item == next).unwrap_or(0);
                        let mut cycle = stack[start..].to_vec();
                        cycle.push(next);
                        return Err(Diagnostic::make_error(
                            &IMPORT_CYCLE,
                            &[&cycle.join(" -> ")],
                            path,
                        ));
                    }
                    Color::Black => {}
                }
            }
        }

        stack.pop();
        colors.insert(path, Color::Black);
        trace!(path, "ordered builtin package");
        order.push(path.to_string());
        Ok(())
    }

    let mut colors: HashMap<&str, Color> = HashMap::new();
    let mut stack: Vec<&str> = Vec::new();
    let mut order: Vec<String> = Vec::with_capacity(packages.len());

    for start in starts {
        if colors.get(start).copied().unwrap_or(Color::White) == Color::White {
            dfs(start, packages, &mut colors, &mut stack, &mut order)?;
        }
    }

    debug!(order = ?order, "builtin package order");
    Ok(order)
}
