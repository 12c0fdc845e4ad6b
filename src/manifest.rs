use std::{collections::BTreeSet, path::Path};

use log::info;
use thiserror::Error;

use crate::model::{DependencyGraph, ModuleName};

/// Directory that module paths in the manifest are rooted at.
pub const DEFAULT_PREFIX: &str = "/lib/modules/";

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Cannot write manifest to {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

/// Every module reachable from `module`, excluding `module` itself.
///
/// Dependencies without an entry in the graph contribute nothing further.
pub fn closure(graph: &DependencyGraph, module: &ModuleName) -> BTreeSet<ModuleName> {
    let mut visited: BTreeSet<&ModuleName> = BTreeSet::from([module]);
    let mut result = BTreeSet::new();
    let mut stack: Vec<&ModuleName> = vec![module];

    while let Some(current) = stack.pop() {
        let Some(dependencies) = graph.direct_dependencies(current.as_str()) else {
            continue;
        };
        for dependency in dependencies {
            if visited.insert(dependency) {
                result.insert(dependency.clone());
                stack.push(dependency);
            }
        }
    }

    result
}

/// Renders the `modules.dep` text for `graph`, one line per module.
pub fn render(graph: &DependencyGraph, prefix: &str) -> String {
    graph
        .modules()
        .map(|module| {
            let dependencies: String = closure(graph, module)
                .iter()
                .map(|dependency| format!(" {prefix}{dependency}"))
                .collect();
            format!("{prefix}{module}:{dependencies}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn write_manifest(path: &Path, contents: &str) -> Result<(), ManifestError> {
    std::fs::write(path, contents).map_err(|source| ManifestError::Write {
        path: path.display().to_string(),
        source,
    })?;
    info!("Dependencies written to {}", path.display());
    Ok(())
}
