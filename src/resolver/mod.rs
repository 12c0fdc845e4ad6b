mod cache;
mod modinfo;

use std::{collections::BTreeSet, path::Path};

use log::trace;

use crate::model::ModuleName;

pub use cache::CachingResolver;
pub use modinfo::ModinfoSource;

/// Source of the raw module metadata.
pub trait MetadataSource {
    /// Returns the comma-separated list of bare dependency names declared by
    /// the module at `path`.
    fn depends(&self, path: &Path) -> anyhow::Result<String>;
}

impl<T: MetadataSource + ?Sized> MetadataSource for &T {
    fn depends(&self, path: &Path) -> anyhow::Result<String> {
        (**self).depends(path)
    }
}

pub trait DependencyResolver {
    /// Direct dependencies of `module` that are present in the module directory.
    fn resolve(&self, module: &ModuleName) -> BTreeSet<ModuleName>;
}

/// Parses a modinfo `depends` line, keeping only names with a matching
/// module file in `directory`.
pub fn parse_depends(line: &str, directory: &Path) -> BTreeSet<ModuleName> {
    line.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(ModuleName::from_dependency)
        .filter(|module| {
            let exists = directory.join(module.as_str()).exists();
            if !exists {
                trace!("Dropping dangling dependency {}", module);
            }
            exists
        })
        .collect()
}
