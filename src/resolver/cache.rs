use std::{collections::BTreeSet, path::PathBuf};

use dashmap::DashMap;
use log::{debug, warn};

use crate::model::ModuleName;

use super::{parse_depends, DependencyResolver, MetadataSource};

/// Resolves direct dependencies through a [`MetadataSource`], querying it at
/// most once per module for the lifetime of the resolver.
///
/// A failed query is remembered as "no dependencies".
pub struct CachingResolver<S> {
    inner: S,
    directory: PathBuf,
    cache: DashMap<ModuleName, BTreeSet<ModuleName>>,
}

impl<S> CachingResolver<S> {
    pub fn new(inner: S, directory: impl Into<PathBuf>) -> Self {
        Self {
            inner,
            directory: directory.into(),
            cache: DashMap::new(),
        }
    }

    pub fn cached(&self, module: &ModuleName) -> Option<BTreeSet<ModuleName>> {
        self.cache.get(module).map(|entry| entry.value().clone())
    }
}

impl<S> DependencyResolver for CachingResolver<S>
where
    S: MetadataSource,
{
    fn resolve(&self, module: &ModuleName) -> BTreeSet<ModuleName> {
        if let Some(dependencies) = self.cached(module) {
            debug!("Dependencies of {} found in the cache", module);
            return dependencies;
        }

        let path = self.directory.join(module.as_str());
        let dependencies = match self.inner.depends(&path) {
            Ok(line) => parse_depends(&line, &self.directory),
            Err(error) => {
                warn!(
                    "Could not read dependencies of {}, assuming none: {:#}",
                    module, error
                );
                BTreeSet::new()
            }
        };
        debug!("Resolved {} -> {:?}", module, dependencies);

        // Racing misses compute the same value, so overwriting is harmless.
        self.cache.insert(module.clone(), dependencies.clone());
        dependencies
    }
}
