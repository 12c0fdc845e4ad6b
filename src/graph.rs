use std::{path::Path, sync::Arc};

use log::{debug, trace, warn};
use thiserror::Error;
use tokio::{sync::Semaphore, task::JoinSet};

use crate::{
    model::{DependencyGraph, ModuleName, MODULE_EXTENSION},
    resolver::DependencyResolver,
};

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Cannot list module directory {directory}: {source}")]
    Io {
        directory: String,
        source: std::io::Error,
    },
    #[error("Dependency resolution task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Lists the module files found directly inside `directory`. Symlinks are
/// followed; directories are skipped even when their name ends in `.ko`.
pub fn list_modules(directory: &Path) -> Result<Vec<ModuleName>, GraphError> {
    let io_error = |source| GraphError::Io {
        directory: directory.display().to_string(),
        source,
    };

    let mut modules = Vec::new();
    for entry in std::fs::read_dir(directory).map_err(io_error)? {
        let entry = entry.map_err(io_error)?;
        match entry.file_name().into_string() {
            Ok(name) if name.ends_with(MODULE_EXTENSION) => {
                if !entry.path().is_file() {
                    trace!("Skipping {}, not a regular file", name);
                    continue;
                }
                trace!("Found module {}", name);
                modules.push(ModuleName::new(name));
            }
            Ok(_) => {}
            Err(name) => warn!("Skipping non UTF-8 file name {:?}", name),
        }
    }
    debug!("Found {} modules in {}", modules.len(), directory.display());
    Ok(modules)
}

/// Resolves the direct dependencies of every module, running at most `jobs`
/// lookups at a time. Returns once every lookup has finished.
pub async fn build_graph<R>(
    modules: Vec<ModuleName>,
    resolver: Arc<R>,
    jobs: usize,
) -> Result<DependencyGraph, GraphError>
where
    R: DependencyResolver + Send + Sync + 'static,
{
    let semaphore = Arc::new(Semaphore::new(jobs.max(1)));
    let mut join_set = JoinSet::new();

    for module in modules {
        let resolver = Arc::clone(&resolver);
        let semaphore = Arc::clone(&semaphore);
        join_set.spawn(async move {
            let _permit = semaphore.acquire_owned().await;
            tokio::task::spawn_blocking(move || {
                let dependencies = resolver.resolve(&module);
                (module, dependencies)
            })
            .await
        });
    }

    let mut graph = DependencyGraph::new();
    while let Some(result) = join_set.join_next().await {
        let (module, dependencies) = result??;
        if !graph.insert(module.clone(), dependencies) {
            warn!("Module {} was listed twice", module);
        }
    }
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use std::{
        collections::{BTreeSet, HashMap},
        fs::File,
        sync::atomic::{AtomicUsize, Ordering},
        thread,
        time::Duration,
    };

    use super::*;

    use pretty_assertions::assert_eq;

    struct StaticResolver {
        edges: HashMap<&'static str, Vec<&'static str>>,
        running: AtomicUsize,
        peak: AtomicUsize,
    }

    impl StaticResolver {
        fn new(edges: &[(&'static str, &'static str)]) -> Self {
            let mut map: HashMap<&'static str, Vec<&'static str>> = HashMap::new();
            for (from, to) in edges {
                map.entry(*from).or_default().push(*to);
            }
            Self {
                edges: map,
                running: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }
        }
    }

    impl DependencyResolver for StaticResolver {
        fn resolve(&self, module: &ModuleName) -> BTreeSet<ModuleName> {
            let running = self.running.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(running, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(5));
            self.running.fetch_sub(1, Ordering::SeqCst);
            self.edges
                .get(module.as_str())
                .into_iter()
                .flatten()
                .map(|dep| ModuleName::from(*dep))
                .collect()
        }
    }

    #[test]
    fn lists_only_modules() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.ko", "b.ko", "README", "c.ko.xz"] {
            File::create(dir.path().join(name)).unwrap();
        }
        let mut modules = list_modules(dir.path()).unwrap();
        modules.sort();
        assert_eq!(modules, vec![ModuleName::from("a.ko"), ModuleName::from("b.ko")]);
    }

    #[test]
    fn skips_directories_named_like_modules() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("a.ko")).unwrap();
        std::fs::create_dir(dir.path().join("kernel.ko")).unwrap();

        let modules = list_modules(dir.path()).unwrap();

        assert_eq!(modules, vec![ModuleName::from("a.ko")]);
    }

    #[cfg(unix)]
    #[test]
    fn follows_symlinked_modules() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("a.ko")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("a.ko"), dir.path().join("b.ko")).unwrap();

        let mut modules = list_modules(dir.path()).unwrap();
        modules.sort();

        assert_eq!(modules, vec![ModuleName::from("a.ko"), ModuleName::from("b.ko")]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = list_modules(&dir.path().join("nope"));
        assert!(matches!(result, Err(GraphError::Io { .. })));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn one_entry_per_module() {
        let resolver = Arc::new(StaticResolver::new(&[
            ("a.ko", "b.ko"),
            ("b.ko", "c.ko"),
        ]));
        let modules = vec!["a.ko".into(), "b.ko".into(), "c.ko".into()];

        let graph = build_graph(modules, resolver, 2).await.unwrap();

        assert_eq!(graph.len(), 3);
        assert_eq!(
            graph.direct_dependencies("a.ko"),
            Some(&BTreeSet::from([ModuleName::from("b.ko")]))
        );
        assert_eq!(graph.direct_dependencies("c.ko"), Some(&BTreeSet::new()));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn parallelism_is_bounded() {
        let resolver = Arc::new(StaticResolver::new(&[]));
        let modules = (0..32).map(|i| ModuleName::new(format!("m{i}.ko"))).collect();

        let graph = build_graph(modules, Arc::clone(&resolver), 3).await.unwrap();

        assert_eq!(graph.len(), 32);
        assert!(resolver.peak.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn zero_jobs_still_runs() {
        let resolver = Arc::new(StaticResolver::new(&[]));
        let graph = build_graph(vec!["a.ko".into()], resolver, 0).await.unwrap();
        assert_eq!(graph.len(), 1);
    }
}
