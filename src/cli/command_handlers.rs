use log::{debug, info};

use crate::{
    graph::{build_graph, list_modules},
    manifest::{render, write_manifest},
    resolver::{CachingResolver, MetadataSource},
};
use std::{error::Error, path::Path, sync::Arc};

/// Handler to generate command
/// 1 - Lists the modules in `modules_directory`
/// 2 - Resolves their direct dependencies on `jobs` workers
/// 3 - Expands them transitively and writes the manifest to `output`
pub async fn do_generate<S>(
    modules_directory: &Path,
    output: &Path,
    jobs: usize,
    source: S,
    prefix: &str,
) -> Result<String, Box<dyn Error>>
where
    S: MetadataSource + Send + Sync + 'static,
{
    let modules = list_modules(modules_directory)?;
    let resolver = Arc::new(CachingResolver::new(source, modules_directory));

    info!("Building dependency graph...");
    debug!("Resolving {} modules with {} jobs", modules.len(), jobs);
    let graph = build_graph(modules, resolver, jobs).await?;

    info!("Resolving dependencies...");
    let manifest = render(&graph, prefix);

    write_manifest(output, &manifest)?;

    Ok(manifest)
}
