use std::{
    error::Error,
    num::NonZeroUsize,
    path::PathBuf,
    thread::available_parallelism,
};

use crate::{config::ModdepConfig, manifest::DEFAULT_PREFIX, resolver::ModinfoSource, Moddep};

#[derive(Default)]
pub struct ModdepBuilder {
    modules_directory: Option<PathBuf>,
    output: Option<PathBuf>,
    jobs: Option<usize>,
    modinfo_path: Option<PathBuf>,
    prefix: Option<String>,
}

impl ModdepBuilder {
    /// Directory containing the `.ko` files.
    ///
    /// Defaults to the current directory.
    pub fn modules_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.modules_directory = Some(path.into());
        self
    }

    /// File the manifest is written to.
    ///
    /// Defaults to `modules.dep`.
    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    /// Number of concurrent metadata lookups.
    ///
    /// Defaults to `MODDEP_JOBS`, then to the available parallelism.
    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = Some(jobs);
        self
    }

    /// Program queried for module metadata.
    ///
    /// Defaults to `MODDEP_MODINFO_PATH`, then to `modinfo` from `$PATH`.
    pub fn modinfo_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.modinfo_path = Some(path.into());
        self
    }

    /// Prefix prepended to every module in the manifest.
    ///
    /// Defaults to `MODDEP_OUTPUT_PREFIX`, then to `/lib/modules/`.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn try_build(self) -> Result<Moddep, Box<dyn Error>> {
        let Self {
            modules_directory,
            output,
            jobs,
            modinfo_path,
            prefix,
        } = self;
        let config = ModdepConfig::load()?;

        let modules_directory = match modules_directory {
            Some(path) => path,
            None => std::env::current_dir()?,
        };

        let output = output.unwrap_or_else(|| PathBuf::from("modules.dep"));

        let jobs = jobs.or(config.jobs).unwrap_or_else(default_jobs);

        let source = match modinfo_path.or(config.modinfo_path) {
            Some(path) => ModinfoSource::new(path),
            None => ModinfoSource::default(),
        };

        let prefix = prefix
            .or(config.output_prefix)
            .unwrap_or_else(|| DEFAULT_PREFIX.to_owned());

        Ok(Moddep {
            modules_directory,
            output,
            jobs,
            source,
            prefix,
        })
    }
}

fn default_jobs() -> usize {
    available_parallelism().map_or(1, NonZeroUsize::get)
}
