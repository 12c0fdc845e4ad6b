use std::{
    path::{Path, PathBuf},
    process::Command,
};

use anyhow::{bail, Context};
use log::trace;

use super::MetadataSource;

const DEFAULT_MODINFO: &str = "modinfo";

/// Queries module metadata by running `modinfo -F depends <module>`.
#[derive(Debug, Clone)]
pub struct ModinfoSource {
    program: PathBuf,
}

impl ModinfoSource {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for ModinfoSource {
    fn default() -> Self {
        Self::new(DEFAULT_MODINFO)
    }
}

impl MetadataSource for ModinfoSource {
    fn depends(&self, path: &Path) -> anyhow::Result<String> {
        trace!(
            "Running {} -F depends {}",
            self.program.display(),
            path.display()
        );
        let output = Command::new(&self.program)
            .arg("-F")
            .arg("depends")
            .arg(path)
            .output()
            .with_context(|| format!("failed to run {}", self.program.display()))?;
        if !output.status.success() {
            bail!(
                "{} exited with {} for {}: {}",
                self.program.display(),
                output.status,
                path.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        String::from_utf8(output.stdout).context("modinfo output is not valid UTF-8")
    }
}
