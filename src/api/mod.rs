use std::{error::Error, path::PathBuf};

use crate::{cli::command_handlers::do_generate, resolver::ModinfoSource};

mod builder;

pub use builder::ModdepBuilder;

pub struct Moddep {
    modules_directory: PathBuf,
    output: PathBuf,
    jobs: usize,
    source: ModinfoSource,
    prefix: String,
}

impl Moddep {
    pub fn builder() -> ModdepBuilder {
        ModdepBuilder::default()
    }

    /// Resolves the dependencies of every module in the module directory and
    /// writes the manifest to the output file. Returns the manifest text.
    pub async fn generate(&self) -> Result<String, Box<dyn Error>> {
        do_generate(
            &self.modules_directory,
            &self.output,
            self.jobs,
            self.source.clone(),
            &self.prefix,
        )
        .await
    }
}
