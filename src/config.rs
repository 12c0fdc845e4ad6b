use std::{collections::HashMap, path::PathBuf};

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// Settings read from `MODDEP_*` environment variables.
pub struct ModdepConfig {
    pub modinfo_path: Option<PathBuf>,
    pub output_prefix: Option<String>,
    pub jobs: Option<usize>,
}

impl ModdepConfig {
    pub fn load() -> anyhow::Result<Self> {
        let raw_config = RawConfig::load(None)?;

        Ok(Self {
            modinfo_path: raw_config.modinfo.path,
            output_prefix: raw_config.output.prefix,
            jobs: raw_config.jobs,
        })
    }
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct RawConfig {
    #[serde(default)]
    modinfo: ModinfoConfig,
    #[serde(default)]
    output: OutputConfig,
    jobs: Option<usize>,
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct ModinfoConfig {
    path: Option<PathBuf>,
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct OutputConfig {
    prefix: Option<String>,
}

impl RawConfig {
    fn load(env: Option<HashMap<String, String>>) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(
                Environment::with_prefix("MODDEP")
                    .separator("_")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?
            .try_deserialize()
    }
}
