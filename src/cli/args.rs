use std::path::PathBuf;

use clap::Parser;

/// Generates a modules.dep manifest from a directory of kernel modules.
#[derive(Debug, Parser)]
#[clap(version)]
pub struct CliArgs {
    /// Directory containing the kernel modules (*.ko)
    pub modules_dir: PathBuf,
    /// Output file
    #[clap(short, long, default_value = "modules.dep")]
    pub output: PathBuf,
    /// Number of worker threads [default: available parallelism]
    #[clap(short, long)]
    pub jobs: Option<usize>,
    /// Program used to query module metadata [default: modinfo]
    #[clap(long)]
    pub modinfo: Option<PathBuf>,
    /// Path prefix of every module in the manifest [default: /lib/modules/]
    #[clap(long)]
    pub prefix: Option<String>,
}
