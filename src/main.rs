use std::error::Error;

use clap::Parser;
use moddep::{cli::args::CliArgs, Moddep};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stdout)
        .init();

    if let Err(e) = run().await {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    let cli_args: CliArgs = CliArgs::parse();

    let mut builder = Moddep::builder()
        .modules_directory(&cli_args.modules_dir)
        .output(&cli_args.output);
    if let Some(jobs) = cli_args.jobs {
        builder = builder.jobs(jobs);
    }
    if let Some(modinfo) = &cli_args.modinfo {
        builder = builder.modinfo_path(modinfo);
    }
    if let Some(prefix) = cli_args.prefix {
        builder = builder.prefix(prefix);
    }
    let moddep = builder.try_build()?;

    moddep.generate().await?;

    Ok(())
}
