use std::process::ExitCode;

use clap::Parser;
use shared_utils::env::get_optional_env_var;
use timesales_exporter::{
    Error,
    cli::{commands::Cli, logging::init_logging},
    config::{ExportConfig, load_config_file, load_env_file},
    pipeline,
};
use tracing::{debug, error};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(kind = %e.kind(), "{e}");
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: &Cli) -> Result<(), Error> {
    for path in load_env_file(cli.env_file.as_deref())? {
        debug!(path = %path.display(), "loaded env file");
    }

    let file = cli.config.as_deref().map(load_config_file).transpose()?;
    let config = ExportConfig::resolve(file, cli.overrides(), get_optional_env_var)?;

    let summary = pipeline::run(&config).await?;
    println!(
        "Wrote {} {} bars to {}",
        summary.rows,
        config.symbol,
        summary.path.display()
    );
    Ok(())
}
