use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use quotegen_app::AppConfig;
use quotegen_app::cli::{self, Cli};

fn main() -> anyhow::Result<ExitCode> {
    quotegen_observability::init();

    let cli = Cli::parse();
    let config = AppConfig::from_env().context("failed to load configuration")?;

    let stdout = std::io::stdout();
    match cli::run(cli, &config, &mut stdout.lock()) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            eprintln!("{}", cli::failure_message(&err));
            Ok(ExitCode::FAILURE)
        }
    }
}
