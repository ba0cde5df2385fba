//! logdrop CLI -- runs the log processor over local storage adapters.
//!
//! Exit codes:
//! * `0` - success
//! * `1` - command failure
//! * `2` - configuration error
//! * `3` - processing failure (the failure alert has been published)
//! * `10` - I/O error

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use clap::Parser;
use colored::Colorize;

use logdrop_core::config::LogdropConfig;

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::output::OutputWriter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // 로깅 설정이 잘못되어도 명령 자체는 실행되도록 기본값으로 대체
    let mut general = LogdropConfig::load_or_default(&cli.config)
        .await
        .map(|config| config.general)
        .unwrap_or_default();
    if let Some(level) = &cli.log_level {
        general.log_level = level.clone();
    }

    if let Err(e) = logging::init_tracing(&general) {
        eprintln!("{} {e}", "warning:".yellow().bold());
    }

    tracing::debug!(config = %cli.config.display(), "logdrop starting");

    let writer = OutputWriter::new(cli.output);
    if let Err(e) = run(cli, &writer).await {
        eprintln!("{} {e}", "error:".red().bold());
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli, writer: &OutputWriter) -> Result<(), CliError> {
    match cli.command {
        Commands::Handle(args) => commands::handle::execute(args, &cli.config, writer).await,
        Commands::Process(args) => commands::process::execute(args, &cli.config, writer).await,
        Commands::Classify(args) => commands::classify::execute(args, writer).await,
        Commands::Config(args) => commands::config::execute(args, &cli.config, writer).await,
    }
}
