//! Copydeck CLI
//!
//! Main entry point for the `copydeck` binary.

use std::process::ExitCode;

use clap::Parser;
use copydeck_cli::cli::Cli;
use copydeck_cli::CliError;
use copydeck_common_log::{LogConfig, LogLevel};
use tracing::debug;

fn main() -> ExitCode {
    copydeck_common_config::load_dotenv();
    let cli = Cli::parse();

    init_logging(&cli);

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("error: failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            e.exit_code()
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = cli.load_config()?;
    cli.execute(config).await
}

fn init_logging(cli: &Cli) {
    let mut config = LogConfig::from_env();
    if cli.verbose > 0 || cli.quiet || std::env::var("COPYDECK_LOG_LEVEL").is_err() {
        config.level = LogLevel::from_verbosity(cli.verbose, cli.quiet);
    }
    if let Err(e) = copydeck_common_log::init(config) {
        eprintln!("warning: {e}");
    }
}

fn report(err: &CliError) {
    eprintln!("error[{}]: {err}", err.code());
    for line in err.details() {
        eprintln!("  - {line}");
    }
    if let Some(hint) = err.hint() {
        eprintln!("hint: {hint}");
    }
    debug!(error = ?err, "Command failed");
}
