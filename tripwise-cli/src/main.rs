//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use tripwise_cli::CliError;

fn main() -> eyre::Result<()> {
    env_logger::init();
    match tripwise_cli::run() {
        Ok(()) => Ok(()),
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => Err(eyre::Report::new(err)),
    }
}
