use clap::Parser;
use std::process::ExitCode;

use gactifs::cli::Cli;
use gactifs::logging::init_logging;

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match cli.command.run().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
