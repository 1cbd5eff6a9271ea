use std::process::ExitCode;

use clap::Parser;
use sio_cli::{Cli, init_tracing, run};
use tracing::{error, info};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match run(&cli) {
        Ok(exit) => {
            info!(?exit, "sio-dump exited");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
