mod cli;
mod logging;
mod remote;

use clap::Parser;
use cli::Arguments;
use std::process::ExitCode;
use tracing::error;

fn main() -> ExitCode {
    let args = Arguments::parse();
    logging::init(args.verbose);

    match remote::run(&args) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
