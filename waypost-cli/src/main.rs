//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use waypost_cli::CliError;

fn main() {
    match waypost_cli::run() {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("waypost: {err}");
            std::process::exit(1);
        }
    }
}
