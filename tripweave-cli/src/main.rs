//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use tripweave_cli::CliError;

fn main() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();
    match tripweave_cli::run() {
        Ok(()) => {}
        // Help and version requests are rendered by clap itself.
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("tripweave: {err}");
            std::process::exit(1);
        }
    }
}
