//! pdf-tools - command-line entry point

use clap::Parser;
use pdf_page_tools::cli::{self, Cli};
use pdf_page_tools::{logging, Config, Processor};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = Config::from_env();
    if cli.verbose {
        config.log.level = "debug".to_string();
    }
    if let Some(mode) = cli.validation {
        config.pdf.validation_mode = mode;
    }
    logging::init(&config.log);

    let processor = Processor::with_config(config.pdf);
    let stdout = std::io::stdout();

    match cli::run(cli.command, &processor, &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(cli::exit_code(&e))
        }
    }
}
