//! Sourcecheck CLI entry point.

use clap::Parser;
use sourcecheck::cli::{self, Cli, EXIT_FAILED};

fn main() {
    let cli = Cli::parse();
    cli::init_tracing();

    let exit_code = match cli::run_validate(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            EXIT_FAILED
        }
    };

    std::process::exit(exit_code);
}
