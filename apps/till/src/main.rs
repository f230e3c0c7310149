//! # Meridian Till Entry Point
//!
//! ## Startup Sequence
//! 1. Parse the command line
//! 2. Initialize tracing (logging)
//! 3. Load config (file → environment → validation)
//! 4. Build the business context and session manager
//! 5. Run the command and print its output
//!
//! ## Exit Codes
//! `0` success, `2` invalid input, `3` config or context missing,
//! `4` shift not found or register busy, `5` backend failure.

use std::process::ExitCode;

use clap::Parser;
use meridian_till::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let json = cli.json;

    meridian_till::init_tracing();

    match meridian_till::run(cli).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            if json {
                match serde_json::to_string_pretty(&err) {
                    Ok(body) => println!("{body}"),
                    Err(_) => eprintln!("{err}"),
                }
            } else {
                eprintln!("{err}");
                if err.retryable {
                    eprintln!("Nothing was changed; it is safe to try again.");
                }
            }
            ExitCode::from(err.exit_code())
        }
    }
}
