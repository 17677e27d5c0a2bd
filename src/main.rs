//! codegen CLI entry point
//!
//! Parses arguments, runs one render cycle and maps the outcome to the exit
//! status: 0 when every template was rendered or up to date, 1 when the
//! configuration was invalid or any template failed.

use anyhow::Result;
use clap::Parser;
use codegen_cli::cli;
use codegen_cli::core::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(outcome) if outcome.success() => Ok(()),
        Ok(_) => std::process::exit(1),
        Err(e) => {
            user_friendly_error(&e).display();
            std::process::exit(1);
        }
    }
}
