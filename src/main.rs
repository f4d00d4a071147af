// aws-login - assume AWS roles with MFA and cache the credentials

mod cli;
mod config;
mod console;
mod credentials;
mod env;
mod error;
mod expiry;
mod models;

use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    // Parse CLI arguments first to get verbose flag
    let args = cli::Cli::parse();

    let log_level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    // Logs go to stderr; stdout carries export lines and console URLs
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(log_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli::execute(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("aws-login: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
