// CLI interface
pub mod commands;

use crate::config::{self, AccountDirectory};
use crate::console::DEFAULT_DESTINATION;
use crate::credentials::{
    CredentialBroker, CredentialCache, FileStore, StsRoleAssumer, TerminalMfaPrompt,
};
use crate::expiry::SystemClock;
use anyhow::bail;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "aws-login")]
#[command(
    about = "Assume an AWS IAM role with MFA and cache the temporary credentials",
    long_about = "Assume an AWS IAM role with MFA and cache the temporary credentials.\n\n\
                  Without a command, prints shell export lines for the credentials.\n\
                  With a command, runs it with the credentials in its environment."
)]
#[command(version)]
pub struct Cli {
    /// Account ID (12 digits) or alias from the config file
    pub account: Option<String>,

    /// Command to run with the credentials injected
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,

    /// Directory holding cached credentials [default: $AWS_CONFIG_DIR/cli/cache]
    #[arg(long, value_name = "DIR")]
    pub cache_directory: Option<PathBuf>,

    /// Account configuration file [default: $AWS_CONFIG_DIR/aws-login.yaml]
    #[arg(long, value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Print a link to the AWS console instead of exporting credentials
    #[arg(long)]
    pub console: bool,

    /// The AWS Console URL to redirect to after authenticating
    #[arg(long, default_value = DEFAULT_DESTINATION)]
    pub destination: String,

    /// Session duration (0 uses the account default, then one hour)
    #[arg(
        long,
        visible_alias = "session-duration",
        value_name = "SECONDS",
        default_value_t = 0
    )]
    pub duration_seconds: u32,

    /// Also open the console link in the default browser
    #[arg(long, requires = "console")]
    pub open: bool,

    /// Enable verbose/debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

pub fn execute(args: Cli) -> anyhow::Result<ExitCode> {
    let Some(account) = args.account.as_deref() else {
        bail!("missing account ID or alias");
    };

    let broker = build_broker(args.config_file.clone(), args.cache_directory.clone())?;

    if args.console {
        commands::console::execute(
            &broker,
            account,
            &args.destination,
            args.duration_seconds,
            args.open,
        )?;
        return Ok(ExitCode::SUCCESS);
    }

    if args.command.is_empty() {
        commands::export::execute(&broker, account, args.duration_seconds)?;
        Ok(ExitCode::SUCCESS)
    } else {
        commands::exec::execute(&broker, account, args.duration_seconds, &args.command)
    }
}

fn build_broker(
    config_file: Option<PathBuf>,
    cache_directory: Option<PathBuf>,
) -> anyhow::Result<CredentialBroker> {
    let config_file = match config_file {
        Some(path) => path,
        None => config::default_config_file()?,
    };
    let cache_directory = match cache_directory {
        Some(path) => path,
        None => config::default_cache_dir()?,
    };
    tracing::debug!("Using cache directory: {}", cache_directory.display());

    let directory = AccountDirectory::load(&config_file)?;
    let cache = CredentialCache::new(
        Box::new(FileStore::new(cache_directory)),
        Arc::new(SystemClock),
    );

    Ok(CredentialBroker::new(
        directory,
        cache,
        Box::new(StsRoleAssumer::new()),
        Box::new(TerminalMfaPrompt),
    ))
}
