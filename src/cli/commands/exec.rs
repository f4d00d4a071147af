use crate::credentials::CredentialBroker;
use crate::env;
use anyhow::{bail, Context};
use std::process::{Command, ExitCode, ExitStatus};

pub fn execute(
    broker: &CredentialBroker,
    account: &str,
    duration_secs: u32,
    command: &[String],
) -> anyhow::Result<ExitCode> {
    let Some((program, args)) = command.split_first() else {
        bail!("No command specified");
    };

    let creds = broker.resolve(account, duration_secs)?;

    // Execute command with credentials in environment, inheriting stdio
    tracing::debug!("Running {} with credentials for {}", program, creds.account_id);
    let status = Command::new(program)
        .args(args)
        .envs(env::credential_vars(&creds))
        .status()
        .with_context(|| format!("unable to run command {}", program))?;

    Ok(ExitCode::from(exit_code(status)))
}

/// Exit with the same code as the command; 1 if it had none (killed by a signal)
fn exit_code(status: ExitStatus) -> u8 {
    status
        .code()
        .and_then(|code| u8::try_from(code).ok())
        .unwrap_or(1)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::process::ExitStatusExt;

    #[test]
    fn test_exit_code_passthrough() {
        assert_eq!(exit_code(ExitStatus::from_raw(0)), 0);
        assert_eq!(exit_code(ExitStatus::from_raw(3 << 8)), 3);
    }

    #[test]
    fn test_exit_code_for_signal() {
        // SIGKILL, no exit code
        assert_eq!(exit_code(ExitStatus::from_raw(9)), 1);
    }
}
