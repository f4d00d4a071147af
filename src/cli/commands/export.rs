use crate::credentials::CredentialBroker;
use crate::env;
use crate::error::Result;
use crate::expiry;
use crate::models::ResolvedCredentials;
use chrono::Utc;

pub fn execute(broker: &CredentialBroker, account: &str, duration_secs: u32) -> Result<()> {
    let creds = broker.resolve(account, duration_secs)?;

    tracing::debug!(
        "Credentials for {} expire in {}",
        creds.account_id,
        expiry::format_time_remaining(Utc::now(), &creds.expiration)
    );

    print!("{}", export_lines(&creds));
    Ok(())
}

/// Shell export commands for the credential environment variables
fn export_lines(creds: &ResolvedCredentials) -> String {
    env::credential_vars(creds)
        .iter()
        .map(|(name, value)| format!("export {}=\"{}\"\n", name, value))
        .collect()
}
