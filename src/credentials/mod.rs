// Credential resolution and caching
mod cache;
mod mfa;
mod sts;

pub use cache::{CacheStore, CredentialCache, FileStore};
pub use mfa::{MfaPrompt, TerminalMfaPrompt};
pub use sts::{RoleAssumer, StsRoleAssumer};


use crate::config::{AccountDirectory, DEFAULT_DURATION_SECONDS};
use crate::error::Result;
use crate::models::{AssumeRoleRequest, MfaToken, ResolvedCredentials};

/// Session name sent with every AssumeRole call
pub const SESSION_NAME: &str = "aws-login";

/// Resolves account identifiers to credentials, assuming roles only on a cache miss
pub struct CredentialBroker {
    directory: AccountDirectory,
    cache: CredentialCache,
    assumer: Box<dyn RoleAssumer>,
    mfa: Box<dyn MfaPrompt>,
}

impl CredentialBroker {
    pub fn new(
        directory: AccountDirectory,
        cache: CredentialCache,
        assumer: Box<dyn RoleAssumer>,
        mfa: Box<dyn MfaPrompt>,
    ) -> Self {
        Self {
            directory,
            cache,
            assumer,
            mfa,
        }
    }

    /// Explicit non-zero duration, then the account default, then one hour
    pub fn effective_duration(&self, account_id: &str, requested_secs: u32) -> Result<u32> {
        if requested_secs != 0 {
            return Ok(requested_secs);
        }

        Ok(self
            .directory
            .default_duration(account_id)?
            .unwrap_or(DEFAULT_DURATION_SECONDS))
    }

    /// Get credentials for an account ID or alias, valid for the effective duration
    pub fn resolve(&self, identifier: &str, requested_secs: u32) -> Result<ResolvedCredentials> {
        let account_id = self.directory.resolve(identifier)?;
        let duration = self.effective_duration(&account_id, requested_secs)?;

        // Check cache first
        if let Some(cached) = self.cache.get(&account_id, duration)? {
            tracing::debug!("Using cached credentials for {}", account_id);
            return Ok(ResolvedCredentials::from_record(
                &account_id,
                cached,
                duration,
                true,
            ));
        }

        let role_arn = self.directory.role_arn(&account_id)?;
        let mfa = match self.directory.serial_number(&account_id)? {
            Some(serial_number) => Some(MfaToken {
                serial_number: serial_number.to_string(),
                token_code: self.mfa.read_token(serial_number)?,
            }),
            None => None,
        };

        let request = AssumeRoleRequest {
            role_arn: role_arn.to_string(),
            session_name: SESSION_NAME.to_string(),
            duration_seconds: duration,
            mfa,
        };
        let fresh = self.assumer.assume_role(&request)?;

        // A cache failure must not cost the user the credentials they just obtained
        if let Err(e) = self.cache.put(&account_id, &fresh) {
            tracing::warn!("{}", e);
        }

        Ok(ResolvedCredentials::from_record(
            &account_id,
            fresh,
            duration,
            false,
        ))
    }
}
