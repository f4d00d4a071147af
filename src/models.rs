use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Temporary credentials as persisted in the per-account cache file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CachedCredential {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
    pub expires_at: DateTime<Utc>,
}

/// Result of resolving an account identifier to usable credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCredentials {
    pub account_id: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
    pub expiration: DateTime<Utc>,
    /// Effective duration used for the freshness check and the STS request
    pub duration_seconds: u32,
    /// True when no role assumption was needed
    pub from_cache: bool,
}

impl ResolvedCredentials {
    pub fn from_record(
        account_id: &str,
        record: CachedCredential,
        duration_seconds: u32,
        from_cache: bool,
    ) -> Self {
        Self {
            account_id: account_id.to_string(),
            access_key_id: record.access_key_id,
            secret_access_key: record.secret_access_key,
            session_token: record.session_token,
            expiration: record.expires_at,
            duration_seconds,
            from_cache,
        }
    }
}

/// MFA device serial plus the one-time code read for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MfaToken {
    pub serial_number: String,
    pub token_code: String,
}

/// Parameters for a single STS AssumeRole call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssumeRoleRequest {
    pub role_arn: String,
    pub session_name: String,
    pub duration_seconds: u32,
    pub mfa: Option<MfaToken>,
}
