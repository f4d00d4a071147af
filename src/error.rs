use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoginError {
    #[error("Unknown account alias: {0}")]
    UnknownAlias(String),

    #[error("Unknown account ID: {0}")]
    UnknownAccount(String),

    #[error("No role-arn configured for account {0}")]
    MissingRoleArn(String),

    #[error("Invalid duration-seconds for account {account_id}: {value}")]
    MalformedDuration { account_id: String, value: String },

    #[error("Could not read config file {}: {source}", .path.display())]
    ConfigUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse config file {}: {reason}", .path.display())]
    ConfigMalformed { path: PathBuf, reason: String },

    #[error("Could not determine AWS config directory (set AWS_CONFIG_DIR)")]
    ConfigDirectoryUnknown,

    #[error("Corrupt cache record for account {account_id}: {source}")]
    CacheCorrupt {
        account_id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read cache record for account {account_id}: {source}")]
    CacheReadFailed {
        account_id: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write cache record for account {account_id}: {source}")]
    CacheWriteFailed {
        account_id: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read MFA token: {0}")]
    MfaReadFailed(#[source] std::io::Error),

    #[error("Failed to assume role: {0}")]
    RoleAssumptionFailed(String),

    #[error("Failed to start async runtime: {0}")]
    RuntimeStartFailed(#[source] std::io::Error),

    #[error("Failed to request sign-in token: {0}")]
    SigninRequestFailed(String),

    #[error("Failed to parse sign-in token response: {0}")]
    SigninResponseMalformed(String),

    #[error("SigninToken not included in federation response")]
    SigninTokenMissing,

    #[error("Browser launch failed: {0}")]
    BrowserLaunchFailed(String),
}

pub type Result<T> = std::result::Result<T, LoginError>;
