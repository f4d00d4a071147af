// Environment variable plumbing
use crate::models::ResolvedCredentials;
use std::path::PathBuf;

/// Overrides the base directory holding the config file and the cache
pub const AWS_CONFIG_DIR: &str = "AWS_CONFIG_DIR";

pub const AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
pub const AWS_SESSION_TOKEN: &str = "AWS_SESSION_TOKEN";

/// The environment variables a child process needs to use the credentials
pub fn credential_vars(creds: &ResolvedCredentials) -> [(&'static str, &str); 3] {
    [
        (AWS_ACCESS_KEY_ID, creds.access_key_id.as_str()),
        (AWS_SECRET_ACCESS_KEY, creds.secret_access_key.as_str()),
        (AWS_SESSION_TOKEN, creds.session_token.as_str()),
    ]
}

/// Base directory from `AWS_CONFIG_DIR`, falling back to `~/.aws`
pub fn aws_config_dir() -> Option<PathBuf> {
    base_dir_from(std::env::var_os(AWS_CONFIG_DIR).map(PathBuf::from), dirs::home_dir())
}

fn base_dir_from(override_dir: Option<PathBuf>, home: Option<PathBuf>) -> Option<PathBuf> {
    match override_dir {
        Some(dir) if !dir.as_os_str().is_empty() => {
            tracing::debug!("Using {} from environment: {}", AWS_CONFIG_DIR, dir.display());
            Some(dir)
        }
        _ => home.map(|home| home.join(".aws")),
    }
}
