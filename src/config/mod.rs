// Account directory: aliases and per-account role configuration
use crate::env;
use crate::error::{LoginError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "aws-login.yaml";

/// Session length used when neither the caller nor the account sets one
pub const DEFAULT_DURATION_SECONDS: u32 = 3600;

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigDocument {
    #[serde(default)]
    accounts: HashMap<String, AccountEntry>,
    #[serde(default)]
    aliases: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct AccountEntry {
    role_arn: Option<String>,
    serial_number: Option<String>,
    duration_seconds: Option<RawDuration>,
}

// Kept loose at load time so a bad value only fails the account that uses it
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawDuration {
    Integer(i64),
    Float(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

impl RawDuration {
    fn to_seconds(&self) -> Option<u32> {
        match self {
            RawDuration::Integer(n) => u32::try_from(*n).ok(),
            RawDuration::Float(_) | RawDuration::Other(_) => None,
            RawDuration::Text(s) => s.trim().parse::<u32>().ok(),
        }
    }

    fn display(&self) -> String {
        match self {
            RawDuration::Integer(n) => n.to_string(),
            RawDuration::Float(f) => f.to_string(),
            RawDuration::Text(s) => s.clone(),
            RawDuration::Other(_) => "<not a number>".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
}

impl ConfigFormat {
    /// TOML for `*.toml`, YAML for everything else
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Yaml,
        }
    }
}

/// Get the base directory for the config file and cache
///
/// Priority:
/// 1. AWS_CONFIG_DIR (if env var is set and non-empty)
/// 2. ~/.aws
pub fn base_dir() -> Result<PathBuf> {
    env::aws_config_dir().ok_or(LoginError::ConfigDirectoryUnknown)
}

pub fn default_config_file() -> Result<PathBuf> {
    Ok(base_dir()?.join(CONFIG_FILE_NAME))
}

pub fn default_cache_dir() -> Result<PathBuf> {
    Ok(base_dir()?.join("cli").join("cache"))
}

/// Immutable view of the configured accounts and aliases
#[derive(Debug, Clone, Default)]
pub struct AccountDirectory {
    accounts: HashMap<String, AccountEntry>,
    aliases: HashMap<String, String>,
}

impl AccountDirectory {
    /// Load the directory from a YAML or TOML file
    pub fn load(path: &Path) -> Result<Self> {
        tracing::debug!("Loading account config from: {}", path.display());
        let contents = fs::read_to_string(path).map_err(|source| LoginError::ConfigUnreadable {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&contents, ConfigFormat::from_path(path)).map_err(|reason| {
            LoginError::ConfigMalformed {
                path: path.to_path_buf(),
                reason,
            }
        })
    }

    fn parse(contents: &str, format: ConfigFormat) -> std::result::Result<Self, String> {
        let document: ConfigDocument = if contents.trim().is_empty() {
            ConfigDocument::default()
        } else {
            match format {
                ConfigFormat::Yaml => {
                    serde_yaml::from_str::<ConfigDocument>(contents).map_err(|e| e.to_string())?
                }
                ConfigFormat::Toml => {
                    toml::from_str::<ConfigDocument>(contents).map_err(|e| e.to_string())?
                }
            }
        };

        tracing::debug!(
            "Loaded {} accounts and {} aliases",
            document.accounts.len(),
            document.aliases.len()
        );

        Ok(Self {
            accounts: document.accounts,
            aliases: document.aliases,
        })
    }

    /// Map an identifier to an account ID. Twelve ASCII digits are always
    /// taken literally, even if an alias of the same name exists.
    pub fn resolve(&self, identifier: &str) -> Result<String> {
        if is_account_id(identifier) {
            return Ok(identifier.to_string());
        }

        self.aliases
            .get(identifier)
            .cloned()
            .ok_or_else(|| LoginError::UnknownAlias(identifier.to_string()))
    }

    pub fn role_arn(&self, account_id: &str) -> Result<&str> {
        self.entry(account_id)?
            .role_arn
            .as_deref()
            .ok_or_else(|| LoginError::MissingRoleArn(account_id.to_string()))
    }

    /// `None` means MFA is not required for this account
    pub fn serial_number(&self, account_id: &str) -> Result<Option<&str>> {
        Ok(self.entry(account_id)?.serial_number.as_deref())
    }

    pub fn default_duration(&self, account_id: &str) -> Result<Option<u32>> {
        match &self.entry(account_id)?.duration_seconds {
            None => Ok(None),
            Some(raw) => raw
                .to_seconds()
                .map(Some)
                .ok_or_else(|| LoginError::MalformedDuration {
                    account_id: account_id.to_string(),
                    value: raw.display(),
                }),
        }
    }

    fn entry(&self, account_id: &str) -> Result<&AccountEntry> {
        self.accounts
            .get(account_id)
            .ok_or_else(|| LoginError::UnknownAccount(account_id.to_string()))
    }
}

pub fn is_account_id(identifier: &str) -> bool {
    identifier.len() == 12 && identifier.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
accounts:
  "123456789012":
    role-arn: arn:aws:iam::123456789012:role/Example
  "210987654321":
    role-arn: arn:aws:iam::210987654321:role/Admin
    serial-number: arn:aws:iam::111111111111:mfa/alice
    duration-seconds: 7200
  "999999999999":
    serial-number: arn:aws:iam::111111111111:mfa/alice
  "555555555555":
    role-arn: arn:aws:iam::555555555555:role/Text
    duration-seconds: "900"
  "666666666666":
    role-arn: arn:aws:iam::666666666666:role/Bad
    duration-seconds: soon
  "777777777777":
    role-arn: arn:aws:iam::777777777777:role/Negative
    duration-seconds: -60
aliases:
  dev: "123456789012"
  admin: "210987654321"
  prod: "999999999999"
  "123456789012": "210987654321"
  "12345678901": "123456789012"
  "1234567890123": "210987654321"
"#;

    fn directory() -> AccountDirectory {
        AccountDirectory::parse(SAMPLE, ConfigFormat::Yaml).unwrap()
    }

    #[test]
    fn test_resolve_twelve_digits_is_literal() {
        let dir = directory();
        // An alias with the same text must not be consulted
        assert_eq!(dir.resolve("123456789012").unwrap(), "123456789012");
        // Unconfigured IDs still resolve; config lookups fail later
        assert_eq!(dir.resolve("000000000000").unwrap(), "000000000000");
    }

    #[test]
    fn test_resolve_eleven_and_thirteen_digits_are_aliases() {
        let dir = directory();
        assert_eq!(dir.resolve("12345678901").unwrap(), "123456789012");
        assert_eq!(dir.resolve("1234567890123").unwrap(), "210987654321");
        assert!(matches!(
            dir.resolve("11111111111"),
            Err(LoginError::UnknownAlias(a)) if a == "11111111111"
        ));
        assert!(matches!(
            dir.resolve("1111111111111"),
            Err(LoginError::UnknownAlias(_))
        ));
    }

    #[test]
    fn test_resolve_alias() {
        let dir = directory();
        assert_eq!(dir.resolve("dev").unwrap(), "123456789012");
        assert_eq!(dir.resolve("admin").unwrap(), "210987654321");
    }

    #[test]
    fn test_resolve_unknown_alias() {
        let dir = directory();
        assert!(matches!(
            dir.resolve("staging"),
            Err(LoginError::UnknownAlias(a)) if a == "staging"
        ));
        assert!(matches!(dir.resolve(""), Err(LoginError::UnknownAlias(_))));
    }

    #[test]
    fn test_is_account_id_rejects_non_ascii_digits() {
        assert!(is_account_id("012345678901"));
        assert!(!is_account_id("12345678901a"));
        assert!(!is_account_id(" 23456789012"));
        // Arabic-Indic digits are not account IDs
        assert!(!is_account_id("١٢٣٤٥٦٧٨٩٠١٢"));
    }

    #[test]
    fn test_role_arn() {
        let dir = directory();
        assert_eq!(
            dir.role_arn("123456789012").unwrap(),
            "arn:aws:iam::123456789012:role/Example"
        );
        assert!(matches!(
            dir.role_arn("000000000000"),
            Err(LoginError::UnknownAccount(a)) if a == "000000000000"
        ));
    }

    #[test]
    fn test_alias_to_account_without_role_arn() {
        let dir = directory();
        let account_id = dir.resolve("prod").unwrap();
        assert_eq!(account_id, "999999999999");
        assert!(matches!(
            dir.role_arn(&account_id),
            Err(LoginError::MissingRoleArn(a)) if a == "999999999999"
        ));
    }

    #[test]
    fn test_serial_number_presence() {
        let dir = directory();
        assert_eq!(dir.serial_number("123456789012").unwrap(), None);
        assert_eq!(
            dir.serial_number("210987654321").unwrap(),
            Some("arn:aws:iam::111111111111:mfa/alice")
        );
        assert!(matches!(
            dir.serial_number("000000000000"),
            Err(LoginError::UnknownAccount(_))
        ));
    }

    #[test]
    fn test_default_duration() {
        let dir = directory();
        assert_eq!(dir.default_duration("123456789012").unwrap(), None);
        assert_eq!(dir.default_duration("210987654321").unwrap(), Some(7200));
        assert_eq!(dir.default_duration("555555555555").unwrap(), Some(900));
        assert!(matches!(
            dir.default_duration("000000000000"),
            Err(LoginError::UnknownAccount(_))
        ));
    }

    #[test]
    fn test_default_duration_malformed() {
        let dir = directory();
        assert!(matches!(
            dir.default_duration("666666666666"),
            Err(LoginError::MalformedDuration { value, .. }) if value == "soon"
        ));
        assert!(matches!(
            dir.default_duration("777777777777"),
            Err(LoginError::MalformedDuration { value, .. }) if value == "-60"
        ));
    }

    #[test]
    fn test_non_scalar_duration_only_fails_its_account() {
        let contents = r#"
accounts:
  "123456789012":
    role-arn: arn:aws:iam::123456789012:role/Example
    duration-seconds: true
  "210987654321":
    role-arn: arn:aws:iam::210987654321:role/Admin
    duration-seconds: [1, 2]
  "111111111111":
    role-arn: arn:aws:iam::111111111111:role/Fine
    duration-seconds: 1800
"#;
        let dir = AccountDirectory::parse(contents, ConfigFormat::Yaml).unwrap();

        assert!(matches!(
            dir.default_duration("123456789012"),
            Err(LoginError::MalformedDuration { account_id, value })
                if account_id == "123456789012" && value == "<not a number>"
        ));
        assert!(matches!(
            dir.default_duration("210987654321"),
            Err(LoginError::MalformedDuration { .. })
        ));
        assert_eq!(
            dir.role_arn("123456789012").unwrap(),
            "arn:aws:iam::123456789012:role/Example"
        );
        assert_eq!(
            dir.role_arn("111111111111").unwrap(),
            "arn:aws:iam::111111111111:role/Fine"
        );
        assert_eq!(dir.default_duration("111111111111").unwrap(), Some(1800));
    }

    #[test]
    fn test_non_scalar_duration_in_toml() {
        let contents = r#"
[accounts.123456789012]
role-arn = "arn:aws:iam::123456789012:role/Example"
duration-seconds = true

[accounts.111111111111]
role-arn = "arn:aws:iam::111111111111:role/Fine"
"#;
        let dir = AccountDirectory::parse(contents, ConfigFormat::Toml).unwrap();
        assert!(matches!(
            dir.default_duration("123456789012"),
            Err(LoginError::MalformedDuration { .. })
        ));
        assert_eq!(dir.default_duration("111111111111").unwrap(), None);
    }

    #[test]
    fn test_parse_toml() {
        let contents = r#"
[accounts.123456789012]
role-arn = "arn:aws:iam::123456789012:role/Example"
duration-seconds = 1800

[aliases]
dev = "123456789012"
"#;
        let dir = AccountDirectory::parse(contents, ConfigFormat::Toml).unwrap();
        assert_eq!(dir.resolve("dev").unwrap(), "123456789012");
        assert_eq!(dir.default_duration("123456789012").unwrap(), Some(1800));
    }

    #[test]
    fn test_parse_empty_and_partial_documents() {
        let empty = AccountDirectory::parse("", ConfigFormat::Yaml).unwrap();
        assert!(matches!(empty.resolve("dev"), Err(LoginError::UnknownAlias(_))));

        let only_aliases =
            AccountDirectory::parse("aliases:\n  dev: \"123456789012\"\n", ConfigFormat::Yaml)
                .unwrap();
        assert_eq!(only_aliases.resolve("dev").unwrap(), "123456789012");
        assert!(matches!(
            only_aliases.role_arn("123456789012"),
            Err(LoginError::UnknownAccount(_))
        ));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("/x/aws-login.toml")),
            ConfigFormat::Toml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("/x/aws-login.yaml")),
            ConfigFormat::Yaml
        );
        assert_eq!(ConfigFormat::from_path(Path::new("/x/config")), ConfigFormat::Yaml);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.yaml");
        assert!(matches!(
            AccountDirectory::load(&path),
            Err(LoginError::ConfigUnreadable { .. })
        ));
    }

    #[test]
    fn test_load_malformed_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(b"accounts: [unclosed").unwrap();
        assert!(matches!(
            AccountDirectory::load(file.path()),
            Err(LoginError::ConfigMalformed { .. })
        ));

        let mut wrong_shape = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        wrong_shape.write_all(b"accounts: 42\n").unwrap();
        assert!(matches!(
            AccountDirectory::load(wrong_shape.path()),
            Err(LoginError::ConfigMalformed { .. })
        ));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let dir = AccountDirectory::load(file.path()).unwrap();
        assert_eq!(dir.resolve("admin").unwrap(), "210987654321");
    }
}
