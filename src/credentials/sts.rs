use crate::error::{LoginError, Result};
use crate::models::{AssumeRoleRequest, CachedCredential};
use aws_config::meta::region::RegionProviderChain;
use aws_sdk_sts::error::DisplayErrorContext;
use aws_sdk_sts::Client as StsClient;
use chrono::{DateTime, Utc};
use tokio::runtime::Runtime;

/// Region used for STS when none is configured
const FALLBACK_REGION: &str = "us-east-1";

/// Exchanges long-term credentials for role credentials
#[cfg_attr(test, mockall::automock)]
pub trait RoleAssumer {
    fn assume_role(&self, request: &AssumeRoleRequest) -> Result<CachedCredential>;
}

/// Calls STS AssumeRole with the default credential chain.
/// The runtime is only started when a call is actually made.
#[derive(Debug, Default)]
pub struct StsRoleAssumer;

impl StsRoleAssumer {
    pub fn new() -> Self {
        Self
    }

    fn runtime() -> Result<Runtime> {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(LoginError::RuntimeStartFailed)
    }

    async fn client() -> StsClient {
        let region = RegionProviderChain::default_provider().or_else(FALLBACK_REGION);
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(region)
            .load()
            .await;

        StsClient::new(&config)
    }

    async fn send(request: &AssumeRoleRequest) -> Result<CachedCredential> {
        let client = Self::client().await;

        let duration = i32::try_from(request.duration_seconds).unwrap_or(i32::MAX);
        let (serial_number, token_code) = match &request.mfa {
            Some(mfa) => (Some(mfa.serial_number.clone()), Some(mfa.token_code.clone())),
            None => (None, None),
        };

        let response = client
            .assume_role()
            .role_arn(&request.role_arn)
            .role_session_name(&request.session_name)
            .duration_seconds(duration)
            .set_serial_number(serial_number)
            .set_token_code(token_code)
            .send()
            .await
            .map_err(|e| LoginError::RoleAssumptionFailed(DisplayErrorContext(&e).to_string()))?;

        let creds = response.credentials().ok_or_else(|| {
            LoginError::RoleAssumptionFailed("No credentials in AssumeRole response".to_string())
        })?;

        Ok(CachedCredential {
            access_key_id: creds.access_key_id().to_string(),
            secret_access_key: creds.secret_access_key().to_string(),
            session_token: creds.session_token().to_string(),
            expires_at: to_utc(creds.expiration())?,
        })
    }
}

impl RoleAssumer for StsRoleAssumer {
    fn assume_role(&self, request: &AssumeRoleRequest) -> Result<CachedCredential> {
        tracing::info!(
            "Assuming {} (session {}, {}s)",
            request.role_arn,
            request.session_name,
            request.duration_seconds
        );
        Self::runtime()?.block_on(Self::send(request))
    }
}

fn to_utc(expiration: &aws_smithy_types::DateTime) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(expiration.secs(), expiration.subsec_nanos()).ok_or_else(|| {
        LoginError::RoleAssumptionFailed(format!("Invalid expiration timestamp: {:?}", expiration))
    })
}
