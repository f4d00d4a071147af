// AWS Console federation and URL generation
use crate::credentials::CredentialBroker;
use crate::error::{LoginError, Result};
use crate::models::ResolvedCredentials;
use serde_json::{json, Value};

/// AWS Federation endpoint
pub const FEDERATION_URL: &str = "https://signin.aws.amazon.com/federation";

pub const DEFAULT_DESTINATION: &str = "https://console.aws.amazon.com/";

/// The `getSigninToken` action of the federation endpoint
#[cfg_attr(test, mockall::automock)]
pub trait FederationEndpoint {
    /// Returns the parsed JSON body of the response
    fn get_signin_token(&self, session_json: &str, duration_secs: Option<u32>) -> Result<Value>;
}

/// Blocking HTTP client for the federation endpoint
#[derive(Debug)]
pub struct FederationClient {
    base_url: String,
}

impl FederationClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for FederationClient {
    fn default() -> Self {
        Self::new(FEDERATION_URL)
    }
}

impl FederationEndpoint for FederationClient {
    fn get_signin_token(&self, session_json: &str, duration_secs: Option<u32>) -> Result<Value> {
        let mut token_url = format!("{}?Action=getSigninToken", self.base_url);
        if let Some(duration) = duration_secs {
            token_url.push_str(&format!("&SessionDuration={}", duration));
        }
        token_url.push_str(&format!("&Session={}", urlencoding::encode(session_json)));

        tracing::debug!("Requesting sign-in token from AWS federation endpoint");
        let response = reqwest::blocking::get(&token_url)
            .and_then(|r| r.error_for_status())
            .map_err(|e| LoginError::SigninRequestFailed(e.to_string()))?;

        let body = response
            .text()
            .map_err(|e| LoginError::SigninRequestFailed(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| LoginError::SigninResponseMalformed(e.to_string()))
    }
}

/// Turns role credentials into a console sign-in URL
pub struct ConsoleLinkBuilder<E: FederationEndpoint> {
    endpoint: E,
}

impl<E: FederationEndpoint> ConsoleLinkBuilder<E> {
    pub fn new(endpoint: E) -> Self {
        Self { endpoint }
    }

    /// Resolve credentials through the broker and build a URL whose session
    /// lasts for the same effective duration used to resolve them
    pub fn sign_in(
        &self,
        broker: &CredentialBroker,
        identifier: &str,
        destination: &str,
        requested_secs: u32,
    ) -> Result<String> {
        let creds = broker.resolve(identifier, requested_secs)?;
        tracing::debug!(
            "Building console URL for {} (cached credentials: {})",
            creds.account_id,
            creds.from_cache
        );
        self.build(&creds, destination, Some(creds.duration_seconds))
    }

    pub fn build(
        &self,
        creds: &ResolvedCredentials,
        destination: &str,
        duration_secs: Option<u32>,
    ) -> Result<String> {
        let session_json = session_payload(creds);

        let response = self
            .endpoint
            .get_signin_token(&session_json, duration_secs)?;

        let signin_token = response
            .get("SigninToken")
            .and_then(Value::as_str)
            .ok_or(LoginError::SigninTokenMissing)?;

        Ok(format!(
            "{}?Action=login&SigninToken={}&Destination={}",
            FEDERATION_URL,
            signin_token,
            urlencoding::encode(destination)
        ))
    }
}

fn session_payload(creds: &ResolvedCredentials) -> String {
    json!({
        "sessionId": creds.access_key_id,
        "sessionKey": creds.secret_access_key,
        "sessionToken": creds.session_token,
    })
    .to_string()
}

/// Open the AWS Console in the default browser
pub fn open_in_browser(url: &str) -> Result<()> {
    tracing::info!("Opening AWS Console in browser");
    webbrowser::open(url).map_err(|e| LoginError::BrowserLaunchFailed(e.to_string()))
}
