use crate::config::AppSettings;
use crate::error::{GroupctlError, Result};
use oauth2::{
    AuthUrl, ClientId, DeviceAuthorizationUrl, EmptyExtraDeviceAuthorizationFields,
    ResourceOwnerPassword, ResourceOwnerUsername, Scope, TokenResponse, TokenUrl,
    basic::{BasicClient, BasicTokenResponse},
    reqwest::async_http_client,
};
use std::fmt;
use std::time::Duration;
use zeroize::Zeroizing;

/// Delegated permissions requested for every sign-in
pub const REQUIRED_SCOPES: &[&str] = &[
    "User.Read",
    "User.ReadBasic.All",
    "Group.Read.All",
    "Group.ReadWrite.All",
    "Directory.Read.All",
];

const DEFAULT_EXPIRY: Duration = Duration::from_secs(3600);
const PASSWORD_CAPACITY: usize = 64;

/// Authority for a tenant, e.g. `https://login.microsoftonline.com/<tenant>/v2.0`
pub fn authority_url(authority_host: &str, tenant_id: &str) -> String {
    format!("{}/{}/v2.0", authority_host.trim_end_matches('/'), tenant_id)
}

fn endpoint(authority_host: &str, tenant_id: &str, leaf: &str) -> String {
    format!(
        "{}/{}/oauth2/v2.0/{}",
        authority_host.trim_end_matches('/'),
        tenant_id,
        leaf
    )
}

/// Masked password buffer. Zeroed on drop and never printed.
pub struct Password(Zeroizing<String>);

impl Password {
    pub fn new() -> Self {
        Self(Zeroizing::new(String::with_capacity(PASSWORD_CAPACITY)))
    }

    /// Append a character. The buffer never reallocates in place: when it
    /// is full the contents move to a larger zeroized buffer and the old one
    /// is wiped on drop.
    pub fn push(&mut self, c: char) {
        let needed = self.0.len() + c.len_utf8();
        if needed > self.0.capacity() {
            let mut grown = Zeroizing::new(String::with_capacity(
                needed.max(self.0.capacity() * 2),
            ));
            grown.push_str(&self.0);
            self.0 = grown;
        }
        self.0.push(c);
    }

    pub fn pop(&mut self) -> Option<char> {
        self.0.pop()
    }

    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn expose_secret(&self) -> &str {
        &self.0
    }
}

impl Default for Password {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password([REDACTED])")
    }
}

/// Bearer token issued by the identity platform
#[derive(Clone)]
pub struct AccessToken {
    secret: Zeroizing<String>,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

impl AccessToken {
    pub fn new(secret: String, expires_at: chrono::DateTime<chrono::Utc>) -> Self {
        Self {
            secret: Zeroizing::new(secret),
            expires_at,
        }
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at <= chrono::Utc::now()
    }

    fn from_response(token: &BasicTokenResponse) -> Self {
        let lifetime = token.expires_in().unwrap_or(DEFAULT_EXPIRY);
        let lifetime = chrono::Duration::from_std(lifetime)
            .unwrap_or_else(|_| chrono::Duration::seconds(DEFAULT_EXPIRY.as_secs() as i64));

        Self::new(
            token.access_token().secret().clone(),
            chrono::Utc::now() + lifetime,
        )
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("secret", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Public-client sign-in against one tenant
pub struct GraphAuth {
    client_id: String,
    tenant_id: String,
    authority_host: String,
}

impl GraphAuth {
    pub fn new(settings: &AppSettings) -> Self {
        Self {
            client_id: settings.application_id.clone(),
            tenant_id: settings.tenant_id.clone(),
            authority_host: settings.authority_host.clone(),
        }
    }

    pub fn authority(&self) -> String {
        authority_url(&self.authority_host, &self.tenant_id)
    }

    fn oauth_client(&self) -> Result<BasicClient> {
        let auth_url = AuthUrl::new(endpoint(&self.authority_host, &self.tenant_id, "authorize"))
            .map_err(|e| GroupctlError::AuthError(format!("Invalid auth URL: {}", e)))?;

        let token_url = TokenUrl::new(endpoint(&self.authority_host, &self.tenant_id, "token"))
            .map_err(|e| GroupctlError::AuthError(format!("Invalid token URL: {}", e)))?;

        Ok(BasicClient::new(
            ClientId::new(self.client_id.clone()),
            None,
            auth_url,
            Some(token_url),
        ))
    }

    fn scopes() -> impl Iterator<Item = Scope> {
        REQUIRED_SCOPES.iter().map(|s| Scope::new(s.to_string()))
    }

    /// Resource-owner password grant. The password is consumed and dropped
    /// (zeroed) when the exchange returns.
    pub async fn login_password(&self, username: &str, password: Password) -> Result<AccessToken> {
        tracing::debug!(
            "Requesting token from {} for {}",
            self.authority(),
            username
        );

        let client = self.oauth_client()?;
        let username = ResourceOwnerUsername::new(username.to_string());
        let token = {
            let password = ResourceOwnerPassword::new(password.expose_secret().to_string());
            client
                .exchange_password(&username, &password)
                .add_scopes(Self::scopes())
                .request_async(async_http_client)
                .await
                .map_err(|e| {
                    GroupctlError::AuthError(format!("Password grant failed: {}", describe(&e)))
                })?
        };
        drop(password);

        let token = AccessToken::from_response(&token);
        tracing::debug!("Token acquired, expires at {}", token.expires_at);
        Ok(token)
    }

    /// Device authorization grant (interactive, no password typed here)
    pub async fn login_device_code(&self) -> Result<AccessToken> {
        let device_auth_url =
            DeviceAuthorizationUrl::new(endpoint(&self.authority_host, &self.tenant_id, "devicecode"))
                .map_err(|e| {
                    GroupctlError::AuthError(format!("Invalid device auth URL: {}", e))
                })?;

        let client = self
            .oauth_client()?
            .set_device_authorization_url(device_auth_url);

        let details: oauth2::DeviceAuthorizationResponse<EmptyExtraDeviceAuthorizationFields> =
            client
                .exchange_device_code()
                .map_err(|e| GroupctlError::AuthError(format!("Device code exchange failed: {}", e)))?
                .add_scopes(Self::scopes())
                .request_async(async_http_client)
                .await
                .map_err(|e| {
                    GroupctlError::AuthError(format!(
                        "Device authorization request failed: {}",
                        describe(&e)
                    ))
                })?;

        println!("\nPlease visit: {}", details.verification_uri().as_str());
        println!("Enter code: {}\n", details.user_code().secret());

        let token = client
            .exchange_device_access_token(&details)
            .request_async(async_http_client, tokio::time::sleep, None)
            .await
            .map_err(|e| {
                GroupctlError::AuthError(format!("Token exchange failed: {}", describe(&e)))
            })?;

        Ok(AccessToken::from_response(&token))
    }
}

/// Prefer the provider's `error_description` over the generic error text
fn describe<RE, T>(error: &oauth2::RequestTokenError<RE, oauth2::StandardErrorResponse<T>>) -> String
where
    RE: std::error::Error + 'static,
    T: oauth2::ErrorResponseType + fmt::Display + 'static,
{
    match error {
        oauth2::RequestTokenError::ServerResponse(response) => {
            let code = response.error().to_string();
            match response.error_description() {
                Some(description) => format!("{}: {}", code, description),
                None => code,
            }
        }
        other => other.to_string(),
    }
}
