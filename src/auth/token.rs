//! Bearer token acquisition and caching
//!
//! Implements the OAuth2 client-credentials grant against the identity
//! authority. A token read from the credential file seeds the cache; a
//! cached token is reused for as long as its expiry lies in the future,
//! otherwise a fresh one is requested and cached in memory.

use crate::config::credentials::CredentialStore;
use crate::config::schema::ApiConfig;
use crate::config::SecretString;
use crate::domain::errors::ExporterError;
use crate::domain::result::Result;
use chrono::{DateTime, Duration, Utc};
use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::{debug, info};

/// Time source for expiry checks.
///
/// Injected so token reuse and refresh can be tested without waiting
/// for real tokens to age out.
pub trait Clock: Send + Sync {
    /// The current instant
    fn now(&self) -> DateTime<Utc>;
}

/// The real clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// An access token together with the instant it stops being valid
#[derive(Debug, Clone)]
pub struct CachedToken {
    /// The bearer value sent in the Authorization header
    pub access_token: String,

    /// Expiry instant, issue time plus the lifetime the endpoint returned
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// Whether the token is still usable at `now`.
    ///
    /// The comparison is strict: a token expiring exactly at `now` is
    /// treated as expired.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// Token endpoint response body
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// Obtains bearer tokens for the export API.
///
/// `get_token` returns the cached token while it is valid and performs
/// the client-credentials grant otherwise. The provider is used once,
/// before the worker pool starts; tasks share the returned token string.
pub struct TokenProvider {
    http: reqwest::Client,
    token_url: String,
    scope: String,
    client_id: String,
    client_secret: SecretString,
    cache: Option<CachedToken>,
    clock: Box<dyn Clock>,
}

impl TokenProvider {
    /// Creates a provider from the credential store and API settings.
    ///
    /// A bearer entry in the credential file seeds the cache, so a run
    /// started while an earlier run's token is still valid makes no
    /// token request at all.
    pub fn new(credentials: &CredentialStore, api: &ApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(api.timeout_seconds))
            .build()
            .map_err(|e| {
                ExporterError::Authentication(format!("failed to build HTTP client: {e}"))
            })?;

        let token_url = format!(
            "{}/{}/oauth2/v2.0/token",
            api.authority_url.trim_end_matches('/'),
            credentials.tenant_id
        );

        let cache = credentials.bearer.as_ref().map(|stored| CachedToken {
            access_token: stored.token.clone(),
            expires_at: stored.expires_at,
        });

        Ok(Self {
            http,
            token_url,
            scope: api.scope.clone(),
            client_id: credentials.client_id.clone(),
            client_secret: credentials.client_secret.clone(),
            cache,
            clock: Box::new(SystemClock),
        })
    }

    /// Replaces the time source, for tests.
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns a valid access token, reusing the cache when possible.
    ///
    /// # Errors
    ///
    /// Returns `ExporterError::Authentication` when the grant request
    /// fails, the endpoint answers with a non-success status, or the
    /// response cannot be interpreted.
    pub async fn get_token(&mut self) -> Result<String> {
        let now = self.clock.now();
        if let Some(cached) = &self.cache {
            if cached.is_valid_at(now) {
                debug!(expires_at = %cached.expires_at, "reusing cached bearer token");
                return Ok(cached.access_token.clone());
            }
        }

        let fresh = self.request_token().await?;
        let access_token = fresh.access_token.clone();
        self.cache = Some(fresh);
        Ok(access_token)
    }

    async fn request_token(&self) -> Result<CachedToken> {
        info!("requesting bearer token");

        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.expose_secret().as_ref()),
                ("scope", self.scope.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ExporterError::Authentication(format!("token request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExporterError::Authentication(format!(
                "token endpoint returned {status}: {body}"
            )));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            ExporterError::Authentication(format!("invalid token response: {e}"))
        })?;

        if token.access_token.trim().is_empty() {
            return Err(ExporterError::Authentication(
                "token endpoint returned an empty access token".to_string(),
            ));
        }

        let issued_at = self.clock.now();
        let expires_at = issued_at + Duration::seconds(token.expires_in);
        debug!(%expires_at, "bearer token acquired");

        Ok(CachedToken {
            access_token: token.access_token,
            expires_at,
        })
    }
}
