//! OIDC client-credentials authentication with issuer failover.
//!
//! Issuers are tried in order. Discovery and token exchange failures move on
//! to the next issuer; the first issuer that hands out a token wins.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::discovery::discover_token_endpoint;

const TOKEN_REFRESH_LEEWAY_SECS: u64 = 60;
const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no OIDC issuer endpoints configured")]
    NoIssuers,

    #[error("OIDC discovery failed for {issuer}: {reason}")]
    Discovery { issuer: String, reason: String },

    #[error("token exchange failed for {issuer}: {reason}")]
    TokenExchange { issuer: String, reason: String },

    #[error("token response from {issuer} has no access_token")]
    MissingAccessToken { issuer: String },

    #[error("all OIDC issuers failed: {}", summarize(.attempts))]
    Exhausted { attempts: Vec<AuthError> },

    #[error("failed to build identity provider client: {0}")]
    Client(#[source] reqwest::Error),
}

fn summarize(attempts: &[AuthError]) -> String {
    attempts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Client credentials and the identity providers that accept them.
#[derive(Clone)]
pub struct OidcCredentials {
    pub client_id: String,
    pub client_secret: String,
    /// Issuer base URLs, e.g. `http://keycloak.local/realms/local-development`.
    pub issuers: Vec<String>,
}

impl fmt::Debug for OidcCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OidcCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("issuers", &self.issuers)
            .finish()
    }
}

/// When a bearer token is fetched from the identity provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TokenPolicy {
    /// A fresh token for every outbound call.
    #[default]
    PerRequest,
    /// Reuse a token until shortly before it expires.
    Cached,
}

impl FromStr for TokenPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "per-request" | "per_request" => Ok(TokenPolicy::PerRequest),
            "cached" => Ok(TokenPolicy::Cached),
            other => Err(format!(
                "unknown token policy '{other}' (expected 'per-request' or 'cached')"
            )),
        }
    }
}

impl fmt::Display for TokenPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenPolicy::PerRequest => write!(f, "per-request"),
            TokenPolicy::Cached => write!(f, "cached"),
        }
    }
}

#[derive(Debug, Clone)]
struct IssuedToken {
    access_token: String,
    expires_at: Instant,
}

#[derive(Debug, Serialize)]
struct ClientCredentialsRequest<'a> {
    grant_type: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

pub struct Authenticator {
    credentials: OidcCredentials,
    policy: TokenPolicy,
    strict: bool,
    client: Client,
    cached: Mutex<Option<IssuedToken>>,
}

impl Authenticator {
    pub fn new(
        credentials: OidcCredentials,
        policy: TokenPolicy,
        timeout: Duration,
    ) -> Result<Self, AuthError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(AuthError::Client)?;

        Ok(Self {
            credentials,
            policy,
            strict: false,
            client,
            cached: Mutex::new(None),
        })
    }

    /// Treat a token response without `access_token` as a failure instead of
    /// falling back to an empty bearer token.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Bearer token for the next outbound call, honouring the token policy.
    pub async fn bearer_token(&self) -> Result<String, AuthError> {
        match self.policy {
            TokenPolicy::PerRequest => self.fetch_token().await,
            TokenPolicy::Cached => self.cached_token().await,
        }
    }

    /// Fetch a new token from the identity provider, bypassing any cache.
    ///
    /// Returns an empty string only in lenient mode, when every issuer failed
    /// and at least one of them answered the exchange without an
    /// `access_token`.
    pub async fn fetch_token(&self) -> Result<String, AuthError> {
        Ok(self.acquire().await?.access_token)
    }

    async fn cached_token(&self) -> Result<String, AuthError> {
        // Held across the refresh so concurrent callers wait for one fetch.
        let mut guard = self.cached.lock().await;
        if let Some(cached) = guard.as_ref() {
            if cached.expires_at > Instant::now() {
                return Ok(cached.access_token.clone());
            }
        }

        let fresh = self.acquire().await?;
        let token = fresh.access_token.clone();
        *guard = if token.is_empty() { None } else { Some(fresh) };
        Ok(token)
    }

    async fn acquire(&self) -> Result<IssuedToken, AuthError> {
        if self.credentials.issuers.is_empty() {
            return Err(AuthError::NoIssuers);
        }

        let mut attempts = Vec::new();
        for issuer in &self.credentials.issuers {
            match self.request_token(issuer).await {
                Ok(token) => {
                    tracing::debug!(issuer = %issuer, "access token issued");
                    return Ok(token);
                }
                Err(err) => {
                    tracing::warn!(issuer = %issuer, error = %err, "OIDC issuer failed, trying next");
                    attempts.push(err);
                }
            }
        }

        let answered_without_token = attempts
            .iter()
            .any(|err| matches!(err, AuthError::MissingAccessToken { .. }));
        if answered_without_token && !self.strict {
            tracing::warn!("no issuer returned an access_token; continuing with an empty bearer token");
            return Ok(IssuedToken {
                access_token: String::new(),
                expires_at: Instant::now(),
            });
        }

        Err(AuthError::Exhausted { attempts })
    }

    async fn request_token(&self, issuer: &str) -> Result<IssuedToken, AuthError> {
        let token_endpoint = discover_token_endpoint(&self.client, issuer).await?;

        let failed = |reason: String| AuthError::TokenExchange {
            issuer: issuer.to_string(),
            reason,
        };

        let request = ClientCredentialsRequest {
            grant_type: "client_credentials",
            client_id: &self.credentials.client_id,
            client_secret: &self.credentials.client_secret,
        };

        let payload: TokenResponse = self
            .client
            .post(&token_endpoint)
            .basic_auth(
                &self.credentials.client_id,
                Some(&self.credentials.client_secret),
            )
            .form(&request)
            .send()
            .await
            .map_err(|e| failed(format!("request failed: {e}")))?
            .error_for_status()
            .map_err(|e| failed(format!("unexpected status: {e}")))?
            .json()
            .await
            .map_err(|e| failed(format!("invalid token response: {e}")))?;

        let access_token = payload
            .access_token
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| AuthError::MissingAccessToken {
                issuer: issuer.to_string(),
            })?;

        Ok(IssuedToken {
            access_token,
            expires_at: Instant::now() + cache_ttl(payload.expires_in),
        })
    }
}

/// How long an issued token may be reused.
///
/// The refresh leeway is capped at half the lifetime so a short-lived token
/// is never served past its `expires_in`.
fn cache_ttl(expires_in: Option<u64>) -> Duration {
    let lifetime = expires_in.unwrap_or(DEFAULT_TOKEN_TTL_SECS);
    Duration::from_secs(lifetime.saturating_sub(TOKEN_REFRESH_LEEWAY_SECS.min(lifetime / 2)))
}
