use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Deserialize;

use crate::auth::AuthError;

/// Only `token_endpoint` is read from the discovery document.
#[derive(Deserialize)]
struct OidcDiscoveryDoc {
    token_endpoint: String,
}

/// Discovery URL for an issuer base URL, tolerating a trailing slash.
pub fn discovery_url(issuer: &str) -> String {
    let base = issuer.trim_end_matches('/');
    format!("{base}/.well-known/openid-configuration")
}

/// Resolve the token endpoint of an OIDC issuer.
///
/// Fetches `{issuer}/.well-known/openid-configuration` and extracts
/// `token_endpoint`.
///
/// # Errors
///
/// Returns [`AuthError::Discovery`] if the request fails, the issuer answers
/// with a non-success status, or the body is not a discovery document with a
/// `token_endpoint`.
pub async fn discover_token_endpoint(client: &Client, issuer: &str) -> Result<String, AuthError> {
    let failed = |reason: String| AuthError::Discovery {
        issuer: issuer.to_string(),
        reason,
    };

    let doc: OidcDiscoveryDoc = client
        .get(discovery_url(issuer))
        .header(ACCEPT, "application/json")
        .send()
        .await
        .map_err(|e| failed(format!("request failed: {e}")))?
        .error_for_status()
        .map_err(|e| failed(format!("unexpected status: {e}")))?
        .json()
        .await
        .map_err(|e| failed(format!("invalid discovery document: {e}")))?;

    if doc.token_endpoint.trim().is_empty() {
        return Err(failed("empty token_endpoint".to_string()));
    }

    Ok(doc.token_endpoint)
}
