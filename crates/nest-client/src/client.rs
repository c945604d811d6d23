//! NEST service HTTP client.

use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::Value;

use crate::auth::Authenticator;
use crate::error::ClientError;

pub const APPLICATION_JSON: &str = "application/json";
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Request body for [`NestClient::call`].
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Serialized to JSON text.
    Json(Value),
    /// Sent byte for byte, no envelope.
    Binary(Vec<u8>),
}

impl Payload {
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, ClientError> {
        Ok(Payload::Json(serde_json::to_value(value)?))
    }

    fn into_body(self) -> Result<Vec<u8>, ClientError> {
        match self {
            Payload::Json(value) => Ok(serde_json::to_vec(&value)?),
            Payload::Binary(bytes) => Ok(bytes),
        }
    }
}

/// Status and raw body of a NEST response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_created(&self) -> bool {
        self.status == 201
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}

/// Outcome of an existence probe.
///
/// Only 404 means absent. Every other status, errors included, counts as
/// present so that a probe can never trigger a duplicate create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Absent,
    Present(u16),
}

impl Presence {
    pub fn from_status(status: u16) -> Self {
        if status == 404 {
            Presence::Absent
        } else {
            Presence::Present(status)
        }
    }

    /// Present, but the probe did not actually confirm it (e.g. 401, 500).
    pub fn is_unconfirmed(&self) -> bool {
        matches!(self, Presence::Present(status) if !(200..300).contains(status))
    }
}

pub(crate) fn bearer_header(token: &str) -> String {
    format!("Bearer {}", token)
}

/// HTTP client for the NEST service.
///
/// Every request carries a bearer token obtained from the [`Authenticator`].
pub struct NestClient {
    pub(crate) client: Client,
    pub(crate) base_url: String,
    pub(crate) auth: Authenticator,
}

impl NestClient {
    /// Create a client for `base_url` (e.g. "http://localhost:5000").
    pub fn new(
        base_url: impl Into<String>,
        auth: Authenticator,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let base_url = base_url.into();
        Ok(Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .map_err(ClientError::Build)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    /// Send one authenticated request and log its outcome.
    ///
    /// Returns the response whatever its status; only authentication,
    /// transport and encoding failures are errors.
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        payload: Option<Payload>,
        content_type: &str,
        accept: &str,
    ) -> Result<ApiResponse, ClientError> {
        let token = self.auth.bearer_token().await?;
        let url = format!("{}{}", self.base_url, path);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(ACCEPT, accept)
            .header(AUTHORIZATION, bearer_header(&token))
            .header(CONTENT_TYPE, content_type);
        if let Some(payload) = payload {
            request = request.body(payload.into_body()?);
        }

        let transport = |source: reqwest::Error| ClientError::Transport {
            method: method.to_string(),
            url: url.clone(),
            source,
        };

        let response = request.send().await.map_err(transport)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport)?;

        tracing::info!(method = %method, path = %path, status, "{} {}", status, body);

        Ok(ApiResponse { status, body })
    }

    /// `GET path` used as an existence check.
    pub async fn probe(&self, path: &str) -> Result<Presence, ClientError> {
        let response = self
            .call(Method::GET, path, None, APPLICATION_JSON, APPLICATION_JSON)
            .await?;
        Ok(Presence::from_status(response.status))
    }

    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<ApiResponse, ClientError> {
        self.call(
            Method::POST,
            path,
            Some(Payload::json(body)?),
            APPLICATION_JSON,
            APPLICATION_JSON,
        )
        .await
    }

    pub async fn put_binary(&self, path: &str, bytes: Vec<u8>) -> Result<ApiResponse, ClientError> {
        self.call(
            Method::PUT,
            path,
            Some(Payload::Binary(bytes)),
            OCTET_STREAM,
            APPLICATION_JSON,
        )
        .await
    }
}
