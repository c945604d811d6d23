//! NEST Client - authenticated access to the NEST service.
//!
//! [`Authenticator`] obtains bearer tokens from an OIDC identity provider
//! (client-credentials grant, with failover across issuers); [`NestClient`]
//! attaches one to every request it sends.

pub mod auth;
pub mod client;
pub mod discovery;
pub mod error;
pub mod resources;

pub use auth::{AuthError, Authenticator, OidcCredentials, TokenPolicy};
pub use client::{ApiResponse, NestClient, Payload, Presence};
pub use error::ClientError;
