//! Bootstrap configuration from `.env`, environment and command-line flags.

use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use nest_client::{OidcCredentials, TokenPolicy};
use nest_core::TargetContext;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: &str = "5000";
pub const DEFAULT_CLIENT_ID: &str = "nestservice";
pub const DEFAULT_CLIENT_SECRET: &str = "nestservicesecret";
pub const DEFAULT_OIDC_ENDPOINTS: &str = "http://localhost:3008/realms/local-development";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_CUSTOMER: &str = "SWISSto12";
pub const DEFAULT_PROGRAM: &str = "HummingSat";
pub const DEFAULT_SPACECRAFT: &str = "HS01";
pub const DEFAULT_IMPORT_FILE: &str = "./tests/tas/xml/IDS_XML_20250919.zip";

/// Load a dotfile into the process environment.
///
/// Variables already set in the environment are left untouched. Returns
/// `Ok(false)` when the file does not exist.
pub fn load_dotenv(path: &Path) -> Result<bool, dotenv::Error> {
    match dotenv::from_path(path) {
        Ok(()) => Ok(true),
        Err(dotenv::Error::Io(err)) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

/// Settings read from the environment.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub host: String,
    pub port: String,
    pub client_id: String,
    pub client_secret: String,
    pub oidc_endpoints: Vec<String>,
    pub timeout_secs: u64,
    pub strict_auth: bool,
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; missing keys fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Self {
            host: get("FLASK_HOST", DEFAULT_HOST),
            port: get("FLASK_PORT", DEFAULT_PORT),
            client_id: get("CLIENT_ID", DEFAULT_CLIENT_ID),
            client_secret: get("CLIENT_SECRET", DEFAULT_CLIENT_SECRET),
            oidc_endpoints: split_endpoints(&get("OIDC_ENDPOINTS", DEFAULT_OIDC_ENDPOINTS)),
            timeout_secs: lookup("NEST_HTTP_TIMEOUT_SECS")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
            strict_auth: lookup("NEST_STRICT_AUTH")
                .map(|s| is_truthy(&s))
                .unwrap_or(false),
        }
    }

    /// `http://{FLASK_HOST}:{FLASK_PORT}`
    pub fn service_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

fn split_endpoints(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_end_matches('/'))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Command-line choices layered over [`EnvConfig`].
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub customer: String,
    pub program: String,
    pub spacecraft: String,
    pub import_file: PathBuf,
    /// Replaces the `FLASK_HOST`/`FLASK_PORT` service URL.
    pub nest_url: Option<String>,
    /// Replaces the `OIDC_ENDPOINTS` list with this single issuer.
    pub oidc_endpoint: Option<String>,
    pub token_policy: TokenPolicy,
    pub strict_auth: bool,
    pub timeout_secs: Option<u64>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            customer: DEFAULT_CUSTOMER.to_string(),
            program: DEFAULT_PROGRAM.to_string(),
            spacecraft: DEFAULT_SPACECRAFT.to_string(),
            import_file: PathBuf::from(DEFAULT_IMPORT_FILE),
            nest_url: None,
            oidc_endpoint: None,
            token_policy: TokenPolicy::default(),
            strict_auth: false,
            timeout_secs: None,
        }
    }
}

/// Fully resolved, immutable settings for one run.
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    pub target: TargetContext,
    pub credentials: OidcCredentials,
    pub token_policy: TokenPolicy,
    pub strict_auth: bool,
    pub timeout: Duration,
}

impl BootstrapConfig {
    pub fn resolve(env: EnvConfig, options: RunOptions) -> Self {
        let service_url = options
            .nest_url
            .as_deref()
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| env.service_url());

        let issuers = match options.oidc_endpoint.as_deref() {
            Some(endpoint) => vec![endpoint.trim_end_matches('/').to_string()],
            None => env.oidc_endpoints,
        };

        Self {
            target: TargetContext::new(
                service_url,
                options.program,
                options.customer,
                options.spacecraft,
                options.import_file,
            ),
            credentials: OidcCredentials {
                client_id: env.client_id,
                client_secret: env.client_secret,
                issuers,
            },
            token_policy: options.token_policy,
            strict_auth: options.strict_auth || env.strict_auth,
            timeout: Duration::from_secs(options.timeout_secs.unwrap_or(env.timeout_secs).max(1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> EnvConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EnvConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let env = env_from(&[]);
        assert_eq!(env.service_url(), "http://localhost:5000");
        assert_eq!(env.client_id, "nestservice");
        assert_eq!(env.client_secret, "nestservicesecret");
        assert_eq!(
            env.oidc_endpoints,
            vec!["http://localhost:3008/realms/local-development"]
        );
        assert_eq!(env.timeout_secs, 30);
        assert!(!env.strict_auth);
    }

    #[test]
    fn oidc_endpoints_are_split_and_trimmed() {
        let env = env_from(&[(
            "OIDC_ENDPOINTS",
            "http://kc-a/realms/dev/ , http://kc-b/realms/dev,,",
        )]);
        assert_eq!(
            env.oidc_endpoints,
            vec!["http://kc-a/realms/dev", "http://kc-b/realms/dev"]
        );
    }

    #[test]
    fn host_and_port_build_service_url() {
        let config = BootstrapConfig::resolve(
            env_from(&[("FLASK_HOST", "nest"), ("FLASK_PORT", "8080")]),
            RunOptions::default(),
        );
        assert_eq!(config.target.service_url, "http://nest:8080");
    }

    #[test]
    fn flags_override_urls() {
        let options = RunOptions {
            nest_url: Some("http://nest.local/".to_string()),
            oidc_endpoint: Some("http://keycloak.local/realms/local-development/".to_string()),
            ..RunOptions::default()
        };
        let config = BootstrapConfig::resolve(
            env_from(&[
                ("FLASK_HOST", "ignored"),
                ("OIDC_ENDPOINTS", "http://a,http://b"),
            ]),
            options,
        );

        assert_eq!(config.target.service_url, "http://nest.local");
        assert_eq!(
            config.credentials.issuers,
            vec!["http://keycloak.local/realms/local-development"]
        );
    }

    #[test]
    fn target_comes_from_options() {
        let options = RunOptions {
            customer: "ACME".to_string(),
            program: "Orbiter".to_string(),
            spacecraft: "OR02".to_string(),
            import_file: PathBuf::from("/tmp/ids.zip"),
            ..RunOptions::default()
        };
        let config = BootstrapConfig::resolve(env_from(&[]), options);

        assert_eq!(config.target.customer, "ACME");
        assert_eq!(config.target.program, "Orbiter");
        assert_eq!(config.target.spacecraft, "OR02");
        assert_eq!(config.target.import_file, PathBuf::from("/tmp/ids.zip"));
    }

    #[test]
    fn strict_auth_from_either_source() {
        let from_env = BootstrapConfig::resolve(
            env_from(&[("NEST_STRICT_AUTH", "true")]),
            RunOptions::default(),
        );
        assert!(from_env.strict_auth);

        let from_flag = BootstrapConfig::resolve(
            env_from(&[]),
            RunOptions {
                strict_auth: true,
                ..RunOptions::default()
            },
        );
        assert!(from_flag.strict_auth);
    }

    #[test]
    fn timeout_flag_wins_over_env() {
        let config = BootstrapConfig::resolve(
            env_from(&[("NEST_HTTP_TIMEOUT_SECS", "12")]),
            RunOptions {
                timeout_secs: Some(3),
                ..RunOptions::default()
            },
        );
        assert_eq!(config.timeout, Duration::from_secs(3));

        let config = BootstrapConfig::resolve(
            env_from(&[("NEST_HTTP_TIMEOUT_SECS", "12")]),
            RunOptions::default(),
        );
        assert_eq!(config.timeout, Duration::from_secs(12));
    }

    #[test]
    fn missing_dotenv_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!load_dotenv(&dir.path().join(".env")).unwrap());
    }

    #[test]
    fn dotenv_populates_environment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "NEST_CLI_TEST_DOTENV_KEY=from-dotfile\n").unwrap();

        assert!(load_dotenv(&path).unwrap());
        assert_eq!(
            env::var("NEST_CLI_TEST_DOTENV_KEY").as_deref(),
            Ok("from-dotfile")
        );
    }
}
