//! Load a TAS file into a new program / flight model and seed demo data.
//!
//! Usage:
//!   cargo run -p nest-cli --bin load_demo_data -- --nest-url http://nest.local

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use nest_cli::config::{
    load_dotenv, BootstrapConfig, EnvConfig, RunOptions, DEFAULT_CUSTOMER, DEFAULT_IMPORT_FILE,
    DEFAULT_PROGRAM, DEFAULT_SPACECRAFT,
};
use nest_cli::logging::{init_tracing, LogFormat};
use nest_cli::Bootstrapper;
use nest_client::{Authenticator, NestClient, TokenPolicy};

const USAGE_EXAMPLE: &str = "\
Usage example for Minikube:

    export CLIENT_ID=nestservice
    export CLIENT_SECRET=nestservicesecret
    load_demo_data --nest-url http://nest.local \\
        --oidc-endpoint http://keycloak.local/realms/local-development \\
        -c <customer> -p <program> -s <spacecraft> -f <tas_zip>

CLIENT_ID, CLIENT_SECRET, OIDC_ENDPOINTS, FLASK_HOST and FLASK_PORT are read
from the environment or from the --env-file dotfile.";

/// Seed a NEST service with demonstration data
#[derive(Parser, Debug)]
#[command(author, version, about, after_help = USAGE_EXAMPLE)]
struct Args {
    /// Customer name for the program
    #[arg(short, long, default_value = DEFAULT_CUSTOMER)]
    customer: String,

    /// Program name
    #[arg(short, long, default_value = DEFAULT_PROGRAM)]
    program: String,

    /// Spacecraft (flight model) name
    #[arg(short, long, default_value = DEFAULT_SPACECRAFT)]
    spacecraft: String,

    /// TAS zip file to import
    #[arg(short, long, default_value = DEFAULT_IMPORT_FILE)]
    file: PathBuf,

    /// Full base URL of the NEST service, e.g. http://nest.local
    #[arg(long)]
    nest_url: Option<String>,

    /// OIDC issuer, e.g. http://keycloak.local/realms/local-development
    #[arg(long)]
    oidc_endpoint: Option<String>,

    /// Dotfile loaded before reading the environment
    #[arg(long, default_value = ".env")]
    env_file: PathBuf,

    /// When to fetch bearer tokens: per-request or cached
    #[arg(long, default_value_t = TokenPolicy::PerRequest)]
    token_policy: TokenPolicy,

    /// Fail instead of sending an empty bearer token when the identity
    /// provider returns no access_token
    #[arg(long)]
    strict_auth: bool,

    /// Per-request timeout in seconds (default: NEST_HTTP_TIMEOUT_SECS or 30)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

impl Args {
    fn run_options(&self) -> RunOptions {
        RunOptions {
            customer: self.customer.clone(),
            program: self.program.clone(),
            spacecraft: self.spacecraft.clone(),
            import_file: self.file.clone(),
            nest_url: self.nest_url.clone(),
            oidc_endpoint: self.oidc_endpoint.clone(),
            token_policy: self.token_policy,
            strict_auth: self.strict_auth,
            timeout_secs: self.timeout_secs,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Before tracing so RUST_LOG may come from the dotfile.
    let dotenv = load_dotenv(&args.env_file);
    init_tracing(args.log_format)?;
    match dotenv {
        Ok(true) => tracing::info!(file = %args.env_file.display(), "Loaded environment file"),
        Ok(false) => tracing::debug!(file = %args.env_file.display(), "No environment file"),
        Err(e) => tracing::warn!(file = %args.env_file.display(), error = %e, "Ignoring unreadable environment file"),
    }

    let config = BootstrapConfig::resolve(EnvConfig::from_env(), args.run_options());
    tracing::info!(
        service = %config.target.service_url,
        issuers = ?config.credentials.issuers,
        token_policy = %config.token_policy,
        "Seeding demo data for program {} / flight model {}",
        config.target.program,
        config.target.spacecraft
    );

    let auth = Authenticator::new(config.credentials.clone(), config.token_policy, config.timeout)
        .context("Failed to create authenticator")?
        .with_strict(config.strict_auth);
    let client = NestClient::new(config.target.service_url.clone(), auth, config.timeout)
        .context("Failed to create NEST client")?;

    let report = Bootstrapper::new(client, config.target)
        .run()
        .await
        .context("Demo data bootstrap failed")?;

    for record in &report.steps {
        tracing::info!(step = %record.step, outcome = ?record.outcome, "Step finished");
    }

    if report.aborted {
        anyhow::bail!("Program creation was rejected; remaining steps were skipped");
    }

    Ok(())
}
