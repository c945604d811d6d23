//! Tracing setup for the CLI binaries.

use anyhow::Result;
use clap::ValueEnum;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Install the global subscriber. `RUST_LOG` adds to the default
/// `info` level for the workspace crates.
pub fn init_tracing(format: LogFormat) -> Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive("nest_cli=info".parse()?)
        .add_directive("nest_client=info".parse()?)
        .add_directive("load_demo_data=info".parse()?);

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry.with(fmt::layer()).try_init()?,
        LogFormat::Json => registry.with(fmt::layer().json()).try_init()?,
    }
    Ok(())
}
