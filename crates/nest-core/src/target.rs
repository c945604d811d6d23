//! What a bootstrap run is aimed at.

use std::path::PathBuf;

/// Service URL and resource names addressed by one bootstrap run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetContext {
    /// Base URL of the NEST service, without a trailing slash.
    pub service_url: String,
    pub program: String,
    pub customer: String,
    /// Flight-model name of the spacecraft.
    pub spacecraft: String,
    /// TAS zip archive uploaded as the telemetry database import.
    pub import_file: PathBuf,
}

impl TargetContext {
    pub fn new(
        service_url: impl Into<String>,
        program: impl Into<String>,
        customer: impl Into<String>,
        spacecraft: impl Into<String>,
        import_file: impl Into<PathBuf>,
    ) -> Self {
        let service_url = service_url.into();
        Self {
            service_url: service_url.trim_end_matches('/').to_string(),
            program: program.into(),
            customer: customer.into(),
            spacecraft: spacecraft.into(),
            import_file: import_file.into(),
        }
    }
}
