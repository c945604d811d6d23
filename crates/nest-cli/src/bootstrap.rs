//! Idempotent demo-data bootstrap against a NEST service.
//!
//! Steps run strictly in order:
//!
//! 1. PROGRAM: probe, create on 404; a rejected create stops the run
//! 2. TAS IMPORT: upload the archive, always
//! 3. FLIGHT MODEL: probe, create on 404
//! 4. CURVES, 5. MONITORS, 6. REPORT DEFINITIONS: submitted on every run
//!
//! Steps 2 to 6 are best-effort: a rejection is recorded in the report and
//! the run carries on.

use std::fmt;
use std::path::PathBuf;

use nest_client::{ApiResponse, ClientError, NestClient, Presence};
use nest_core::{fixtures, TargetContext};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("failed to read import file {}: {source}", .path.display())]
    ImportFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Program,
    TasImport,
    FlightModel,
    Curves,
    Monitors,
    ReportDefinitions,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Program => write!(f, "PROGRAM"),
            Step::TasImport => write!(f, "TAS_IMPORT"),
            Step::FlightModel => write!(f, "FLIGHT_MODEL"),
            Step::Curves => write!(f, "CURVES"),
            Step::Monitors => write!(f, "MONITORS"),
            Step::ReportDefinitions => write!(f, "REPORT_DEFINITIONS"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Probe did not answer 404; nothing was created.
    AlreadyPresent(u16),
    /// Probe answered 404 and the create call was accepted.
    Created(u16),
    /// Sent without a probe and accepted.
    Submitted(u16),
    /// The service answered with a non-success status.
    Rejected(u16),
}

impl StepOutcome {
    fn from_submission(response: &ApiResponse) -> Self {
        if response.is_success() {
            StepOutcome::Submitted(response.status)
        } else {
            StepOutcome::Rejected(response.status)
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, StepOutcome::Rejected(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepRecord {
    pub step: Step,
    pub outcome: StepOutcome,
}

/// What each step did during one run.
#[derive(Debug, Clone, Default)]
pub struct BootstrapReport {
    pub steps: Vec<StepRecord>,
    /// Program creation was rejected and the remaining steps were skipped.
    pub aborted: bool,
}

impl BootstrapReport {
    fn record(&mut self, step: Step, outcome: StepOutcome) -> StepOutcome {
        self.steps.push(StepRecord { step, outcome });
        outcome
    }

    pub fn outcome(&self, step: Step) -> Option<StepOutcome> {
        self.steps
            .iter()
            .find(|record| record.step == step)
            .map(|record| record.outcome)
    }

    pub fn rejected(&self) -> impl Iterator<Item = &StepRecord> {
        self.steps.iter().filter(|record| record.outcome.is_rejected())
    }
}

/// Drives the seeding pipeline for one [`TargetContext`].
pub struct Bootstrapper {
    client: NestClient,
    target: TargetContext,
}

impl Bootstrapper {
    pub fn new(client: NestClient, target: TargetContext) -> Self {
        Self { client, target }
    }

    /// Run every step once.
    ///
    /// Authentication, transport and import-file errors stop the run and are
    /// returned as errors. A rejected program create ends the run early with
    /// [`BootstrapReport::aborted`] set.
    pub async fn run(&self) -> Result<BootstrapReport, BootstrapError> {
        let mut report = BootstrapReport::default();

        let program = report.record(Step::Program, self.ensure_program().await?);
        if program.is_rejected() {
            tracing::error!(
                program = %self.target.program,
                "Program creation rejected; skipping remaining steps"
            );
            report.aborted = true;
            return Ok(report);
        }

        report.record(Step::TasImport, self.import_tas().await?);
        report.record(Step::FlightModel, self.ensure_flight_model().await?);
        report.record(Step::Curves, self.seed_curves().await?);
        report.record(Step::Monitors, self.seed_monitors().await?);
        report.record(Step::ReportDefinitions, self.seed_report_definitions().await?);

        for record in report.rejected() {
            tracing::warn!(step = %record.step, outcome = ?record.outcome, "Step was rejected");
        }

        Ok(report)
    }

    async fn ensure_program(&self) -> Result<StepOutcome, BootstrapError> {
        let program = &self.target.program;
        tracing::info!("Checking for program {}", program);

        match self.client.program_presence(program).await? {
            Presence::Absent => {
                tracing::info!("Creating program {}...", program);
                let response = self
                    .client
                    .create_programs(&fixtures::program_request(&self.target))
                    .await?;
                if response.is_created() {
                    Ok(StepOutcome::Created(response.status))
                } else {
                    Ok(StepOutcome::Rejected(response.status))
                }
            }
            presence @ Presence::Present(status) => {
                log_presence(presence, "program", program);
                Ok(StepOutcome::AlreadyPresent(status))
            }
        }
    }

    async fn import_tas(&self) -> Result<StepOutcome, BootstrapError> {
        let path = &self.target.import_file;
        let archive = tokio::fs::read(path)
            .await
            .map_err(|source| BootstrapError::ImportFile {
                path: path.clone(),
                source,
            })?;

        tracing::info!(file = %path.display(), bytes = archive.len(), "Loading TAS import...");
        let response = self.client.import_tas(&self.target.program, archive).await?;
        Ok(StepOutcome::from_submission(&response))
    }

    async fn ensure_flight_model(&self) -> Result<StepOutcome, BootstrapError> {
        let spacecraft = &self.target.spacecraft;
        tracing::info!("Checking for flight model {}", spacecraft);

        match self.client.flight_model_presence(spacecraft).await? {
            Presence::Absent => {
                tracing::info!("Creating flight model {}...", spacecraft);
                let response = self
                    .client
                    .create_flight_models(&fixtures::flight_model_request(&self.target))
                    .await?;
                if response.is_success() {
                    Ok(StepOutcome::Created(response.status))
                } else {
                    Ok(StepOutcome::Rejected(response.status))
                }
            }
            presence @ Presence::Present(status) => {
                log_presence(presence, "flight model", spacecraft);
                Ok(StepOutcome::AlreadyPresent(status))
            }
        }
    }

    async fn seed_curves(&self) -> Result<StepOutcome, BootstrapError> {
        tracing::info!("Loading test curves...");
        let response = self.client.submit_curves(&fixtures::demo_curves()).await?;
        Ok(StepOutcome::from_submission(&response))
    }

    async fn seed_monitors(&self) -> Result<StepOutcome, BootstrapError> {
        tracing::info!("Loading test monitors...");
        let response = self
            .client
            .submit_monitors(&fixtures::demo_monitors(&self.target))
            .await?;
        Ok(StepOutcome::from_submission(&response))
    }

    async fn seed_report_definitions(&self) -> Result<StepOutcome, BootstrapError> {
        tracing::info!("Loading test report definitions...");
        let response = self
            .client
            .submit_report_definitions(&fixtures::demo_report_definitions(&self.target))
            .await?;
        Ok(StepOutcome::from_submission(&response))
    }
}

fn log_presence(presence: Presence, kind: &str, name: &str) {
    if presence.is_unconfirmed() {
        tracing::warn!(
            status = ?presence,
            "Probe for {} {} did not answer 404; assuming it exists",
            kind,
            name
        );
    } else {
        tracing::info!("Found existing {} {}", kind, name);
    }
}
