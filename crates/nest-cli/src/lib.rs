//! NEST CLI - command line tools for the NEST service.
//!
//! This crate provides:
//! - load_demo_data: seeds a program, flight model, TAS import, curves,
//!   monitors and a report definition

pub mod bootstrap;
pub mod config;
pub mod logging;

pub use bootstrap::{BootstrapError, BootstrapReport, Bootstrapper, Step, StepOutcome};
pub use config::{BootstrapConfig, EnvConfig, RunOptions};
