//! NEST Core - payload models and demo fixtures.
//!
//! Nothing in this crate performs I/O; the client and CLI crates build on
//! these types to talk to the NEST service.

pub mod fixtures;
pub mod models;
pub mod target;

pub use models::{
    Calibration, Coefficients, Curve, CurvesRequest, FlightModel, FlightModelsRequest,
    LimitCheck, Monitor, MonitorCheck, MonitoredParameter, MonitorsRequest, NumericTable,
    Program, ProgramsRequest, ReportDefinition, ReportDefinitionsRequest, TextBand,
};
pub use target::TargetContext;
