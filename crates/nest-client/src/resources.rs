//! NEST resource paths and typed calls.

use nest_core::{
    CurvesRequest, FlightModelsRequest, MonitorsRequest, ProgramsRequest,
    ReportDefinitionsRequest,
};

use crate::client::{ApiResponse, NestClient, Presence};
use crate::error::ClientError;

pub const PROGRAMS: &str = "/programs";
pub const FLIGHT_MODELS: &str = "/flight-models";
pub const CURVES: &str = "/curves";
pub const MONITORS: &str = "/monitors";
pub const REPORT_DEFINITIONS: &str = "/report-definitions";

pub fn program(name: &str) -> String {
    format!("{PROGRAMS}/{name}")
}

pub fn flight_model(name: &str) -> String {
    format!("{FLIGHT_MODELS}/{name}")
}

/// TAS telemetry database import for a program.
pub fn tas_import(program: &str) -> String {
    format!("/imports/tas/ids/{program}")
}

impl NestClient {
    pub async fn program_presence(&self, name: &str) -> Result<Presence, ClientError> {
        self.probe(&program(name)).await
    }

    pub async fn create_programs(&self, request: &ProgramsRequest) -> Result<ApiResponse, ClientError> {
        self.post_json(PROGRAMS, request).await
    }

    /// Upload a zipped TAS archive; the bytes are forwarded unmodified.
    pub async fn import_tas(&self, program: &str, archive: Vec<u8>) -> Result<ApiResponse, ClientError> {
        self.put_binary(&tas_import(program), archive).await
    }

    pub async fn flight_model_presence(&self, name: &str) -> Result<Presence, ClientError> {
        self.probe(&flight_model(name)).await
    }

    pub async fn create_flight_models(
        &self,
        request: &FlightModelsRequest,
    ) -> Result<ApiResponse, ClientError> {
        self.post_json(FLIGHT_MODELS, request).await
    }

    pub async fn submit_curves(&self, request: &CurvesRequest) -> Result<ApiResponse, ClientError> {
        self.post_json(CURVES, request).await
    }

    pub async fn submit_monitors(&self, request: &MonitorsRequest) -> Result<ApiResponse, ClientError> {
        self.post_json(MONITORS, request).await
    }

    pub async fn submit_report_definitions(
        &self,
        request: &ReportDefinitionsRequest,
    ) -> Result<ApiResponse, ClientError> {
        self.post_json(REPORT_DEFINITIONS, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_paths() {
        assert_eq!(program("HummingSat"), "/programs/HummingSat");
        assert_eq!(flight_model("HS01"), "/flight-models/HS01");
        assert_eq!(tas_import("HummingSat"), "/imports/tas/ids/HummingSat");
    }
}
