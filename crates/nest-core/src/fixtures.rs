//! Demonstration data seeded by `load_demo_data`.
//!
//! Program and flight-model requests are derived from the target; curves,
//! monitors and the report definition are fixed sets that are resubmitted
//! on every run.

use crate::models::{
    Calibration, Coefficients, Curve, CurvesRequest, FlightModel, FlightModelsRequest,
    LimitCheck, Monitor, MonitorCheck, MonitoredParameter, MonitorsRequest, NumericTable,
    Program, ProgramsRequest, ReportDefinition, ReportDefinitionsRequest, TextBand,
};
use crate::target::TargetContext;

/// Reason recorded for program and flight-model creation.
pub const CREATE_REASON: &str = "load test data";
/// Reason recorded for curves and report definitions.
pub const FIXTURE_REASON: &str = "loading test data";
/// Reason recorded for monitors.
pub const MONITOR_REASON: &str = "test";

pub const MONITOR_NAMES: [&str; 4] = ["TEST_HS_01", "TEST_HS_02", "TEST_HS_03", "TEST_HS_04"];

const MONITORED_PARAMETER: &str = "AO_30.AJ_ANGLE_BIAS_REMOVAL_RATE";
const MONITOR_LOW_EVENT: &str = "AO_30.ATM_AO_APPLICATION_INACTIVE";

const HOUSEKEEPING_REPORT: &str = "TEST_HK";
const HOUSEKEEPING_SID: u32 = 99999;
const HOUSEKEEPING_CONDITION: &str = "AJ_SF_ANODE_VOLTAGE_DELTA_VCRP_CHECK.EQ_PPU_38";

pub const HOUSEKEEPING_PARAMETERS: [&str; 13] = [
    "AJ_SF_ANODE_VOLTAGE_DELTA_VCRP_CHECK.EQ_PPU_38",
    "AJ_SF_ANODE_VOLT_RAMP_DOWN_INC.EQ_PPU_38",
    "AJ_SF_ANODE_VOLT_RAMP_UP_INC.EQ_PPU_38",
    "AJ_SF_CRP_VOLT_PROT_THR_HIGH.EQ_PPU_38",
    "AJ_SF_CRP_VOLT_PROT_THR_LOW.EQ_PPU_38",
    "AJ_SF_DISCHARGE_VOLT_PROT_THR.EQ_PPU_38",
    "AJ_SF_EPR_XFC_IV_LOW_VOLT_EPR_APS.EQ_ACE_16",
    "AJ_SF_EPR_XFC_IV_LOW_VOLT_EPR_HET.EQ_ACE_16",
    "AJ_SF_EPR_XFC_IV_LOW_VOLT.EQ_ACE_16",
    "AJ_SF_HEATER_VOLTAGE_PROT_THR.EQ_PPU_38",
    "AJ_SF_MAGNET_VOLTAGE_PROT_HIG.EQ_PPU_38",
    "AJ_SF_MAGNET_VOLTAGE_PROT_LOW.EQ_PPU_38",
    "AJ_SF_THERMO_VOLTAGE_PROT_THR.EQ_PPU_38",
];

pub fn program_request(target: &TargetContext) -> ProgramsRequest {
    ProgramsRequest {
        reason_for_change: CREATE_REASON.to_string(),
        programs: vec![Program {
            name: target.program.clone(),
            customer: target.customer.clone(),
        }],
    }
}

pub fn flight_model_request(target: &TargetContext) -> FlightModelsRequest {
    FlightModelsRequest {
        reason_for_change: CREATE_REASON.to_string(),
        flight_models: vec![FlightModel {
            program: target.program.clone(),
            name: target.spacecraft.clone(),
        }],
    }
}

/// One curve of each kind: polynomial, numeric table, logarithmic, text ranges.
pub fn demo_curves() -> CurvesRequest {
    let mut poly = Curve::named(
        "TEST_POLY",
        Calibration::Polynomial(Coefficients::new([1, 2, 3, 4, 5])),
    )
    .with_radix("D")
    .with_types("I", "I");
    poly.description = Some("The poly test".to_string());
    poly.units = Some("1".to_string());

    let numeric = Curve::named(
        "TEST_NUMERIC",
        Calibration::Numeric(NumericTable {
            xvals: vec![1, 2],
            yvals: vec![3, 4],
        }),
    )
    .with_radix("O")
    .with_types("I", "I");

    let log = Curve::named(
        "TEST_LOG",
        Calibration::Logarithmic(Coefficients::new([5, 4, 3, 2, 1])),
    )
    .with_radix("D");

    let text = Curve::named(
        "TEST_TEXT",
        Calibration::TextRange(vec![
            TextBand::new(0, 3, "LOW"),
            TextBand::new(4, 9, "MID"),
            TextBand::new(10, 1_000_000, "HIGH"),
        ]),
    );

    CurvesRequest {
        reason_for_change: FIXTURE_REASON.to_string(),
        curves: vec![poly, numeric, log, text],
    }
}

/// Four monitors on the same parameter, differing only by name.
pub fn demo_monitors(target: &TargetContext) -> MonitorsRequest {
    let monitors = MONITOR_NAMES
        .iter()
        .map(|name| Monitor {
            monitor_name: name.to_string(),
            description: "PMON_1".to_string(),
            program: target.program.clone(),
            is_enabled: true,
            interpretation: "U".to_string(),
            num_fails: 1,
            validity_parameters: Vec::new(),
            parameter: MonitoredParameter {
                parameter_name: MONITORED_PARAMETER.to_string(),
                absolute_name: String::new(),
                apid: 30,
                monitoring_interval: 0,
                max_reporting_delay: 0,
                is_pmon: true,
                is_parameter_ground_mon: false,
                checks: vec![MonitorCheck {
                    limit: LimitCheck {
                        flight_model: target.spacecraft.clone(),
                        value_type: "int".to_string(),
                        limit_check_type: None,
                        yellow_high: None,
                        yellow_low: None,
                        red_high: None,
                        red_low: Some(1),
                        low_event_name: Some(MONITOR_LOW_EVENT.to_string()),
                        low_custom_event_id: None,
                        high_custom_event_id: None,
                    },
                }],
            },
        })
        .collect();

    MonitorsRequest {
        monitors,
        reason_for_change: MONITOR_REASON.to_string(),
    }
}

pub fn demo_report_definitions(target: &TargetContext) -> ReportDefinitionsRequest {
    ReportDefinitionsRequest {
        reason_for_change: FIXTURE_REASON.to_string(),
        report_definitions: vec![ReportDefinition {
            name: HOUSEKEEPING_REPORT.to_string(),
            description: "TEST DATA ".to_string(),
            program: target.program.clone(),
            sid: HOUSEKEEPING_SID,
            num_repetitions: 1,
            default_enabled: false,
            is_protected: false,
            is_housekeeping: true,
            condition_param_name: HOUSEKEEPING_CONDITION.to_string(),
            parameter_names: HOUSEKEEPING_PARAMETERS
                .iter()
                .map(|name| name.to_string())
                .collect(),
            flight_models: Vec::new(),
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn target() -> TargetContext {
        TargetContext::new("http://localhost:5000", "HummingSat", "SWISSto12", "HS01", "ids.zip")
    }

    #[test]
    fn program_request_carries_name_and_customer() {
        let value = serde_json::to_value(program_request(&target())).unwrap();
        assert_eq!(
            value,
            json!({
                "reasonForChange": "load test data",
                "programs": [{"name": "HummingSat", "customer": "SWISSto12"}]
            })
        );
    }

    #[test]
    fn flight_model_request_links_spacecraft_to_program() {
        let value = serde_json::to_value(flight_model_request(&target())).unwrap();
        assert_eq!(
            value,
            json!({
                "reasonForChange": "load test data",
                "flightModels": [{"program": "HummingSat", "name": "HS01"}]
            })
        );
    }

    #[test]
    fn curves_cover_each_kind_once() {
        let request = demo_curves();
        let kinds: Vec<_> = request.curves.iter().map(|c| c.calibration.kind()).collect();
        assert_eq!(kinds, vec!["polyCurve", "numCurve", "logCurve", "textCurve"]);

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["curves"][0]["polyCurve"]["coeff2"], "3");
        assert_eq!(value["curves"][2]["logCurve"]["coeff0"], "5");
        assert_eq!(value["curves"][3]["textCurve"][2]["high"], 1_000_000);
        assert!(value["curves"][3].get("radix").is_none());
    }

    #[test]
    fn monitors_differ_only_by_name() {
        let request = demo_monitors(&target());
        assert_eq!(request.monitors.len(), 4);

        let names: Vec<_> = request.monitors.iter().map(|m| m.monitor_name.as_str()).collect();
        assert_eq!(names, MONITOR_NAMES);

        let first = &request.monitors[0];
        for monitor in &request.monitors[1..] {
            let mut renamed = monitor.clone();
            renamed.monitor_name = first.monitor_name.clone();
            assert_eq!(&renamed, first);
        }
        assert_eq!(first.parameter.checks[0].limit.flight_model, "HS01");
    }

    #[test]
    fn report_definition_lists_thirteen_parameters() {
        let request = demo_report_definitions(&target());
        let report = &request.report_definitions[0];
        assert_eq!(report.parameter_names.len(), 13);
        assert!(report.is_housekeeping);
        assert_eq!(report.sid, 99999);
        assert!(report.parameter_names.contains(&report.condition_param_name));
    }
}
