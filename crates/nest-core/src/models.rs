//! Request payloads accepted by the NEST service.
//!
//! Field names follow the service's camelCase JSON. Optional limit fields
//! serialize as explicit `null` because the service distinguishes an unset
//! threshold from an absent key.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A program entry for `POST /programs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub name: String,
    pub customer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramsRequest {
    pub reason_for_change: String,
    pub programs: Vec<Program>,
}

/// A flight-model entry for `POST /flight-models`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightModel {
    pub program: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightModelsRequest {
    pub reason_for_change: String,
    pub flight_models: Vec<FlightModel>,
}

/// Calibration curve mapping raw telemetry to engineering values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Curve {
    pub curve_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eng_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    /// Serialized under the curve-kind key (`polyCurve`, `numCurve`, ...).
    #[serde(flatten)]
    pub calibration: Calibration,
}

impl Curve {
    /// Curve with only a name and its calibration set.
    pub fn named(name: impl Into<String>, calibration: Calibration) -> Self {
        Self {
            curve_name: name.into(),
            radix: None,
            description: None,
            eng_type: None,
            raw_type: None,
            units: None,
            calibration,
        }
    }

    pub fn with_radix(mut self, radix: impl Into<String>) -> Self {
        self.radix = Some(radix.into());
        self
    }

    pub fn with_types(mut self, raw_type: impl Into<String>, eng_type: impl Into<String>) -> Self {
        self.raw_type = Some(raw_type.into());
        self.eng_type = Some(eng_type.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Calibration {
    #[serde(rename = "polyCurve")]
    Polynomial(Coefficients),
    #[serde(rename = "numCurve")]
    Numeric(NumericTable),
    #[serde(rename = "logCurve")]
    Logarithmic(Coefficients),
    #[serde(rename = "textCurve")]
    TextRange(Vec<TextBand>),
}

impl Calibration {
    /// Key the service uses to tell curve kinds apart.
    pub fn kind(&self) -> &'static str {
        match self {
            Calibration::Polynomial(_) => "polyCurve",
            Calibration::Numeric(_) => "numCurve",
            Calibration::Logarithmic(_) => "logCurve",
            Calibration::TextRange(_) => "textCurve",
        }
    }
}

/// Five coefficients, sent as decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coefficients {
    pub coeff0: String,
    pub coeff1: String,
    pub coeff2: String,
    pub coeff3: String,
    pub coeff4: String,
}

impl Coefficients {
    pub fn new(values: [i64; 5]) -> Self {
        let [c0, c1, c2, c3, c4] = values.map(|v| v.to_string());
        Self {
            coeff0: c0,
            coeff1: c1,
            coeff2: c2,
            coeff3: c3,
            coeff4: c4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericTable {
    pub xvals: Vec<i64>,
    pub yvals: Vec<i64>,
}

/// Inclusive raw range mapped to a text value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBand {
    pub low: i64,
    pub high: i64,
    pub text_value: String,
}

impl TextBand {
    pub fn new(low: i64, high: i64, text_value: impl Into<String>) -> Self {
        Self {
            low,
            high,
            text_value: text_value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurvesRequest {
    pub reason_for_change: String,
    pub curves: Vec<Curve>,
}

/// Parameter monitor evaluated against limit checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Monitor {
    pub monitor_name: String,
    pub description: String,
    pub program: String,
    pub is_enabled: bool,
    /// `U` for unsigned interpretation of the raw value.
    pub interpretation: String,
    pub num_fails: u32,
    #[serde(default)]
    pub validity_parameters: Vec<Value>,
    pub parameter: MonitoredParameter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoredParameter {
    pub parameter_name: String,
    pub absolute_name: String,
    pub apid: u32,
    pub monitoring_interval: u32,
    pub max_reporting_delay: u32,
    #[serde(rename = "isPMON")]
    pub is_pmon: bool,
    pub is_parameter_ground_mon: bool,
    pub checks: Vec<MonitorCheck>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorCheck {
    pub limit: LimitCheck,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitCheck {
    pub flight_model: String,
    #[serde(rename = "type")]
    pub value_type: String,
    pub limit_check_type: Option<String>,
    pub yellow_high: Option<i64>,
    pub yellow_low: Option<i64>,
    pub red_high: Option<i64>,
    pub red_low: Option<i64>,
    pub low_event_name: Option<String>,
    pub low_custom_event_id: Option<i64>,
    pub high_custom_event_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorsRequest {
    pub monitors: Vec<Monitor>,
    pub reason_for_change: String,
}

/// Schedulable grouping of telemetry parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDefinition {
    pub name: String,
    pub description: String,
    pub program: String,
    pub sid: u32,
    pub num_repetitions: u32,
    pub default_enabled: bool,
    pub is_protected: bool,
    pub is_housekeeping: bool,
    pub condition_param_name: String,
    pub parameter_names: Vec<String>,
    #[serde(default)]
    pub flight_models: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDefinitionsRequest {
    pub reason_for_change: String,
    pub report_definitions: Vec<ReportDefinition>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn curve_kind_is_flattened_into_the_curve() {
        let curve = Curve::named(
            "TEST_NUMERIC",
            Calibration::Numeric(NumericTable {
                xvals: vec![1, 2],
                yvals: vec![3, 4],
            }),
        )
        .with_radix("O");

        let value = serde_json::to_value(&curve).unwrap();
        assert_eq!(
            value,
            json!({
                "curveName": "TEST_NUMERIC",
                "radix": "O",
                "numCurve": {"xvals": [1, 2], "yvals": [3, 4]}
            })
        );
    }

    #[test]
    fn curve_round_trips_through_kind_key() {
        let raw = json!({
            "curveName": "TEST_TEXT",
            "textCurve": [{"low": 0, "high": 3, "textValue": "LOW"}]
        });
        let curve: Curve = serde_json::from_value(raw).unwrap();
        assert_eq!(curve.calibration.kind(), "textCurve");
        assert_eq!(
            curve.calibration,
            Calibration::TextRange(vec![TextBand::new(0, 3, "LOW")])
        );
    }

    #[test]
    fn unset_limits_serialize_as_null() {
        let limit = LimitCheck {
            flight_model: "HS01".to_string(),
            value_type: "int".to_string(),
            limit_check_type: None,
            yellow_high: None,
            yellow_low: None,
            red_high: None,
            red_low: Some(1),
            low_event_name: None,
            low_custom_event_id: None,
            high_custom_event_id: None,
        };

        let value = serde_json::to_value(&limit).unwrap();
        assert_eq!(value["type"], "int");
        assert_eq!(value["redLow"], 1);
        assert!(value["yellowHigh"].is_null());
        assert!(value.as_object().unwrap().contains_key("highCustomEventId"));
    }

    #[test]
    fn coefficients_are_strings() {
        let value = serde_json::to_value(Coefficients::new([1, 2, 3, 4, 5])).unwrap();
        assert_eq!(value["coeff0"], "1");
        assert_eq!(value["coeff4"], "5");
    }
}
