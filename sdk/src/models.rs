//! Wire types of the remote calculation API (camelCase JSON).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationRequest {
    pub initial_investment: f64,
    pub additional_costs:   f64,
    pub country_code:       String,
}

impl CalculationRequest {
    pub fn new(initial_investment: f64, additional_costs: f64, country_code: &str) -> Self {
        Self {
            initial_investment,
            additional_costs,
            country_code: country_code.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakdown {
    pub initial_investment: f64,
    pub additional_costs:   f64,
    pub returns:            f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationData {
    pub total_value: f64,
    pub roi:         f64,
    pub breakdown:   Breakdown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResponse {
    pub success: bool,
    /// Zeroed when the server omits it, as it does on failures.
    #[serde(default)]
    pub data:    CalculationData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error:   Option<String>,
}

impl CalculationResponse {
    /// The normalized failure shape: every figure zeroed.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data:    CalculationData::default(),
            error:   Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub success: bool,
    #[serde(default)]
    pub data:    serde_json::Value,
}

impl HealthResponse {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data:    serde_json::json!({ "error": message.into() }),
        }
    }
}
