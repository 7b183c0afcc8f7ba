//! Blocking client for the remote ROI calculation API.
//!
//! RULE: No call on `CalculatorClient` returns an error or panics.
//! Failures come back as a response with `success: false`.

pub mod client;
pub mod error;
pub mod models;

pub use client::CalculatorClient;
pub use error::{SdkError, SdkResult};
pub use models::{Breakdown, CalculationData, CalculationRequest, CalculationResponse, HealthResponse};
