//! ROI engine: risk- and market-adjusted return on investment.
//!
//! RULE: Every function here is pure. No state, no I/O, no clock.
//! Identical input must always produce bit-identical output.

use crate::{
    error::{require_finite, CoreError, CoreResult},
    factors::{MarketCondition, RiskLevel},
};
use serde::{Deserialize, Serialize};

/// Exponential decay rate applied per year of the holding period.
pub const TIME_DECAY_RATE: f64 = 0.1;

/// Risk-score contribution per year of the holding period.
pub const TIME_RISK_PER_YEAR: f64 = 0.1;

/// Upper bound on the time contribution to the risk score.
pub const TIME_RISK_CAP: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoiInput {
    pub initial_investment: f64,
    pub expected_revenue:   f64,
    pub operating_costs:    f64,
    pub risk_level:         RiskLevel,
    pub market_condition:   MarketCondition,
    /// Holding period in years.
    pub time_period:        f64,
}

/// Untyped input as it arrives from a form or an IPC message.
/// Convert with `RoiInput::try_from`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoiRequest {
    pub initial_investment: f64,
    pub expected_revenue:   f64,
    pub operating_costs:    f64,
    pub risk_level:         String,
    #[serde(alias = "marketConditions")]
    pub market_condition:   String,
    pub time_period:        f64,
}

impl TryFrom<RoiRequest> for RoiInput {
    type Error = CoreError;

    fn try_from(req: RoiRequest) -> CoreResult<Self> {
        Ok(Self {
            initial_investment: req.initial_investment,
            expected_revenue:   req.expected_revenue,
            operating_costs:    req.operating_costs,
            risk_level:         req.risk_level.parse()?,
            market_condition:   req.market_condition.parse()?,
            time_period:        req.time_period,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub low:  f64,
    pub high: f64,
}

impl ConfidenceInterval {
    /// True when `low > high`. Happens for every negative risk-adjusted
    /// ROI: the bounds are a fixed fraction of the ROI itself, so the
    /// "low" side moves toward zero.
    pub fn is_inverted(&self) -> bool {
        self.low > self.high
    }

    pub fn width(&self) -> f64 {
        (self.high - self.low).abs()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoiAnalysis {
    /// Unadjusted ROI ratio.
    pub roi:                 f64,
    pub risk_adjusted_roi:   f64,
    pub confidence_interval: ConfidenceInterval,
    /// Composite score in [0, 1].
    pub risk_score:          f64,
    /// The market multiplier that was applied.
    pub market_adjustment:   f64,
}

pub fn compute_roi(input: &RoiInput) -> CoreResult<RoiAnalysis> {
    validate(input)?;

    let risk = input.risk_level.profile();
    let market = input.market_condition.profile();

    let base_roi = (input.expected_revenue - input.operating_costs - input.initial_investment)
        / input.initial_investment;
    let time_decay = (-TIME_DECAY_RATE * input.time_period).exp();
    let risk_adjusted_roi = base_roi * risk.multiplier * market.multiplier * time_decay;

    let spread = risk.volatility * risk_adjusted_roi;
    let confidence_interval = ConfidenceInterval {
        low:  risk_adjusted_roi - spread,
        high: risk_adjusted_roi + spread,
    };

    Ok(RoiAnalysis {
        roi: base_roi,
        risk_adjusted_roi,
        confidence_interval,
        risk_score: risk_score(input.risk_level, input.market_condition, input.time_period),
        market_adjustment: market.multiplier,
    })
}

/// Mean of the risk weight, the market weight and a capped time term.
pub fn risk_score(risk_level: RiskLevel, market_condition: MarketCondition, time_period: f64) -> f64 {
    let time_risk = (time_period * TIME_RISK_PER_YEAR).min(TIME_RISK_CAP);
    (risk_level.profile().weight + market_condition.profile().weight + time_risk) / 3.0
}

fn validate(input: &RoiInput) -> CoreResult<()> {
    let investment = require_finite("initial_investment", input.initial_investment)?;
    require_finite("expected_revenue", input.expected_revenue)?;
    require_finite("operating_costs", input.operating_costs)?;
    let years = require_finite("time_period", input.time_period)?;

    if investment <= 0.0 {
        return Err(CoreError::invalid(
            "initial_investment",
            format!("must be greater than zero, got {investment}"),
        ));
    }
    if years < 0.0 {
        return Err(CoreError::invalid(
            "time_period",
            format!("must not be negative, got {years}"),
        ));
    }
    Ok(())
}
