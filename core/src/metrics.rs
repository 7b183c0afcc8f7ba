//! Classic investment metrics: NPV, IRR, CAGR and payback period.
//!
//! Inputs are validated up front; results are returned unrounded.

use crate::error::{require_finite, CoreError, CoreResult};
use serde::{Deserialize, Serialize};

/// IRR search bracket. The lower bound stays above -1 so every
/// discount factor is defined.
pub const IRR_LOWER_BOUND: f64 = -0.99;
pub const IRR_UPPER_BOUND: f64 = 10.0;
pub const IRR_MAX_ITERATIONS: usize = 100;
pub const IRR_TOLERANCE: f64 = 1e-8;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payback {
    /// `None` when cumulative cash flow never reaches the investment.
    pub years:           Option<f64>,
    pub fully_recovered: bool,
}

/// `-initial + Σ cf_t / (1 + rate)^t`, with t starting at 1.
pub fn net_present_value(initial: f64, discount_rate: f64, cash_flows: &[f64]) -> CoreResult<f64> {
    let initial = require_finite("initial_investment", initial)?;
    let rate = require_finite("discount_rate", discount_rate)?;
    check_flows(cash_flows)?;

    if initial < 0.0 {
        return Err(CoreError::invalid("initial_investment", "must be >= 0"));
    }
    if rate <= -1.0 {
        return Err(CoreError::invalid("discount_rate", "must be > -1"));
    }
    Ok(discounted(initial, rate, cash_flows))
}

/// Bisection over `[IRR_LOWER_BOUND, IRR_UPPER_BOUND]`.
pub fn internal_rate_of_return(initial: f64, cash_flows: &[f64]) -> CoreResult<f64> {
    let initial = require_finite("initial_investment", initial)?;
    if initial <= 0.0 {
        return Err(CoreError::invalid("initial_investment", "must be > 0"));
    }
    check_non_empty(cash_flows)?;
    check_flows(cash_flows)?;

    let mut low = IRR_LOWER_BOUND;
    let mut high = IRR_UPPER_BOUND;
    let mut f_low = discounted(initial, low, cash_flows);
    let f_high = discounted(initial, high, cash_flows);

    if f_low.is_nan() || f_high.is_nan() {
        return Err(CoreError::invalid("cash_flows", "net present value is undefined"));
    }
    if f_low * f_high > 0.0 {
        return Err(CoreError::invalid(
            "cash_flows",
            "IRR cannot be determined (no sign change in NPV over search range)",
        ));
    }

    for _ in 0..IRR_MAX_ITERATIONS {
        let mid = (low + high) / 2.0;
        let f_mid = discounted(initial, mid, cash_flows);
        if f_mid.abs() < IRR_TOLERANCE {
            return Ok(mid);
        }
        if f_low * f_mid < 0.0 {
            high = mid;
        } else {
            low = mid;
            f_low = f_mid;
        }
    }
    Ok((low + high) / 2.0)
}

/// `(end / begin)^(1 / years) - 1`.
pub fn compound_annual_growth_rate(begin: f64, end: f64, years: f64) -> CoreResult<f64> {
    let begin = require_finite("beginning_value", begin)?;
    let end = require_finite("ending_value", end)?;
    let years = require_finite("years", years)?;

    if begin <= 0.0 || end <= 0.0 || years <= 0.0 {
        return Err(CoreError::invalid(
            "cagr",
            "beginning value, ending value and years must all be > 0",
        ));
    }
    Ok((end / begin).powf(1.0 / years) - 1.0)
}

/// First period in which cumulative cash flow covers the investment,
/// interpolated linearly inside that period.
pub fn payback_period(initial: f64, cash_flows: &[f64]) -> CoreResult<Payback> {
    let initial = require_finite("initial_investment", initial)?;
    if initial <= 0.0 {
        return Err(CoreError::invalid("initial_investment", "must be > 0"));
    }
    check_non_empty(cash_flows)?;
    check_flows(cash_flows)?;

    let mut cumulative = 0.0;
    for (period, flow) in cash_flows.iter().enumerate() {
        let before = cumulative;
        cumulative += flow;
        if cumulative >= initial {
            let fraction = if *flow > 0.0 { (initial - before) / flow } else { 0.0 };
            return Ok(Payback {
                years: Some(period as f64 + fraction),
                fully_recovered: true,
            });
        }
    }

    Ok(Payback { years: None, fully_recovered: false })
}

fn discounted(initial: f64, rate: f64, cash_flows: &[f64]) -> f64 {
    cash_flows
        .iter()
        .enumerate()
        .fold(-initial, |acc, (i, cf)| acc + cf / (1.0 + rate).powi(i as i32 + 1))
}

fn check_flows(cash_flows: &[f64]) -> CoreResult<()> {
    match cash_flows.iter().find(|cf| !cf.is_finite()) {
        Some(bad) => Err(CoreError::invalid(
            "cash_flows",
            format!("must be finite numbers, got {bad}"),
        )),
        None => Ok(()),
    }
}

fn check_non_empty(cash_flows: &[f64]) -> CoreResult<()> {
    if cash_flows.is_empty() {
        Err(CoreError::invalid("cash_flows", "must be a non-empty sequence"))
    } else {
        Ok(())
    }
}
