//! Fixed lookup tables for the ROI engine and market assessment.
//!
//! RULE: Every factor lives in a table here, never in a match arm.
//! Each enum indexes its own profile table by discriminant, so the
//! table order must follow the enum's declaration order.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Risk level ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskProfile {
    pub level:      RiskLevel,
    pub label:      &'static str,
    /// Scales the base ROI.
    pub multiplier: f64,
    /// Half-width of the confidence interval, as a fraction of the ROI.
    pub volatility: f64,
    /// Contribution to the composite risk score.
    pub weight:     f64,
}

pub const RISK_PROFILES: [RiskProfile; 3] = [
    RiskProfile { level: RiskLevel::Low,    label: "Low",    multiplier: 0.95, volatility: 0.08, weight: 0.2 },
    RiskProfile { level: RiskLevel::Medium, label: "Medium", multiplier: 0.85, volatility: 0.15, weight: 0.5 },
    RiskProfile { level: RiskLevel::High,   label: "High",   multiplier: 0.70, volatility: 0.25, weight: 0.8 },
];

impl RiskLevel {
    pub fn profile(self) -> &'static RiskProfile {
        &RISK_PROFILES[self as usize]
    }
}

// ── Market condition ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketCondition {
    Bull,
    Bear,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketProfile {
    pub condition:  MarketCondition,
    pub label:      &'static str,
    pub multiplier: f64,
    pub weight:     f64,
}

pub const MARKET_PROFILES: [MarketProfile; 3] = [
    MarketProfile { condition: MarketCondition::Bull,    label: "Bull",    multiplier: 1.15, weight: 0.3 },
    MarketProfile { condition: MarketCondition::Bear,    label: "Bear",    multiplier: 0.80, weight: 0.8 },
    MarketProfile { condition: MarketCondition::Neutral, label: "Neutral", multiplier: 1.00, weight: 0.5 },
];

impl MarketCondition {
    pub fn profile(self) -> &'static MarketProfile {
        &MARKET_PROFILES[self as usize]
    }
}

// ── Competition level ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompetitionLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompetitionProfile {
    pub level:  CompetitionLevel,
    pub label:  &'static str,
    pub factor: f64,
}

pub const COMPETITION_PROFILES: [CompetitionProfile; 3] = [
    CompetitionProfile { level: CompetitionLevel::Low,    label: "Low",    factor: 1.4 },
    CompetitionProfile { level: CompetitionLevel::Medium, label: "Medium", factor: 1.0 },
    CompetitionProfile { level: CompetitionLevel::High,   label: "High",   factor: 0.6 },
];

impl CompetitionLevel {
    pub fn profile(self) -> &'static CompetitionProfile {
        &COMPETITION_PROFILES[self as usize]
    }
}

// ── Opportunity level ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpportunityLevel {
    Low,
    Medium,
    High,
}

/// Strict lower bounds, checked in order. A score matching none is Low.
pub const OPPORTUNITY_THRESHOLDS: [(OpportunityLevel, f64); 2] = [
    (OpportunityLevel::High,   1.5),
    (OpportunityLevel::Medium, 0.8),
];

impl OpportunityLevel {
    pub fn from_score(score: f64) -> Self {
        OPPORTUNITY_THRESHOLDS
            .iter()
            .find(|(_, floor)| score > *floor)
            .map(|(level, _)| *level)
            .unwrap_or(OpportunityLevel::Low)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low    => "Low",
            Self::Medium => "Medium",
            Self::High   => "High",
        }
    }
}

// ── Keyed factor tables ────────────────────────────────────────────

/// Factor applied when an industry or region key is not in its table.
pub const NEUTRAL_FACTOR: f64 = 1.0;

pub const INDUSTRY_FACTORS: [(&str, f64); 5] = [
    ("Technology",    1.3),
    ("Healthcare",    1.2),
    ("Finance",       1.1),
    ("Retail",        0.9),
    ("Manufacturing", 0.8),
];

pub const REGION_FACTORS: [(&str, f64); 4] = [
    ("US",     1.2),
    ("EU",     1.1),
    ("Asia",   1.3),
    ("Global", 1.0),
];

/// Ordered trend catalog. Assessments report the first `TREND_COUNT`.
pub const MARKET_TRENDS: [&str; 5] = [
    "Digital transformation accelerating",
    "AI/ML adoption increasing",
    "Sustainability focus growing",
    "Remote work becoming standard",
    "E-commerce continuing growth",
];

pub const TREND_COUNT: usize = 3;

/// Exact-key lookup with the permissive neutral default.
pub fn keyed_factor(table: &[(&str, f64)], key: &str) -> f64 {
    table
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, factor)| *factor)
        .unwrap_or(NEUTRAL_FACTOR)
}

pub fn industry_factor(industry: &str) -> f64 {
    keyed_factor(&INDUSTRY_FACTORS, industry)
}

pub fn region_factor(region: &str) -> f64 {
    keyed_factor(&REGION_FACTORS, region)
}

// ── String boundary ────────────────────────────────────────────────

impl FromStr for RiskLevel {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        RISK_PROFILES
            .iter()
            .find(|p| p.label.eq_ignore_ascii_case(s.trim()))
            .map(|p| p.level)
            .ok_or_else(|| CoreError::invalid("risk_level", format!("unknown risk level '{s}'")))
    }
}

impl FromStr for MarketCondition {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        MARKET_PROFILES
            .iter()
            .find(|p| p.label.eq_ignore_ascii_case(s.trim()))
            .map(|p| p.condition)
            .ok_or_else(|| {
                CoreError::invalid("market_condition", format!("unknown market condition '{s}'"))
            })
    }
}

impl FromStr for CompetitionLevel {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        COMPETITION_PROFILES
            .iter()
            .find(|p| p.label.eq_ignore_ascii_case(s.trim()))
            .map(|p| p.level)
            .ok_or_else(|| {
                CoreError::invalid("competition_level", format!("unknown competition level '{s}'"))
            })
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.profile().label)
    }
}

impl fmt::Display for MarketCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.profile().label)
    }
}

impl fmt::Display for CompetitionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.profile().label)
    }
}

impl fmt::Display for OpportunityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
