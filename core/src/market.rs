//! Market opportunity assessment.
//!
//! Pure and table-driven, like the ROI engine. Unknown industry and
//! region keys fall back to the neutral factor instead of failing.

use crate::{
    error::{require_finite, CoreResult},
    factors::{
        industry_factor, region_factor, CompetitionLevel, OpportunityLevel, MARKET_TRENDS,
        TREND_COUNT,
    },
};
use serde::{Deserialize, Serialize};

/// Market size that maps to a score of 1.0 before factors.
pub const MARKET_SIZE_UNIT: f64 = 1_000_000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketQuery {
    pub industry:    String,
    pub region:      String,
    pub market_size: f64,
    #[serde(alias = "competitionLevel")]
    pub competition: CompetitionLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketAssessment {
    pub market_score:          f64,
    pub opportunity_level:     OpportunityLevel,
    pub competitive_advantage: f64,
    pub market_trends:         Vec<String>,
}

pub fn assess_market(query: &MarketQuery) -> CoreResult<MarketAssessment> {
    let size = require_finite("market_size", query.market_size)?;

    let market_score = (size / MARKET_SIZE_UNIT)
        * industry_factor(&query.industry)
        * query.competition.profile().factor;

    // The trend list does not depend on the query yet.
    let market_trends = MARKET_TRENDS
        .iter()
        .take(TREND_COUNT)
        .map(|t| t.to_string())
        .collect();

    Ok(MarketAssessment {
        market_score,
        opportunity_level: OpportunityLevel::from_score(market_score),
        competitive_advantage: region_factor(&query.region),
        market_trends,
    })
}
