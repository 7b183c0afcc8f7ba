//! Market assessment: table lookups, thresholds and trends.

use roi_core::{
    assess_market,
    factors::{CompetitionLevel, OpportunityLevel, MARKET_TRENDS, TREND_COUNT},
    CoreError, MarketQuery,
};

fn query(industry: &str, region: &str, market_size: f64, competition: CompetitionLevel) -> MarketQuery {
    MarketQuery {
        industry: industry.into(),
        region: region.into(),
        market_size,
        competition,
    }
}

#[test]
fn known_industry_and_region_apply_their_factors() {
    let a = assess_market(&query("Technology", "Asia", 2_000_000.0, CompetitionLevel::Low)).unwrap();
    assert!((a.market_score - 2.0 * 1.3 * 1.4).abs() < 1e-12);
    assert_eq!(a.opportunity_level, OpportunityLevel::High);
    assert_eq!(a.competitive_advantage, 1.3);
}

/// Unrecognized keys fall back to 1.0 instead of failing.
#[test]
fn unknown_industry_and_region_are_neutral() {
    let a = assess_market(&query("Aerospace", "Antarctica", 1_000_000.0, CompetitionLevel::Medium))
        .unwrap();
    assert_eq!(a.market_score, 1.0);
    assert_eq!(a.competitive_advantage, 1.0);
    assert_eq!(a.opportunity_level, OpportunityLevel::Medium);
}

#[test]
fn small_crowded_market_is_low_opportunity() {
    let a = assess_market(&query("Retail", "EU", 500_000.0, CompetitionLevel::High)).unwrap();
    assert!(a.market_score < 0.8);
    assert_eq!(a.opportunity_level, OpportunityLevel::Low);
}

#[test]
fn trends_are_the_first_catalog_entries() {
    let a = assess_market(&query("Finance", "US", 1.0, CompetitionLevel::Medium)).unwrap();
    assert_eq!(a.market_trends.len(), TREND_COUNT);
    assert_eq!(a.market_trends, MARKET_TRENDS[..TREND_COUNT].to_vec());
}

#[test]
fn non_finite_market_size_is_rejected() {
    assert!(matches!(
        assess_market(&query("Finance", "US", f64::NAN, CompetitionLevel::Medium)),
        Err(CoreError::InvalidParameter { name: "market_size", .. })
    ));
}

/// The competition label arrives under either field name.
#[test]
fn query_accepts_competition_level_alias() {
    let q: MarketQuery = serde_json::from_str(
        r#"{"industry":"Healthcare","region":"Global","marketSize":1500000,"competitionLevel":"Low"}"#,
    )
    .unwrap();
    assert_eq!(q.competition, CompetitionLevel::Low);
}
