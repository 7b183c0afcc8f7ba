//! Per-ledger aggregates over calculation and export usage.

use chrono::{Duration, TimeZone, Utc};
use roi_core::{
    clock::ManualClock,
    factors::{MarketCondition, RiskLevel},
    store::UsageStore,
    usage::{
        CalculationDraft, CalculationLedger, ExportDraft, ExportLedger, ExportTemplate,
        FeatureUsage, DEFAULT_POPULAR_SCENARIOS, DEFAULT_POPULAR_TEMPLATES,
    },
};

fn clock() -> ManualClock {
    ManualClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap())
        .with_step(Duration::seconds(30))
}

fn calc(scenario_id: i64, name: &str, roi_percentage: f64) -> CalculationDraft {
    CalculationDraft {
        scenario_id,
        scenario_name: name.into(),
        initial_investment: 50_000.0,
        expected_return: 50_000.0 * (1.0 + roi_percentage / 100.0),
        roi_percentage,
        risk_level: Some(RiskLevel::Medium.to_string()),
        market_conditions: Some(MarketCondition::Neutral.to_string()),
        ..Default::default()
    }
}

#[test]
fn average_roi_of_empty_ledger_is_zero() {
    let store = UsageStore::open_migrated(":memory:").unwrap();
    let clock = clock();
    let ledger = CalculationLedger::new(&store, &clock, 100);
    assert_eq!(ledger.average_roi(), 0.0);
    assert_eq!(ledger.total_calculations(), 0);
    assert!(ledger.popular_scenarios(DEFAULT_POPULAR_SCENARIOS).is_empty());
}

#[test]
fn average_roi_is_the_plain_mean() {
    let store = UsageStore::open_migrated(":memory:").unwrap();
    let clock = clock();
    let ledger = CalculationLedger::new(&store, &clock, 100);
    for roi in [10.0, 20.0, 60.0] {
        ledger.record(calc(1, "Coffee shop", roi));
    }
    assert_eq!(ledger.average_roi(), 30.0);
}

/// Most frequent first; ties keep the order of the newest-first scan.
#[test]
fn popular_scenarios_count_and_break_ties() {
    let store = UsageStore::open_migrated(":memory:").unwrap();
    let clock = clock();
    let ledger = CalculationLedger::new(&store, &clock, 100);

    ledger.record(calc(1, "Coffee shop", 5.0));
    ledger.record(calc(2, "Food truck", 5.0));
    ledger.record(calc(3, "Bakery", 5.0));
    ledger.record(calc(2, "Food truck", 5.0));
    ledger.record(calc(1, "Coffee shop v2", 5.0));

    let popular = ledger.popular_scenarios(2);
    assert_eq!(popular.len(), 2);
    // Newest-first scan sees 1 before 2, so 1 wins the tie.
    assert_eq!((popular[0].scenario_id, popular[0].count), (1, 2));
    assert_eq!((popular[1].scenario_id, popular[1].count), (2, 2));
    assert_eq!(popular[0].scenario_name, "Coffee shop v2");

    let all = ledger.popular_scenarios(DEFAULT_POPULAR_SCENARIOS);
    assert_eq!(all.len(), 3);
    assert_eq!(all[2].scenario_id, 3);
}

fn export(template: ExportTemplate, success: bool, size: Option<u64>) -> ExportDraft {
    ExportDraft {
        file_size: size,
        include_charts: true,
        include_recommendations: template == ExportTemplate::Detailed,
        ..ExportDraft::new(template, success)
    }
}

#[test]
fn export_aggregates() {
    let store = UsageStore::open_migrated(":memory:").unwrap();
    let clock = clock();
    let ledger = ExportLedger::new(&store, &clock, 100);

    ledger.record(export(ExportTemplate::Standard, true, Some(1_000)));
    ledger.record(export(ExportTemplate::Detailed, true, Some(3_000)));
    ledger.record(export(ExportTemplate::Standard, false, None));
    ledger.record(ExportDraft {
        error_message: Some("render failed".into()),
        ..export(ExportTemplate::Executive, false, Some(0))
    });

    assert_eq!(ledger.total_exports(), 4);
    assert_eq!(ledger.successful_exports(), 2);
    assert_eq!(ledger.success_rate(), 50.0);
    // Only positive sizes count.
    assert_eq!(ledger.average_file_size(), 2_000.0);
    assert_eq!(
        ledger.feature_usage(),
        FeatureUsage { charts: 4, market_analysis: 0, recommendations: 1 }
    );

    let templates = ledger.popular_templates(DEFAULT_POPULAR_TEMPLATES);
    assert_eq!(templates[0].template, ExportTemplate::Standard);
    assert_eq!(templates[0].count, 2);
    assert_eq!(templates.len(), 3);
}

#[test]
fn empty_export_ledger_aggregates_are_zero() {
    let store = UsageStore::open_migrated(":memory:").unwrap();
    let clock = clock();
    let ledger = ExportLedger::new(&store, &clock, 100);

    assert_eq!(ledger.success_rate(), 0.0);
    assert_eq!(ledger.average_file_size(), 0.0);
    assert_eq!(ledger.feature_usage(), FeatureUsage::default());
    assert!(ledger.popular_templates(3).is_empty());
}

#[test]
fn template_labels_round_trip_through_strings() {
    for t in [ExportTemplate::Standard, ExportTemplate::Executive, ExportTemplate::Detailed] {
        assert_eq!(t.to_string().parse::<ExportTemplate>().unwrap(), t);
    }
    assert_eq!("EXECUTIVE".parse::<ExportTemplate>().unwrap(), ExportTemplate::Executive);
    assert!("glossy".parse::<ExportTemplate>().is_err());
}

/// Records are stored with the web client's camelCase field names.
#[test]
fn snapshot_uses_camel_case_fields() {
    use roi_core::store::SnapshotStore;

    let store = UsageStore::open_migrated(":memory:").unwrap();
    let clock = clock();
    CalculationLedger::new(&store, &clock, 10).record(calc(9, "Studio", 12.5));

    let payload = store.load_snapshot("calculator_analytics").unwrap().unwrap();
    let v: serde_json::Value = serde_json::from_str(&payload).unwrap();
    let first = &v[0];
    assert_eq!(first["scenarioId"], 9);
    assert_eq!(first["roiPercentage"], 12.5);
    assert_eq!(first["riskLevel"], "Medium");
    assert!(first.get("calculationDate").is_some());
    assert!(first.get("userId").is_none());
}
