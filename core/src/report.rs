//! Cross-ledger usage reporting for the admin dashboard.

use crate::{
    ledger::tally,
    types::{RecordId, Timestamp},
    usage::{
        feature_usage, success_rate, CalculationLedger, ExportLedger, ExportTemplate,
        FeatureUsage, ScenarioPopularity, DEFAULT_POPULAR_SCENARIOS,
    },
};
use serde::{Deserialize, Serialize};

/// How many of each ledger's newest records feed the activity feed.
pub const RECENT_PER_LEDGER: usize = 5;
pub const DEFAULT_RECENT_ACTIVITY: usize = 10;

const ANONYMOUS_USER: &str = "anonymous";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Calculation,
    Export,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityStatus {
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub kind:      ActivityKind,
    pub id:        RecordId,
    pub user:      String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario:  Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template:  Option<ExportTemplate>,
    pub timestamp: Timestamp,
    pub status:    ActivityStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateShare {
    pub template:   ExportTemplate,
    pub count:      usize,
    /// Rounded whole percent of all exports.
    pub percentage: u32,
}

/// Every template in use with its share of exports, most used first.
pub fn template_breakdown(exports: &ExportLedger<'_>) -> Vec<TemplateShare> {
    let records = exports.list();
    let total = records.len();
    tally(&records, |r| r.template)
        .into_iter()
        .map(|t| TemplateShare {
            template:   t.key,
            count:      t.count,
            percentage: percent_of(t.count, total),
        })
        .collect()
}

/// Newest activity across both ledgers.
pub fn recent_activity(
    calculations: &CalculationLedger<'_>,
    exports:      &ExportLedger<'_>,
    limit:        usize,
) -> Vec<ActivityEntry> {
    let calc_entries = calculations
        .list()
        .into_iter()
        .take(RECENT_PER_LEDGER)
        .map(|c| ActivityEntry {
            kind:      ActivityKind::Calculation,
            user:      display_user(c.user_id.as_deref(), c.user_email.as_deref()),
            id:        c.id,
            scenario:  Some(c.scenario_name),
            template:  None,
            timestamp: c.calculation_date,
            status:    ActivityStatus::Completed,
        });

    let export_entries = exports
        .list()
        .into_iter()
        .take(RECENT_PER_LEDGER)
        .map(|e| ActivityEntry {
            kind:      ActivityKind::Export,
            user:      display_user(e.user_id.as_deref(), e.user_email.as_deref()),
            id:        e.id,
            scenario:  e.scenario_name,
            template:  Some(e.template),
            timestamp: e.export_date,
            status:    if e.export_success {
                ActivityStatus::Completed
            } else {
                ActivityStatus::Failed
            },
        });

    let mut activity: Vec<ActivityEntry> = calc_entries.chain(export_entries).collect();
    activity.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    activity.truncate(limit);
    activity
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageSummary {
    pub total_calculations:  usize,
    pub total_exports:       usize,
    pub average_roi:         f64,
    pub export_success_rate: f64,
    pub popular_scenarios:   Vec<ScenarioPopularity>,
    pub template_breakdown:  Vec<TemplateShare>,
    pub feature_usage:       FeatureUsage,
    pub recent_activity:     Vec<ActivityEntry>,
}

impl UsageSummary {
    pub fn collect(calculations: &CalculationLedger<'_>, exports: &ExportLedger<'_>) -> Self {
        let export_records = exports.list();
        Self {
            total_calculations:  calculations.total_calculations(),
            total_exports:       export_records.len(),
            average_roi:         calculations.average_roi(),
            export_success_rate: success_rate(&export_records),
            popular_scenarios:   calculations.popular_scenarios(DEFAULT_POPULAR_SCENARIOS),
            template_breakdown:  template_breakdown(exports),
            feature_usage:       feature_usage(&export_records),
            recent_activity:     recent_activity(calculations, exports, DEFAULT_RECENT_ACTIVITY),
        }
    }
}

fn display_user(user_id: Option<&str>, user_email: Option<&str>) -> String {
    user_id
        .or(user_email)
        .unwrap_or(ANONYMOUS_USER)
        .to_string()
}

fn percent_of(count: usize, total: usize) -> u32 {
    if total == 0 {
        0
    } else {
        (count as f64 * 100.0 / total as f64).round() as u32
    }
}
