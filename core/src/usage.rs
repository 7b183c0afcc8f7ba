//! The two usage record types and their ledger-specific aggregates.
//!
//! On-disk field names are camelCase to stay compatible with snapshots
//! written by the web client.

use crate::{
    config::StorageConfig,
    error::{CoreError, CoreResult},
    factors::{MarketCondition, RiskLevel},
    ledger::{mean, tally, Ledger, UsageRecord},
    types::{RecordId, StorageKey, Timestamp},
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

pub type CalculationLedger<'a> = Ledger<'a, CalculationUsage>;
pub type ExportLedger<'a> = Ledger<'a, ExportUsage>;

pub const DEFAULT_POPULAR_SCENARIOS: usize = 5;
pub const DEFAULT_POPULAR_TEMPLATES: usize = 3;

// ── Calculation usage ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationUsage {
    pub id:                 RecordId,
    pub scenario_id:        i64,
    pub scenario_name:      String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mini_scenario_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id:            Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email:         Option<String>,
    pub calculation_date:   Timestamp,
    pub initial_investment: f64,
    pub expected_return:    f64,
    pub roi_percentage:     f64,
    /// Free-form label as entered; see `risk()` for the typed value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_level:         Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_conditions:  Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationDraft {
    pub scenario_id:        i64,
    pub scenario_name:      String,
    #[serde(default)]
    pub mini_scenario_name: Option<String>,
    #[serde(default)]
    pub user_id:            Option<String>,
    #[serde(default)]
    pub user_email:         Option<String>,
    pub initial_investment: f64,
    pub expected_return:    f64,
    pub roi_percentage:     f64,
    #[serde(default)]
    pub risk_level:         Option<String>,
    #[serde(default)]
    pub market_conditions:  Option<String>,
}

impl CalculationUsage {
    /// The risk label, if it names a known level.
    pub fn risk(&self) -> Option<RiskLevel> {
        self.risk_level.as_deref().and_then(|l| l.parse().ok())
    }

    /// The market label, if it names a known condition.
    pub fn market(&self) -> Option<MarketCondition> {
        self.market_conditions.as_deref().and_then(|l| l.parse().ok())
    }
}

impl UsageRecord for CalculationUsage {
    type Draft = CalculationDraft;

    const STORAGE_KEY: StorageKey = "calculator_analytics";

    fn capacity(config: &StorageConfig) -> usize {
        config.calculation_capacity
    }

    fn from_draft(id: RecordId, recorded_at: Timestamp, d: CalculationDraft) -> Self {
        Self {
            id,
            scenario_id:        d.scenario_id,
            scenario_name:      d.scenario_name,
            mini_scenario_name: d.mini_scenario_name,
            user_id:            d.user_id,
            user_email:         d.user_email,
            calculation_date:   recorded_at,
            initial_investment: d.initial_investment,
            expected_return:    d.expected_return,
            roi_percentage:     d.roi_percentage,
            risk_level:         d.risk_level,
            market_conditions:  d.market_conditions,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn recorded_at(&self) -> Timestamp {
        self.calculation_date
    }

    fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioPopularity {
    pub scenario_id:   i64,
    pub scenario_name: String,
    pub count:         usize,
}

impl CalculationLedger<'_> {
    pub fn total_calculations(&self) -> usize {
        self.count()
    }

    /// Mean `roi_percentage` over all retained records; 0 when empty.
    pub fn average_roi(&self) -> f64 {
        self.average_of(|r| r.roi_percentage)
    }

    /// Most calculated scenarios. The name reported for a scenario is
    /// the one on its newest record.
    pub fn popular_scenarios(&self, limit: usize) -> Vec<ScenarioPopularity> {
        let records = self.list();
        tally(&records, |r| r.scenario_id)
            .into_iter()
            .take(limit)
            .map(|t| ScenarioPopularity {
                scenario_id:   t.key,
                scenario_name: t.first.scenario_name.clone(),
                count:         t.count,
            })
            .collect()
    }
}

// ── Export usage ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportTemplate {
    Standard,
    Executive,
    Detailed,
}

const TEMPLATE_LABELS: [(ExportTemplate, &str); 3] = [
    (ExportTemplate::Standard,  "standard"),
    (ExportTemplate::Executive, "executive"),
    (ExportTemplate::Detailed,  "detailed"),
];

impl ExportTemplate {
    pub fn label(self) -> &'static str {
        TEMPLATE_LABELS[self as usize].1
    }
}

impl FromStr for ExportTemplate {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        TEMPLATE_LABELS
            .iter()
            .find(|(_, label)| label.eq_ignore_ascii_case(s.trim()))
            .map(|(t, _)| *t)
            .ok_or_else(|| CoreError::invalid("template", format!("unknown export template '{s}'")))
    }
}

impl fmt::Display for ExportTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportUsage {
    pub id:                       RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id:                  Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email:               Option<String>,
    pub export_date:              Timestamp,
    pub template:                 ExportTemplate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario_name:            Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mini_scenario_name:       Option<String>,
    pub include_charts:           bool,
    pub include_market_analysis:  bool,
    pub include_recommendations:  bool,
    /// Size of the generated document in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size:                Option<u64>,
    pub export_success:           bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message:            Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDraft {
    #[serde(default)]
    pub user_id:                 Option<String>,
    #[serde(default)]
    pub user_email:              Option<String>,
    pub template:                ExportTemplate,
    #[serde(default)]
    pub scenario_name:           Option<String>,
    #[serde(default)]
    pub mini_scenario_name:      Option<String>,
    #[serde(default)]
    pub include_charts:          bool,
    #[serde(default)]
    pub include_market_analysis: bool,
    #[serde(default)]
    pub include_recommendations: bool,
    #[serde(default)]
    pub file_size:               Option<u64>,
    pub export_success:          bool,
    #[serde(default)]
    pub error_message:           Option<String>,
}

impl ExportDraft {
    pub fn new(template: ExportTemplate, export_success: bool) -> Self {
        Self {
            user_id: None,
            user_email: None,
            template,
            scenario_name: None,
            mini_scenario_name: None,
            include_charts: false,
            include_market_analysis: false,
            include_recommendations: false,
            file_size: None,
            export_success,
            error_message: None,
        }
    }
}

impl UsageRecord for ExportUsage {
    type Draft = ExportDraft;

    const STORAGE_KEY: StorageKey = "pdf_export_analytics";

    fn capacity(config: &StorageConfig) -> usize {
        config.export_capacity
    }

    fn from_draft(id: RecordId, recorded_at: Timestamp, d: ExportDraft) -> Self {
        Self {
            id,
            user_id:                 d.user_id,
            user_email:              d.user_email,
            export_date:             recorded_at,
            template:                d.template,
            scenario_name:           d.scenario_name,
            mini_scenario_name:      d.mini_scenario_name,
            include_charts:          d.include_charts,
            include_market_analysis: d.include_market_analysis,
            include_recommendations: d.include_recommendations,
            file_size:               d.file_size,
            export_success:          d.export_success,
            error_message:           d.error_message,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn recorded_at(&self) -> Timestamp {
        self.export_date
    }

    fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplatePopularity {
    pub template: ExportTemplate,
    pub count:    usize,
}

/// How many exports included each optional section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureUsage {
    pub charts:          usize,
    pub market_analysis: usize,
    pub recommendations: usize,
}

impl ExportLedger<'_> {
    pub fn total_exports(&self) -> usize {
        self.count()
    }

    pub fn successful_exports(&self) -> usize {
        self.list().iter().filter(|r| r.export_success).count()
    }

    /// Percentage in [0, 100]; 0 when there are no exports.
    pub fn success_rate(&self) -> f64 {
        success_rate(&self.list())
    }

    /// Mean over exports that reported a positive size; 0 when none did.
    pub fn average_file_size(&self) -> f64 {
        mean(
            self.list()
                .iter()
                .filter_map(|r| r.file_size)
                .filter(|size| *size > 0)
                .map(|size| size as f64),
        )
    }

    pub fn feature_usage(&self) -> FeatureUsage {
        feature_usage(&self.list())
    }

    pub fn popular_templates(&self, limit: usize) -> Vec<TemplatePopularity> {
        self.top_by(limit, |r| r.template)
            .into_iter()
            .map(|(template, count)| TemplatePopularity { template, count })
            .collect()
    }
}

pub(crate) fn success_rate(records: &[ExportUsage]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let ok = records.iter().filter(|r| r.export_success).count();
    ok as f64 / records.len() as f64 * 100.0
}

pub(crate) fn feature_usage(records: &[ExportUsage]) -> FeatureUsage {
    records.iter().fold(FeatureUsage::default(), |mut acc, r| {
        acc.charts += r.include_charts as usize;
        acc.market_analysis += r.include_market_analysis as usize;
        acc.recommendations += r.include_recommendations as usize;
        acc
    })
}
