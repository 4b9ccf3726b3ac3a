//! Risk scoring over extracted label fields, carrier data and the admin rule tables.

mod band;
mod config;
pub mod import;
mod matcher;
mod rules;

pub use band::RiskBand;
pub use config::{ScoringConfig, DEFAULT_ANI_WATCHLIST_POINTS, DEFAULT_PATTERN_SIZE_LIMIT};
pub use matcher::RuleFault;
pub use rules::{AccountEntry, CiiRange, PatternRule, RuleProvenance, RuleSnapshot};

use crate::scanning::ExtractedFields;
use crate::shipment::PackageAttributes;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Rule categories, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskIndex {
    Ani,
    Cii,
    Osi,
    Rsi,
}

impl RiskIndex {
    pub const ORDER: [RiskIndex; 4] = [RiskIndex::Ani, RiskIndex::Cii, RiskIndex::Osi, RiskIndex::Rsi];

    pub fn label(&self) -> &'static str {
        match self {
            RiskIndex::Ani => "ANI",
            RiskIndex::Cii => "CII",
            RiskIndex::Osi => "OSI",
            RiskIndex::Rsi => "RSI",
        }
    }
}

/// Borrowed view of the rule tables for one pass.
#[derive(Debug, Clone, Copy)]
pub struct RuleTables<'a> {
    pub ani_watchlist: &'a HashSet<String>,
    pub vai_safe_list: &'a HashSet<String>,
    pub cii_ranges: &'a [CiiRange],
    pub osi_rules: &'a [PatternRule],
    pub rsi_rules: &'a [PatternRule],
}

/// One rule that fired, kept for audits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub index: RiskIndex,
    pub points: i32,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskScoreResult {
    /// Sum of every component, clamped to `0..=100`.
    pub score: u8,
    pub triggered_indices: Vec<RiskIndex>,
    pub components: Vec<ScoreComponent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub faults: Vec<RuleFault>,
}

impl RiskScoreResult {
    pub fn band(&self) -> RiskBand {
        RiskBand::from_score(self.score)
    }

    pub fn message(&self) -> String {
        if self.score == 0 {
            "Safe".to_string()
        } else {
            format!("Risk Level: {}", self.score)
        }
    }

    pub fn triggered_labels(&self) -> Vec<&'static str> {
        self.triggered_indices.iter().map(RiskIndex::label).collect()
    }
}

/// Stateless scorer; the only state is its configuration.
#[derive(Debug, Clone, Default)]
pub struct RiskScoringEngine {
    config: ScoringConfig,
}

impl RiskScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn score(
        &self,
        fields: &ExtractedFields,
        package: Option<&PackageAttributes>,
        rules: &RuleSnapshot,
    ) -> RiskScoreResult {
        let watchlist = rules.watchlisted_accounts();
        let safe_list = rules.safe_accounts();
        self.score_tables(
            fields,
            package,
            RuleTables {
                ani_watchlist: &watchlist,
                vai_safe_list: &safe_list,
                cii_ranges: &rules.cii_ranges,
                osi_rules: &rules.osi_rules,
                rsi_rules: &rules.rsi_rules,
            },
        )
    }

    /// Evaluate ANI, CII, OSI and RSI independently and add up whatever fired.
    pub fn score_tables(
        &self,
        fields: &ExtractedFields,
        package: Option<&PackageAttributes>,
        tables: RuleTables<'_>,
    ) -> RiskScoreResult {
        let mut components = Vec::new();
        let mut faults = Vec::new();

        if let Some(ani) = fields.ani.as_deref() {
            if tables.vai_safe_list.contains(ani) {
                debug!("account on safe list; watchlist check skipped");
            } else if tables.ani_watchlist.contains(ani) {
                components.push(ScoreComponent {
                    index: RiskIndex::Ani,
                    points: self.config.ani_watchlist_points,
                    notes: format!("account {ani} is on the watchlist"),
                });
            }
        }

        if let Some(cubic_index) = package.and_then(PackageAttributes::cubic_index) {
            if let Some(range) = tables
                .cii_ranges
                .iter()
                .find(|range| range.contains(cubic_index))
            {
                components.push(ScoreComponent {
                    index: RiskIndex::Cii,
                    points: range.points,
                    notes: format!(
                        "cubic index {:.2} within [{}, {}]",
                        cubic_index, range.min_value, range.max_value
                    ),
                });
            }
        }

        let limit = self.config.pattern_size_limit;
        let osi = matcher::compile_active(RiskIndex::Osi, tables.osi_rules, limit, &mut faults);
        let rsi = matcher::compile_active(RiskIndex::Rsi, tables.rsi_rules, limit, &mut faults);

        if let Some(package) = package {
            let origin = package.origin.descriptor();
            for rule in osi.iter().filter(|rule| rule.is_match(&origin)) {
                components.push(ScoreComponent {
                    index: RiskIndex::Osi,
                    points: rule.rule.points,
                    notes: format!("origin '{origin}' matches /{}/", rule.rule.pattern),
                });
            }
        }

        if let Some(street) = fields.rsi.as_deref() {
            for rule in rsi.iter().filter(|rule| rule.is_match(street)) {
                components.push(ScoreComponent {
                    index: RiskIndex::Rsi,
                    points: rule.rule.points,
                    notes: format!("street '{street}' matches /{}/", rule.rule.pattern),
                });
            }
        }

        let triggered_indices = RiskIndex::ORDER
            .into_iter()
            .filter(|index| has_scoring_component(&components, *index))
            .collect();

        let total: i64 = components
            .iter()
            .map(|component| i64::from(component.points))
            .sum();
        let score = total.clamp(0, 100) as u8;

        RiskScoreResult {
            score,
            triggered_indices,
            components,
            faults,
        }
    }
}

/// A category counts as triggered once any of its rules fired with nonzero points,
/// even if other rules in the same category cancel it out.
fn has_scoring_component(components: &[ScoreComponent], index: RiskIndex) -> bool {
    components
        .iter()
        .any(|component| component.index == index && component.points != 0)
}

/// Score one scan against the supplied tables.
pub fn score_risk(
    fields: &ExtractedFields,
    package: Option<&PackageAttributes>,
    tables: RuleTables<'_>,
    config: &ScoringConfig,
) -> RiskScoreResult {
    RiskScoringEngine::new(config.clone()).score_tables(fields, package, tables)
}
