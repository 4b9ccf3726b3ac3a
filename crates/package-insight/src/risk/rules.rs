use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use uuid::Uuid;

/// Account number row shared by the ANI watchlist and the VAI safe list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountEntry {
    #[serde(default, deserialize_with = "lenient_uuid")]
    pub id: Option<Uuid>,
    pub account_number: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "lenient_uuid")]
    pub created_by: Option<Uuid>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl AccountEntry {
    pub fn new(account_number: impl Into<String>) -> Self {
        Self {
            id: None,
            account_number: account_number.into(),
            notes: None,
            created_by: None,
            created_at: None,
        }
    }

    pub fn provenance(&self) -> RuleProvenance {
        RuleProvenance {
            created_by: self.created_by,
            created_at: self.created_at,
        }
    }
}

/// Inclusive `[min_value, max_value]` band over the cubic index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CiiRange {
    #[serde(default, deserialize_with = "lenient_uuid")]
    pub id: Option<Uuid>,
    #[serde(alias = "min")]
    pub min_value: f64,
    #[serde(alias = "max")]
    pub max_value: f64,
    pub points: i32,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "lenient_uuid")]
    pub created_by: Option<Uuid>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl CiiRange {
    pub fn new(min_value: f64, max_value: f64, points: i32) -> Self {
        Self {
            id: None,
            min_value,
            max_value,
            points,
            notes: None,
            created_by: None,
            created_at: None,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min_value <= value && value <= self.max_value
    }

    pub fn provenance(&self) -> RuleProvenance {
        RuleProvenance {
            created_by: self.created_by,
            created_at: self.created_at,
        }
    }
}

/// Regex rule used by both OSI (origin) and RSI (street) scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternRule {
    #[serde(default, deserialize_with = "lenient_uuid")]
    pub id: Option<Uuid>,
    pub pattern: String,
    pub points: i32,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "lenient_uuid")]
    pub created_by: Option<Uuid>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl PatternRule {
    pub fn new(pattern: impl Into<String>, points: i32, active: bool) -> Self {
        Self {
            id: None,
            pattern: pattern.into(),
            points,
            active,
            notes: None,
            created_by: None,
            created_at: None,
        }
    }

    pub fn provenance(&self) -> RuleProvenance {
        RuleProvenance {
            created_by: self.created_by,
            created_at: self.created_at,
        }
    }
}

/// Who created a rule row and when. Scoring never reads it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RuleProvenance {
    pub created_by: Option<Uuid>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Immutable copy of every admin-managed table, taken once per scoring pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSnapshot {
    #[serde(default)]
    pub ani_watchlist: Vec<AccountEntry>,
    #[serde(default, rename = "vai_safe_accounts", alias = "vai_safe_list")]
    pub vai_safe_list: Vec<AccountEntry>,
    #[serde(default)]
    pub cii_ranges: Vec<CiiRange>,
    #[serde(default)]
    pub osi_rules: Vec<PatternRule>,
    #[serde(default)]
    pub rsi_rules: Vec<PatternRule>,
}

impl RuleSnapshot {
    pub fn watchlisted_accounts(&self) -> HashSet<String> {
        account_numbers(&self.ani_watchlist)
    }

    pub fn safe_accounts(&self) -> HashSet<String> {
        account_numbers(&self.vai_safe_list)
    }

    pub fn is_empty(&self) -> bool {
        self.ani_watchlist.is_empty()
            && self.vai_safe_list.is_empty()
            && self.cii_ranges.is_empty()
            && self.osi_rules.is_empty()
            && self.rsi_rules.is_empty()
    }
}

fn account_numbers(entries: &[AccountEntry]) -> HashSet<String> {
    entries
        .iter()
        .map(|entry| entry.account_number.clone())
        .collect()
}

fn default_active() -> bool {
    true
}

fn lenient_uuid<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|value| Uuid::parse_str(value.trim()).ok()))
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    // Provenance of any other shape (numbers, objects) is dropped like a bad string.
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(Value::as_str).and_then(parse_timestamp))
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn database_rows_deserialize_with_provenance() {
        let json = r#"{
            "id": "7f0c1b56-6a3f-4a52-9f5e-0d9b6c1e2a10",
            "pattern": "^MIAMI",
            "points": 15,
            "active": false,
            "notes": null,
            "created_by": "2b1f0f4e-8d2a-4f7c-a1a9-3a5f9b0c7d11",
            "created_at": "2025-03-04T10:15:30.123456Z"
        }"#;

        let rule: PatternRule = serde_json::from_str(json).expect("row parses");

        assert_eq!(rule.pattern, "^MIAMI");
        assert_eq!(rule.points, 15);
        assert!(!rule.active);
        assert!(rule.id.is_some());
        let created_at = rule.provenance().created_at.expect("timestamp parsed");
        assert_eq!(
            created_at.date_naive(),
            Utc.with_ymd_and_hms(2025, 3, 4, 0, 0, 0)
                .unwrap()
                .date_naive()
        );
    }

    #[test]
    fn malformed_provenance_is_dropped_not_rejected() {
        let json = r#"{
            "account_number": "123456789",
            "created_by": "not-a-uuid",
            "created_at": "yesterday"
        }"#;

        let entry: AccountEntry = serde_json::from_str(json).expect("row parses");

        assert_eq!(entry.account_number, "123456789");
        assert_eq!(entry.provenance(), RuleProvenance::default());
    }

    #[test]
    fn non_string_provenance_does_not_reject_the_snapshot() {
        let json = r#"{
            "ani_watchlist": [
                { "account_number": "1", "id": 7, "created_by": 42, "created_at": 1700000000 }
            ],
            "cii_ranges": [
                { "min_value": 0, "max_value": 10, "points": 5, "created_by": { "name": "ops" } }
            ],
            "rsi_rules": [
                { "pattern": "^POBOX", "points": 20, "created_at": [2025, 1, 1] }
            ]
        }"#;

        let snapshot: RuleSnapshot = serde_json::from_str(json).expect("snapshot parses");

        assert_eq!(snapshot.ani_watchlist[0].account_number, "1");
        assert_eq!(snapshot.ani_watchlist[0].provenance(), RuleProvenance::default());
        assert!(snapshot.cii_ranges[0].created_by.is_none());
        assert!(snapshot.rsi_rules[0].created_at.is_none());
        assert_eq!(snapshot.rsi_rules[0].points, 20);
    }

    #[test]
    fn timestamps_without_fractional_seconds_parse() {
        let parsed = parse_timestamp("2025-03-04T10:15:30+02:00").expect("parses");
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 3, 4, 8, 15, 30).unwrap());
    }

    #[test]
    fn pattern_rules_default_to_active() {
        let rule: PatternRule =
            serde_json::from_str(r#"{"pattern": "PO BOX", "points": 5}"#).expect("parses");
        assert!(rule.active);
    }

    #[test]
    fn cii_ranges_accept_short_column_names() {
        let range: CiiRange =
            serde_json::from_str(r#"{"min": 0, "max": 99.5, "points": 10}"#).expect("parses");
        assert!(range.contains(0.0));
        assert!(range.contains(99.5));
        assert!(!range.contains(99.6));
    }

    #[test]
    fn snapshot_accepts_partial_documents() {
        let snapshot: RuleSnapshot = serde_json::from_str(
            r#"{"ani_watchlist": [{"account_number": "555000111"}], "vai_safe_accounts": []}"#,
        )
        .expect("snapshot parses");

        assert_eq!(snapshot.watchlisted_accounts().len(), 1);
        assert!(snapshot.safe_accounts().is_empty());
        assert!(snapshot.cii_ranges.is_empty());
        assert!(!snapshot.is_empty());
    }
}
