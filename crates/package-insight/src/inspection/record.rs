use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::risk::{RiskBand, RiskIndex, RiskScoreResult, RuleFault};
use crate::shipment::{PackageDimensions, PackageWeight};

/// Processing state of an inspected package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageStatus {
    /// Scored, but without carrier data.
    Pending,
    Success,
    /// Nothing usable came off the label; the operator should rescan.
    Error,
}

impl PackageStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PackageStatus::Pending => "pending",
            PackageStatus::Success => "success",
            PackageStatus::Error => "error",
        }
    }
}

/// Everything learned about one scanned package, ready to hand to storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageRecord {
    pub id: Uuid,
    pub tracking_number: Option<String>,
    pub ani: Option<String>,
    /// Whether the account is on the safe list; absent when no account was read.
    pub vai: Option<bool>,
    pub adi: Option<String>,
    pub rsi: Option<String>,
    pub osi: Option<String>,
    pub pdi: Option<PackageDimensions>,
    pub pwi: Option<PackageWeight>,
    pub cii: Option<f64>,
    pub triggered_indices: Vec<RiskIndex>,
    pub total_score: u8,
    pub raw_barcode: String,
    pub status: PackageStatus,
    #[serde(default)]
    pub device: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rule_faults: Vec<RuleFault>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PackageRecord {
    pub fn display(&self) -> RiskDisplay {
        let risk = RiskScoreResult {
            score: self.total_score,
            triggered_indices: self.triggered_indices.clone(),
            components: Vec::new(),
            faults: Vec::new(),
        };
        RiskDisplay {
            score: risk.score,
            triggered_indices: risk.triggered_labels(),
            band: risk.band(),
            color: risk.band().color(),
            message: risk.message(),
        }
    }
}

/// Operator-facing summary of a record's risk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskDisplay {
    pub score: u8,
    pub triggered_indices: Vec<&'static str>,
    pub band: RiskBand,
    pub color: &'static str,
    pub message: String,
}
