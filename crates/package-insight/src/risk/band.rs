use serde::{Deserialize, Serialize};

/// Traffic-light bucket shown to the operator after a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskBand {
    Green,
    Amber,
    Red,
}

impl RiskBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=25 => RiskBand::Green,
            26..=75 => RiskBand::Amber,
            _ => RiskBand::Red,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            RiskBand::Green => "green",
            RiskBand::Amber => "orange",
            RiskBand::Red => "red",
        }
    }
}
