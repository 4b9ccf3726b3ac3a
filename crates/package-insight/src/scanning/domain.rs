use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Decoded text payload handed over by the scanner hardware for one scan event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawScan {
    pub payload: String,
    #[serde(default)]
    pub symbology: Option<String>,
    pub captured_at: DateTime<Utc>,
    #[serde(default)]
    pub device: Option<String>,
}

impl RawScan {
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            symbology: None,
            captured_at: Utc::now(),
            device: None,
        }
    }

    pub fn with_symbology(mut self, symbology: impl Into<String>) -> Self {
        self.symbology = Some(symbology.into());
        self
    }

    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = Some(device.into());
        self
    }
}

/// Shipment identifiers recovered from a label. Every field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    #[serde(default)]
    pub tracking_number: Option<String>,
    /// Account number (ANI).
    #[serde(default)]
    pub ani: Option<String>,
    /// Full address (ADI).
    #[serde(default)]
    pub adi: Option<String>,
    /// Street only (RSI).
    #[serde(default)]
    pub rsi: Option<String>,
}

impl ExtractedFields {
    /// True when nothing recognizable was found, i.e. the scan should be retried.
    pub fn is_miss(&self) -> bool {
        self.tracking_number.is_none()
            && self.ani.is_none()
            && self.adi.is_none()
            && self.rsi.is_none()
    }
}

/// Which strategy produced an extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionSource {
    #[serde(rename = "gs1_128")]
    Gs1_128,
    Pdf417,
    None,
}

impl ExtractionSource {
    pub fn label(&self) -> &'static str {
        match self {
            ExtractionSource::Gs1_128 => "GS1-128",
            ExtractionSource::Pdf417 => "PDF417",
            ExtractionSource::None => "none",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    pub fields: ExtractedFields,
    pub source: ExtractionSource,
}
