//! Package Insight: barcode field extraction and shipment risk scoring.

pub mod config;
pub mod error;
pub mod inspection;
pub mod risk;
pub mod scanning;
pub mod shipment;
pub mod telemetry;

pub use risk::score_risk;
pub use scanning::extract_fields;
