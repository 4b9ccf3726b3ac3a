//! Scan inspection: the pipeline from raw payload to scored package record,
//! plus the collaborator contracts it depends on and its HTTP surface.

pub mod collaborators;
pub mod record;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use collaborators::{CarrierLookup, CarrierLookupError, RuleStore, RuleStoreError};
pub use record::{PackageRecord, PackageStatus, RiskDisplay};
pub use router::inspection_router;
pub use service::{InspectionError, InspectionService};
