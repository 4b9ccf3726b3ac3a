use crate::risk::import::RuleImportError;
use crate::risk::RuleSnapshot;
use crate::shipment::PackageAttributes;

/// Carrier tracking service returning package facts for a tracking number.
pub trait CarrierLookup: Send + Sync {
    fn lookup(&self, tracking_number: &str) -> Result<Option<PackageAttributes>, CarrierLookupError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CarrierLookupError {
    #[error("carrier service unavailable: {0}")]
    Unavailable(String),
    #[error("carrier rejected tracking number {0}")]
    Rejected(String),
}

/// Source of the admin-managed rule tables.
pub trait RuleStore: Send + Sync {
    /// A copy of the current tables; callers score against it without re-reading.
    fn snapshot(&self) -> Result<RuleSnapshot, RuleStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RuleStoreError {
    #[error("rule store unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Import(#[from] RuleImportError),
}
