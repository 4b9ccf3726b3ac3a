use metrics_exporter_prometheus::PrometheusHandle;
use package_insight::inspection::{
    CarrierLookup, CarrierLookupError, RuleStore, RuleStoreError,
};
use package_insight::risk::import::RuleImportError;
use package_insight::risk::RuleSnapshot;
use package_insight::shipment::PackageAttributes;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Rule tables loaded once at startup, optionally from a snapshot file.
#[derive(Default)]
pub(crate) struct SnapshotRuleStore {
    snapshot: RuleSnapshot,
}

impl SnapshotRuleStore {
    pub(crate) fn new(snapshot: RuleSnapshot) -> Self {
        Self { snapshot }
    }

    pub(crate) fn from_path(path: Option<&Path>) -> Result<Self, RuleImportError> {
        match path {
            Some(path) => {
                let snapshot = RuleSnapshot::from_json_path(path)?;
                info!(
                    path = %path.display(),
                    watchlist = snapshot.ani_watchlist.len(),
                    cii_ranges = snapshot.cii_ranges.len(),
                    osi_rules = snapshot.osi_rules.len(),
                    rsi_rules = snapshot.rsi_rules.len(),
                    "rule snapshot loaded"
                );
                Ok(Self::new(snapshot))
            }
            None => Ok(Self::default()),
        }
    }
}

impl RuleStore for SnapshotRuleStore {
    fn snapshot(&self) -> Result<RuleSnapshot, RuleStoreError> {
        Ok(self.snapshot.clone())
    }
}

/// Carrier stand-in answering from a fixed tracking-number map.
#[derive(Default)]
pub(crate) struct FixtureCarrierLookup {
    packages: HashMap<String, PackageAttributes>,
}

impl FixtureCarrierLookup {
    pub(crate) fn new(packages: HashMap<String, PackageAttributes>) -> Self {
        Self { packages }
    }

    /// Reads a JSON object keyed by tracking number.
    pub(crate) fn from_path(path: Option<&Path>) -> Result<Self, std::io::Error> {
        match path {
            Some(path) => {
                let packages: HashMap<String, PackageAttributes> = read_json_file(path)?;
                info!(path = %path.display(), packages = packages.len(), "carrier fixtures loaded");
                Ok(Self::new(packages))
            }
            None => Ok(Self::default()),
        }
    }
}

impl CarrierLookup for FixtureCarrierLookup {
    fn lookup(
        &self,
        tracking_number: &str,
    ) -> Result<Option<PackageAttributes>, CarrierLookupError> {
        Ok(self.packages.get(tracking_number).cloned())
    }
}

pub(crate) fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, std::io::Error> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
