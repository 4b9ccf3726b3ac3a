use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::inspection::collaborators::{
    CarrierLookup, CarrierLookupError, RuleStore, RuleStoreError,
};
use crate::inspection::{inspection_router, InspectionService};
use crate::risk::{AccountEntry, CiiRange, PatternRule, RuleSnapshot, ScoringConfig};
use crate::shipment::{
    DimensionUnit, Origin, PackageAttributes, PackageDimensions, PackageWeight, WeightUnit,
};

/// Exactly 18 characters, so the account identifier that follows is read as such.
pub(super) const TRACKING: &str = "FX794612345678XXXX";
/// Exactly 20 characters for the same reason.
pub(super) const WATCHED_ACCOUNT: &str = "ACCT555000111XXXXXXX";

/// GS1 label carrying a tracking number, a watched account and a street.
pub(super) fn gs1_payload() -> String {
    format!("(00){TRACKING} (420){WATCHED_ACCOUNT} (411)PO BOX 1")
}

pub(super) fn scoring_config() -> ScoringConfig {
    ScoringConfig {
        ani_watchlist_points: 40,
        ..ScoringConfig::default()
    }
}

pub(super) fn package() -> PackageAttributes {
    PackageAttributes {
        dimensions: Some(PackageDimensions {
            length: 12.0,
            width: 10.0,
            height: 5.0,
            unit: DimensionUnit::In,
        }),
        weight: Some(PackageWeight {
            value: 4.2,
            unit: WeightUnit::Lb,
        }),
        origin: Origin {
            city: "Miami".to_string(),
            state: "FL".to_string(),
            country: "US".to_string(),
        },
        address_type: Some("residential".to_string()),
        shipping_type: Some("ground".to_string()),
    }
}

pub(super) fn rules() -> RuleSnapshot {
    RuleSnapshot {
        ani_watchlist: vec![AccountEntry::new(WATCHED_ACCOUNT)],
        vai_safe_list: Vec::new(),
        cii_ranges: vec![
            CiiRange::new(0.0, 499.0, 0),
            CiiRange::new(500.0, 1000.0, 15),
        ],
        osi_rules: vec![PatternRule::new("^Miami", 10, true)],
        rsi_rules: vec![
            PatternRule::new("POBOX", 20, true),
            PatternRule::new("(broken", 50, true),
        ],
    }
}

#[derive(Default)]
pub(super) struct MemoryCarrier {
    packages: HashMap<String, PackageAttributes>,
    pub(super) lookups: Mutex<Vec<String>>,
}

impl MemoryCarrier {
    pub(super) fn with_package(tracking_number: &str, attributes: PackageAttributes) -> Self {
        let mut packages = HashMap::new();
        packages.insert(tracking_number.to_string(), attributes);
        Self {
            packages,
            lookups: Mutex::new(Vec::new()),
        }
    }
}

impl CarrierLookup for MemoryCarrier {
    fn lookup(&self, tracking_number: &str) -> Result<Option<PackageAttributes>, CarrierLookupError> {
        self.lookups
            .lock()
            .expect("lookup mutex poisoned")
            .push(tracking_number.to_string());
        Ok(self.packages.get(tracking_number).cloned())
    }
}

pub(super) struct OfflineCarrier;

impl CarrierLookup for OfflineCarrier {
    fn lookup(&self, _tracking_number: &str) -> Result<Option<PackageAttributes>, CarrierLookupError> {
        Err(CarrierLookupError::Unavailable("timeout".to_string()))
    }
}

pub(super) struct MemoryRules(pub(super) RuleSnapshot);

impl RuleStore for MemoryRules {
    fn snapshot(&self) -> Result<RuleSnapshot, RuleStoreError> {
        Ok(self.0.clone())
    }
}

pub(super) struct OfflineRules;

impl RuleStore for OfflineRules {
    fn snapshot(&self) -> Result<RuleSnapshot, RuleStoreError> {
        Err(RuleStoreError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn build_service() -> InspectionService<MemoryCarrier, MemoryRules> {
    InspectionService::new(
        Arc::new(MemoryCarrier::with_package(TRACKING, package())),
        Arc::new(MemoryRules(rules())),
        scoring_config(),
    )
}

pub(super) fn router_with_service<C, S>(service: InspectionService<C, S>) -> axum::Router
where
    C: CarrierLookup + 'static,
    S: RuleStore + 'static,
{
    inspection_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
