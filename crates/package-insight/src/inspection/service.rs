use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use super::collaborators::{CarrierLookup, RuleStore, RuleStoreError};
use super::record::{PackageRecord, PackageStatus};
use crate::risk::{RiskScoreResult, RiskScoringEngine, RuleSnapshot, ScoringConfig};
use crate::scanning::{BarcodeFieldExtractor, ExtractedFields, Extraction, RawScan};
use crate::shipment::PackageAttributes;

/// Service composing extraction, the carrier lookup, the rule store and scoring.
pub struct InspectionService<C, S> {
    extractor: BarcodeFieldExtractor,
    carrier: Arc<C>,
    rules: Arc<S>,
    engine: Arc<RiskScoringEngine>,
}

impl<C, S> InspectionService<C, S>
where
    C: CarrierLookup + 'static,
    S: RuleStore + 'static,
{
    pub fn new(carrier: Arc<C>, rules: Arc<S>, config: ScoringConfig) -> Self {
        Self {
            extractor: BarcodeFieldExtractor::new(),
            carrier,
            rules,
            engine: Arc::new(RiskScoringEngine::new(config)),
        }
    }

    pub fn extract(&self, payload: &str) -> Extraction {
        self.extractor.extract(payload)
    }

    /// Score caller-supplied inputs with this service's configuration.
    pub fn score(
        &self,
        fields: &ExtractedFields,
        package: Option<&PackageAttributes>,
        rules: &RuleSnapshot,
    ) -> RiskScoreResult {
        self.engine.score(fields, package, rules)
    }

    pub fn rule_snapshot(&self) -> Result<RuleSnapshot, InspectionError> {
        Ok(self.rules.snapshot()?)
    }

    /// Run one scan through the whole pipeline.
    ///
    /// A failing carrier lookup only downgrades the record to `pending`; a failing
    /// rule store aborts, since there is nothing to score against.
    pub fn inspect(&self, scan: &RawScan) -> Result<PackageRecord, InspectionError> {
        let Extraction { fields, source } = self.extractor.extract(&scan.payload);

        let package = fields
            .tracking_number
            .as_deref()
            .and_then(|tracking_number| self.lookup_package(tracking_number));

        let snapshot = self.rules.snapshot()?;
        let risk = self.engine.score(&fields, package.as_ref(), &snapshot);

        let status = if fields.is_miss() {
            PackageStatus::Error
        } else if package.is_none() {
            PackageStatus::Pending
        } else {
            PackageStatus::Success
        };

        let vai = fields.ani.as_ref().map(|ani| {
            snapshot
                .vai_safe_list
                .iter()
                .any(|entry| &entry.account_number == ani)
        });

        info!(
            source = source.label(),
            status = status.label(),
            score = risk.score,
            "package inspected"
        );

        let now = Utc::now();
        let osi = package
            .as_ref()
            .map(|attributes| attributes.origin.descriptor())
            .filter(|descriptor| !descriptor.is_empty());
        let cii = package.as_ref().and_then(PackageAttributes::cubic_index);
        let (pdi, pwi) = match package {
            Some(attributes) => (attributes.dimensions, attributes.weight),
            None => (None, None),
        };

        Ok(PackageRecord {
            id: Uuid::new_v4(),
            tracking_number: fields.tracking_number,
            ani: fields.ani,
            vai,
            adi: fields.adi,
            rsi: fields.rsi,
            osi,
            pdi,
            pwi,
            cii,
            triggered_indices: risk.triggered_indices,
            total_score: risk.score,
            raw_barcode: scan.payload.clone(),
            status,
            device: scan.device.clone(),
            rule_faults: risk.faults,
            created_at: now,
            updated_at: now,
        })
    }

    fn lookup_package(&self, tracking_number: &str) -> Option<PackageAttributes> {
        match self.carrier.lookup(tracking_number) {
            Ok(found) => found,
            Err(err) => {
                warn!(error = %err, "carrier lookup failed; scoring without package data");
                None
            }
        }
    }
}

/// Error raised by the inspection service.
#[derive(Debug, thiserror::Error)]
pub enum InspectionError {
    #[error(transparent)]
    RuleStore(#[from] RuleStoreError),
}
