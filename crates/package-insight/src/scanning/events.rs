use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::domain::RawScan;
use crate::inspection::{CarrierLookup, InspectionService, PackageRecord, RuleStore};

/// Notification coming off a scanner connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScannerEvent {
    Connected { device: String },
    Disconnected { device: Option<String> },
    DataReceived(RawScan),
    Error { device: Option<String>, message: String },
    DeviceDiscovered { device: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
    Connecting,
    Error,
}

impl ConnectionStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            ConnectionStatus::Connected => "Connected",
            ConnectionStatus::Disconnected => "Disconnected",
            ConnectionStatus::Connecting => "Connecting...",
            ConnectionStatus::Error => "Error",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            ConnectionStatus::Connected => "green",
            ConnectionStatus::Disconnected => "gray",
            ConnectionStatus::Connecting => "orange",
            ConnectionStatus::Error => "red",
        }
    }
}

/// What a pump run did, returned once its event channel is exhausted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PumpSummary {
    pub scans_processed: usize,
    pub failures: usize,
    pub status: ConnectionStatus,
    pub discovered: Vec<String>,
}

/// Drives scanner events through an [`InspectionService`], forwarding each record.
pub struct ScanEventPump<C, S> {
    service: Arc<InspectionService<C, S>>,
    status: ConnectionStatus,
    device: Option<String>,
    summary: PumpSummary,
}

impl<C, S> ScanEventPump<C, S>
where
    C: CarrierLookup + 'static,
    S: RuleStore + 'static,
{
    pub fn new(service: Arc<InspectionService<C, S>>) -> Self {
        Self {
            service,
            status: ConnectionStatus::Disconnected,
            device: None,
            summary: PumpSummary {
                scans_processed: 0,
                failures: 0,
                status: ConnectionStatus::Disconnected,
                discovered: Vec::new(),
            },
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    /// Consume events until the sender side closes or nobody is listening for records.
    pub async fn run(
        mut self,
        mut events: mpsc::Receiver<ScannerEvent>,
        records: mpsc::Sender<PackageRecord>,
    ) -> PumpSummary {
        while let Some(event) = events.recv().await {
            let Some(record) = self.handle(event).await else {
                continue;
            };
            if records.send(record).await.is_err() {
                debug!("record receiver dropped; stopping scan pump");
                break;
            }
        }

        self.summary.status = self.status;
        info!(
            scans = self.summary.scans_processed,
            failures = self.summary.failures,
            status = self.status.display_name(),
            "scan pump finished"
        );
        self.summary
    }

    async fn handle(&mut self, event: ScannerEvent) -> Option<PackageRecord> {
        match event {
            ScannerEvent::Connected { device } => {
                info!(device = %device, "scanner connected");
                self.status = ConnectionStatus::Connected;
                self.device = Some(device);
                None
            }
            ScannerEvent::Disconnected { device } => {
                info!(device = ?device, "scanner disconnected");
                if device.is_none() || device == self.device {
                    self.device = None;
                }
                self.status = ConnectionStatus::Disconnected;
                None
            }
            ScannerEvent::DeviceDiscovered { device } => {
                if !self.summary.discovered.contains(&device) {
                    self.summary.discovered.push(device);
                }
                if self.status == ConnectionStatus::Disconnected {
                    self.status = ConnectionStatus::Connecting;
                }
                None
            }
            ScannerEvent::Error { device, message } => {
                warn!(device = ?device, error = %message, "scanner error");
                self.status = ConnectionStatus::Error;
                None
            }
            ScannerEvent::DataReceived(mut scan) => {
                if scan.device.is_none() {
                    scan.device = self.device.clone();
                }
                // Carrier lookups are blocking network calls; keep them off the async workers.
                let service = Arc::clone(&self.service);
                match tokio::task::spawn_blocking(move || service.inspect(&scan)).await {
                    Ok(Ok(record)) => {
                        self.summary.scans_processed += 1;
                        Some(record)
                    }
                    Ok(Err(err)) => {
                        warn!(error = %err, "scan could not be inspected");
                        self.summary.failures += 1;
                        None
                    }
                    Err(err) => {
                        warn!(error = %err, "inspection task did not complete");
                        self.summary.failures += 1;
                        None
                    }
                }
            }
        }
    }
}
