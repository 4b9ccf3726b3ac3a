use crate::infra::{read_json_file, FixtureCarrierLookup, SnapshotRuleStore};
use clap::Args;
use package_insight::config::AppConfig;
use package_insight::error::AppError;
use package_insight::inspection::router::ScoreResponse;
use package_insight::inspection::{InspectionService, PackageRecord};
use package_insight::risk::{
    AccountEntry, CiiRange, PatternRule, RiskScoringEngine, RuleSnapshot, ScoringConfig,
};
use package_insight::scanning::{
    BarcodeFieldExtractor, PumpSummary, RawScan, ScanEventPump, ScannerEvent,
};
use package_insight::shipment::{
    DimensionUnit, Origin, PackageAttributes, PackageDimensions, PackageWeight, WeightUnit,
};
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

const DEMO_DEVICE: &str = "S740 [demo]";
const DEMO_TRACKING: &str = "FEDEX7946123456780";
const DEMO_WATCHED_ACCOUNT: &str = "ACCOUNT0000000000042";

#[derive(Args, Debug)]
pub(crate) struct ExtractArgs {
    /// Raw barcode payload as decoded by the scanner
    pub(crate) payload: String,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Raw barcode payload as decoded by the scanner
    #[arg(long)]
    pub(crate) payload: String,
    /// Rule snapshot JSON (defaults to APP_RULES_PATH, then empty tables)
    #[arg(long)]
    pub(crate) rules: Option<PathBuf>,
    /// Carrier package attributes JSON
    #[arg(long)]
    pub(crate) package: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Score the sample scans against this rule snapshot instead of the built-in one
    #[arg(long)]
    pub(crate) rules: Option<PathBuf>,
}

pub(crate) fn run_extract(args: ExtractArgs) -> Result<(), AppError> {
    let extraction = BarcodeFieldExtractor::new().extract(&args.payload);
    print_json(&extraction)
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        payload,
        rules,
        package,
    } = args;

    let config = AppConfig::load()?;
    let rules = match rules.or(config.sources.rules_path) {
        Some(path) => RuleSnapshot::from_json_path(path)?,
        None => RuleSnapshot::default(),
    };
    let package: Option<PackageAttributes> = match package {
        Some(path) => Some(read_json_file(&path)?),
        None => None,
    };

    let fields = BarcodeFieldExtractor::new().extract(&payload).fields;
    let result = RiskScoringEngine::new(config.scoring).score(&fields, package.as_ref(), &rules);
    let band = result.band();
    let message = result.message();

    print_json(&ScoreResponse {
        fields,
        result,
        band,
        message,
    })
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let rules = match args.rules {
        Some(path) => RuleSnapshot::from_json_path(path)?,
        None => demo_rules(),
    };
    let service = demo_service(rules, config.scoring);

    println!("Package Insight scanner demo");
    let (records, summary) = pump_demo_scans(service).await;

    for record in &records {
        let display = record.display();
        println!(
            "- {} | {} | score {} ({}) | triggered [{}] | {}",
            record.tracking_number.as_deref().unwrap_or("no tracking number"),
            record.status.label(),
            display.score,
            display.color,
            display.triggered_indices.join(", "),
            display.message,
        );
        for fault in &record.rule_faults {
            println!("    rule fault: {}", fault.message);
        }
    }

    println!(
        "\nScanner {} | {} scans processed | {} failures | discovered: {}",
        summary.status.display_name(),
        summary.scans_processed,
        summary.failures,
        summary.discovered.join(", ")
    );

    Ok(())
}

fn demo_service(
    rules: RuleSnapshot,
    scoring: ScoringConfig,
) -> InspectionService<FixtureCarrierLookup, SnapshotRuleStore> {
    InspectionService::new(
        Arc::new(FixtureCarrierLookup::new(demo_packages())),
        Arc::new(SnapshotRuleStore::new(rules)),
        scoring,
    )
}

async fn pump_demo_scans(
    service: InspectionService<FixtureCarrierLookup, SnapshotRuleStore>,
) -> (Vec<PackageRecord>, PumpSummary) {
    let events = demo_events();
    let (event_tx, event_rx) = mpsc::channel(events.len());
    let (record_tx, mut record_rx) = mpsc::channel(events.len());

    for event in events {
        if event_tx.send(event).await.is_err() {
            break;
        }
    }
    drop(event_tx);

    let pump = ScanEventPump::new(Arc::new(service));
    let collect = async move {
        let mut records = Vec::new();
        while let Some(record) = record_rx.recv().await {
            records.push(record);
        }
        records
    };

    let (summary, records) = tokio::join!(pump.run(event_rx, record_tx), collect);
    (records, summary)
}

fn demo_events() -> Vec<ScannerEvent> {
    vec![
        ScannerEvent::DeviceDiscovered {
            device: DEMO_DEVICE.to_string(),
        },
        ScannerEvent::Connected {
            device: DEMO_DEVICE.to_string(),
        },
        ScannerEvent::DataReceived(
            RawScan::new(format!(
                "(00){DEMO_TRACKING} (420){DEMO_WATCHED_ACCOUNT} (411)PO BOX 12"
            ))
            .with_symbology("GS1-128"),
        ),
        ScannerEvent::DataReceived(
            RawScan::new("@ANSI 1Z999AA10123456784 ACCT 1234567890").with_symbology("PDF417"),
        ),
        ScannerEvent::DataReceived(RawScan::new("???")),
        ScannerEvent::Disconnected {
            device: Some(DEMO_DEVICE.to_string()),
        },
    ]
}

fn demo_rules() -> RuleSnapshot {
    RuleSnapshot {
        ani_watchlist: vec![AccountEntry::new(DEMO_WATCHED_ACCOUNT)],
        vai_safe_list: vec![AccountEntry::new("1012345678")],
        cii_ranges: vec![
            CiiRange::new(0.0, 999.0, 0),
            CiiRange::new(1000.0, 5000.0, 15),
        ],
        osi_rules: vec![PatternRule::new("^Miami", 10, true)],
        rsi_rules: vec![
            PatternRule::new("^POBOX", 20, true),
            PatternRule::new("PMB[0-9]+", 20, false),
        ],
    }
}

fn demo_packages() -> HashMap<String, PackageAttributes> {
    let mut packages = HashMap::new();
    packages.insert(
        DEMO_TRACKING.to_string(),
        PackageAttributes {
            dimensions: Some(PackageDimensions {
                length: 16.0,
                width: 12.0,
                height: 8.0,
                unit: DimensionUnit::In,
            }),
            weight: Some(PackageWeight {
                value: 11.5,
                unit: WeightUnit::Lb,
            }),
            origin: Origin {
                city: "Miami".to_string(),
                state: "FL".to_string(),
                country: "US".to_string(),
            },
            address_type: Some("residential".to_string()),
            shipping_type: Some("express".to_string()),
        },
    );
    packages
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value).map_err(std::io::Error::from)?;
    println!("{rendered}");
    Ok(())
}
