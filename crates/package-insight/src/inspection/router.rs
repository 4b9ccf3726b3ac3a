use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::collaborators::{CarrierLookup, RuleStore};
use super::record::{PackageRecord, RiskDisplay};
use super::service::{InspectionError, InspectionService};
use crate::risk::{RiskBand, RiskScoreResult, RuleSnapshot};
use crate::scanning::{ExtractedFields, RawScan};
use crate::shipment::PackageAttributes;

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub payload: String,
}

/// Either `fields` or a `payload` to extract them from. Without `rules` the
/// service's rule store is used.
#[derive(Debug, Default, Deserialize)]
pub struct ScoreRequest {
    #[serde(default)]
    pub payload: Option<String>,
    #[serde(default)]
    pub fields: Option<ExtractedFields>,
    #[serde(default)]
    pub package: Option<PackageAttributes>,
    #[serde(default)]
    pub rules: Option<RuleSnapshot>,
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub fields: ExtractedFields,
    #[serde(flatten)]
    pub result: RiskScoreResult,
    pub band: RiskBand,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct InspectRequest {
    pub payload: String,
    #[serde(default)]
    pub symbology: Option<String>,
    #[serde(default)]
    pub device: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InspectResponse {
    pub record: PackageRecord,
    pub display: RiskDisplay,
}

/// Router builder exposing extraction, scoring and full inspection.
pub fn inspection_router<C, S>(service: Arc<InspectionService<C, S>>) -> Router
where
    C: CarrierLookup + 'static,
    S: RuleStore + 'static,
{
    Router::new()
        .route("/api/v1/scans/extract", post(extract_handler::<C, S>))
        .route("/api/v1/scans/score", post(score_handler::<C, S>))
        .route("/api/v1/scans/inspect", post(inspect_handler::<C, S>))
        .with_state(service)
}

pub(crate) async fn extract_handler<C, S>(
    State(service): State<Arc<InspectionService<C, S>>>,
    Json(request): Json<ExtractRequest>,
) -> Response
where
    C: CarrierLookup + 'static,
    S: RuleStore + 'static,
{
    let extraction = service.extract(&request.payload);
    (StatusCode::OK, Json(extraction)).into_response()
}

pub(crate) async fn score_handler<C, S>(
    State(service): State<Arc<InspectionService<C, S>>>,
    Json(request): Json<ScoreRequest>,
) -> Response
where
    C: CarrierLookup + 'static,
    S: RuleStore + 'static,
{
    let ScoreRequest {
        payload,
        fields,
        package,
        rules,
    } = request;

    let fields = match (fields, payload) {
        (Some(fields), _) => fields,
        (None, Some(payload)) => service.extract(&payload).fields,
        (None, None) => {
            let payload = json!({ "error": "either fields or payload is required" });
            return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
        }
    };

    let rules = match rules {
        Some(rules) => rules,
        None => match service.rule_snapshot() {
            Ok(rules) => rules,
            Err(err) => return error_response(err),
        },
    };

    let result = service.score(&fields, package.as_ref(), &rules);
    let band = result.band();
    let message = result.message();

    (
        StatusCode::OK,
        Json(ScoreResponse {
            fields,
            result,
            band,
            message,
        }),
    )
        .into_response()
}

pub(crate) async fn inspect_handler<C, S>(
    State(service): State<Arc<InspectionService<C, S>>>,
    Json(request): Json<InspectRequest>,
) -> Response
where
    C: CarrierLookup + 'static,
    S: RuleStore + 'static,
{
    let mut scan = RawScan::new(request.payload);
    scan.symbology = request.symbology;
    scan.device = request.device;

    match service.inspect(&scan) {
        Ok(record) => {
            let display = record.display();
            (StatusCode::OK, Json(InspectResponse { record, display })).into_response()
        }
        Err(err) => error_response(err),
    }
}

fn error_response(err: InspectionError) -> Response {
    let payload = json!({
        "error": err.to_string(),
    });
    (StatusCode::BAD_GATEWAY, Json(payload)).into_response()
}
