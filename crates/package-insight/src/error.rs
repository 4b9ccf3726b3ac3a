use crate::config::ConfigError;
use crate::inspection::InspectionError;
use crate::risk::import::RuleImportError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Inspection(InspectionError),
    RuleImport(RuleImportError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Inspection(err) => write!(f, "inspection error: {}", err),
            AppError::RuleImport(err) => write!(f, "rule import error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Inspection(err) => Some(err),
            AppError::RuleImport(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::RuleImport(_) => StatusCode::BAD_REQUEST,
            AppError::Inspection(_) => StatusCode::BAD_GATEWAY,
            AppError::Config(_) | AppError::Telemetry(_) | AppError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<InspectionError> for AppError {
    fn from(value: InspectionError) -> Self {
        Self::Inspection(value)
    }
}

impl From<RuleImportError> for AppError {
    fn from(value: RuleImportError) -> Self {
        Self::RuleImport(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspection::RuleStoreError;

    #[test]
    fn inspection_failures_map_to_bad_gateway() {
        let error = AppError::from(InspectionError::from(RuleStoreError::Unavailable(
            "offline".to_string(),
        )));
        assert_eq!(error.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn malformed_rule_files_map_to_bad_request() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = AppError::from(RuleImportError::from(parse));
        assert!(error.to_string().starts_with("rule import error"));
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
