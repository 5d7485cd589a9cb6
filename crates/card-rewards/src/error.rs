use crate::config::ConfigError;
use crate::rewards::{DataLoadError, OptimizeError, SelectionError};
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
    Server(axum::Error),
    Data(DataLoadError),
    Selection(SelectionError),
    Optimize(OptimizeError),
    Export(csv::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Data(err) => write!(f, "benefit data error: {}", err),
            AppError::Selection(err) => write!(f, "selection error: {}", err),
            AppError::Optimize(err) => write!(f, "optimizer error: {}", err),
            AppError::Export(err) => write!(f, "export error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Data(err) => Some(err),
            AppError::Selection(err) => Some(err),
            AppError::Optimize(err) => Some(err),
            AppError::Export(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Selection(_) | AppError::Optimize(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Data(_)
            | AppError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
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

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<DataLoadError> for AppError {
    fn from(value: DataLoadError) -> Self {
        Self::Data(value)
    }
}

impl From<SelectionError> for AppError {
    fn from(value: SelectionError) -> Self {
        Self::Selection(value)
    }
}

impl From<OptimizeError> for AppError {
    fn from(value: OptimizeError) -> Self {
        Self::Optimize(value)
    }
}

impl From<csv::Error> for AppError {
    fn from(value: csv::Error) -> Self {
        Self::Export(value)
    }
}
