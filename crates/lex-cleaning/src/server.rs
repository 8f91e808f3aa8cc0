//! HTTP boundary for the cleaning pipeline.
//!
//! # API Endpoints
//!
//! | Method | Path      | Description                                  |
//! |--------|-----------|----------------------------------------------|
//! | GET    | `/health` | Health check                                 |
//! | POST   | `/clean`  | Upload a CSV and a JSON config, get it clean |
//!
//! `POST /clean` takes a multipart form with the fields `file` (CSV bytes),
//! `config` (JSON text) and optionally `preview` (boolean, default false).
//! With `preview` set the response is a JSON array of the first
//! [`PREVIEW_ROWS`] records; otherwise it is the full table as a CSV download.
//! A rejected request is answered with status 400 and a `{code, message}` body.

use crate::config::CleaningConfig;
use crate::error::CleaningError;
use crate::output::{
    CLEANED_FILE_NAME, CSV_CONTENT_TYPE, PREVIEW_ROWS, RowRecord, preview_records, to_csv_bytes,
};
use crate::pipeline::CleaningPipeline;
use crate::utils::parse_boolean_str;
use axum::{
    Router,
    extract::{DefaultBodyLimit, Multipart},
    http::{StatusCode, header},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use std::net::SocketAddr;
use tracing::{debug, error, info, warn};

/// Largest accepted request body.
pub const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Build the application router.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/clean", post(clean))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

/// Start the HTTP server on all interfaces.
pub async fn start_server(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Cleaning server listening on http://{}", addr);
    info!("  POST /clean  - clean an uploaded CSV");
    info!("  GET  /health - health check");

    axum::serve(listener, router()).await?;
    Ok(())
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "lex-cleaning",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn clean(multipart: Multipart) -> Result<CleanResponse, ApiError> {
    let request = CleanRequest::from_multipart(multipart).await?;
    info!(
        "Clean request: {} bytes, preview={}",
        request.file.len(),
        request.preview
    );

    let response = tokio::task::spawn_blocking(move || request.execute())
        .await
        .map_err(|e| ApiError::Internal(format!("Cleaning task failed: {}", e)))??;

    Ok(response)
}

// ============================================================================
// REQUEST
// ============================================================================

/// The decoded form of a `POST /clean` request.
#[derive(Debug, Clone)]
pub struct CleanRequest {
    pub file: Vec<u8>,
    pub config: String,
    pub preview: bool,
}

impl CleanRequest {
    async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut file: Option<Vec<u8>> = None;
        let mut config: Option<String> = None;
        let mut preview = false;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Multipart error: {}", e)))?
        {
            let name = field.name().unwrap_or("").to_string();

            match name.as_str() {
                "file" => {
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::BadRequest(format!("Read error: {}", e)))?;
                    file = Some(bytes.to_vec());
                }
                "config" => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| ApiError::BadRequest(format!("Read error: {}", e)))?;
                    config = Some(text);
                }
                "preview" => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| ApiError::BadRequest(format!("Read error: {}", e)))?;
                    preview = parse_boolean_str(&text).ok_or_else(|| {
                        ApiError::BadRequest(format!("Invalid boolean for 'preview': '{}'", text))
                    })?;
                }
                other => debug!("Ignoring unknown form field '{}'", other),
            }
        }

        Ok(Self {
            file: file.ok_or_else(|| ApiError::BadRequest("No file provided".to_string()))?,
            config: config
                .ok_or_else(|| ApiError::BadRequest("No config provided".to_string()))?,
            preview,
        })
    }

    /// Validate the config, clean the file and render the response body.
    ///
    /// The config is checked before the file is parsed.
    pub fn execute(&self) -> Result<CleanResponse, CleaningError> {
        let config = CleaningConfig::from_json_str(&self.config)?;
        let result = CleaningPipeline::new(config).process_bytes(&self.file)?;

        for step in &result.summary.processing_steps {
            debug!("  {}", step);
        }

        if self.preview {
            Ok(CleanResponse::Preview(preview_records(
                &result.table,
                PREVIEW_ROWS,
            )))
        } else {
            Ok(CleanResponse::Csv(to_csv_bytes(&result.table)?))
        }
    }
}

// ============================================================================
// RESPONSES
// ============================================================================

/// A successful `POST /clean` answer.
#[derive(Debug, Clone, PartialEq)]
pub enum CleanResponse {
    /// The first rows as JSON records
    Preview(Vec<RowRecord>),
    /// The full table as CSV bytes
    Csv(Vec<u8>),
}

impl IntoResponse for CleanResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Preview(records) => Json(records).into_response(),
            Self::Csv(bytes) => (
                [
                    (header::CONTENT_TYPE, CSV_CONTENT_TYPE.to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename={}", CLEANED_FILE_NAME),
                    ),
                ],
                bytes,
            )
                .into_response(),
        }
    }
}

/// A failed `POST /clean` answer.
#[derive(Debug)]
pub enum ApiError {
    /// The cleaning itself failed
    Cleaning(CleaningError),
    /// The form could not be decoded
    BadRequest(String),
    /// The worker thread failed
    Internal(String),
}

impl From<CleaningError> for ApiError {
    fn from(err: CleaningError) -> Self {
        Self::Cleaning(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Cleaning(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> Value {
        match self {
            Self::Cleaning(err) => json!(err),
            Self::BadRequest(message) => json!({ "code": "BAD_REQUEST", "message": message }),
            Self::Internal(message) => json!({ "code": "INTERNAL_ERROR", "message": message }),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = self.body();
        match &self {
            Self::Cleaning(err) if err.is_client_error() => {
                warn!("Clean request rejected ({}): {}", status, body["message"])
            }
            Self::BadRequest(_) => warn!("Clean request rejected ({}): {}", status, body["message"]),
            _ => error!("Clean request failed ({}): {}", status, body["message"]),
        }
        (status, Json(body)).into_response()
    }
}
