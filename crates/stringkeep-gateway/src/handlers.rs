// SPDX-FileCopyrightText: 2026 Stringkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the record API.
//!
//! Bodies are decoded from raw bytes whatever the `Content-Type`, and
//! absent fields fall back to zero values.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use stringkeep_core::{HealthStatus, Record};

use crate::error::ApiError;
use crate::server::GatewayState;

/// Request body for POST /api/create.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateRequest {
    /// Value to store.
    pub value: String,
}

/// Request body for POST /api/update.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateRequest {
    /// Record to overwrite.
    pub id: i64,
    /// Replacement value.
    pub value: String,
}

/// Query string for DELETE /api/delete.
#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    /// Raw `id` parameter, validated by the handler.
    pub id: Option<String>,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok` or `unhealthy`.
    pub status: String,
    /// Backend tag serving the store.
    pub backend: String,
    /// Binary version.
    pub version: String,
    /// Seconds since the gateway started.
    pub uptime_secs: u64,
    /// Failure detail when unhealthy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(body)
        .map_err(|e| ApiError::BadRequest(format!("invalid JSON body: {e}")))
}

fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid id `{raw}`")))
}

/// GET /api
pub async fn read_all(State(state): State<GatewayState>) -> Result<Json<Vec<Record>>, ApiError> {
    Ok(Json(state.store.read_all().await?))
}

/// GET /api/{id}
pub async fn read_by_id(
    State(state): State<GatewayState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Record>, ApiError> {
    let id = parse_id(&raw_id)?;
    Ok(Json(state.store.read_by_id(id).await?))
}

/// POST /api/create
///
/// Returns 201 with the stored record.
pub async fn create(
    State(state): State<GatewayState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Record>), ApiError> {
    let req: CreateRequest = parse_body(&body)?;
    let id = state.store.create(&req.value).await?;
    tracing::debug!(id, "record created");
    Ok((StatusCode::CREATED, Json(Record::new(id, req.value))))
}

/// POST /api/update
///
/// Echoes the submitted record without re-reading it.
pub async fn update(
    State(state): State<GatewayState>,
    body: Bytes,
) -> Result<Json<Record>, ApiError> {
    let req: UpdateRequest = parse_body(&body)?;
    let affected = state.store.update(req.id, &req.value).await?;
    if affected == 0 {
        tracing::debug!(id = req.id, "update matched no record");
    }
    Ok(Json(Record::new(req.id, req.value)))
}

/// DELETE /api/delete?id={id}
pub async fn delete(
    State(state): State<GatewayState>,
    Query(params): Query<DeleteParams>,
) -> Result<StatusCode, ApiError> {
    let raw = params
        .id
        .ok_or_else(|| ApiError::BadRequest("missing `id` query parameter".to_string()))?;
    let id = parse_id(&raw)?;
    let affected = state.store.delete(id).await?;
    if affected == 0 {
        tracing::debug!(id, "delete matched no record");
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /health
///
/// 200 while the backend answers a ping, 503 otherwise.
pub async fn health(State(state): State<GatewayState>) -> Response {
    let status = match state.store.health_check().await {
        Ok(status) => status,
        Err(e) => HealthStatus::Unhealthy(e.to_string()),
    };
    let (code, label, detail) = match status {
        HealthStatus::Healthy => (StatusCode::OK, "ok", None),
        HealthStatus::Unhealthy(reason) => (StatusCode::SERVICE_UNAVAILABLE, "unhealthy", Some(reason)),
    };
    let body = HealthResponse {
        status: label.to_string(),
        backend: state.store.backend().to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        detail,
    };
    (code, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_defaults_missing_value() {
        let req: CreateRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.value, "");
    }

    #[test]
    fn update_request_defaults_missing_fields() {
        let req: UpdateRequest = serde_json::from_str(r#"{"value": "x"}"#).unwrap();
        assert_eq!(req.id, 0);
        assert_eq!(req.value, "x");
    }

    #[test]
    fn update_request_rejects_string_id() {
        let body = Bytes::from_static(br#"{"id": "1", "value": "x"}"#);
        let err = parse_body::<UpdateRequest>(&body).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn parse_id_rejects_non_integers() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert_eq!(parse_id("-1").unwrap(), -1);
        assert!(parse_id("abc").is_err());
        assert!(parse_id("1.5").is_err());
        assert!(parse_id("").is_err());
    }

    #[test]
    fn health_response_omits_empty_detail() {
        let resp = HealthResponse {
            status: "ok".to_string(),
            backend: "sqlite".to_string(),
            version: "0.1.0".to_string(),
            uptime_secs: 42,
            detail: None,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"status\":\"ok\""));
        assert!(json.contains("\"backend\":\"sqlite\""));
        assert!(json.contains("\"uptime_secs\":42"));
        assert!(!json.contains("detail"));
    }
}
