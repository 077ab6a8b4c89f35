//! Health check handlers

use std::collections::HashMap;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::repository::AddressRepository;
use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service name
    pub service: String,

    /// Version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Readiness check response with dependency status
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    /// Overall readiness status
    pub ready: bool,

    /// Service name
    pub service: String,

    /// Dependency statuses
    pub dependencies: HashMap<String, DependencyStatus>,
}

/// Individual dependency status
#[derive(Debug, Serialize, Deserialize)]
pub struct DependencyStatus {
    /// Dependency is healthy
    pub healthy: bool,

    /// Optional message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Simple health check (liveness probe)
///
/// Always returns 200 OK if the service is running.
pub async fn health<R>(State(state): State<AppState<R>>) -> impl IntoResponse
where
    R: AddressRepository,
{
    let response = HealthResponse {
        status: "healthy".to_string(),
        service: state.config().service.name.clone(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    };

    (StatusCode::OK, Json(response))
}

/// Readiness check (readiness probe)
///
/// Returns 200 OK when the address store answers a query and
/// 503 Service Unavailable when it does not.
pub async fn readiness<R>(State(state): State<AppState<R>>) -> impl IntoResponse
where
    R: AddressRepository,
{
    let database = match state.repository().ping().await {
        Ok(()) => DependencyStatus {
            healthy: true,
            message: Some("Connected".to_string()),
        },
        Err(e) => {
            tracing::error!(
                operation = %e.operation,
                kind = %e.kind,
                "Database health check failed: {}",
                e.message
            );
            DependencyStatus {
                healthy: false,
                message: Some(format!("Connection failed: {}", e.message)),
            }
        }
    };

    let ready = database.healthy;
    let mut dependencies = HashMap::new();
    dependencies.insert("database".to_string(), database);

    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = ReadinessResponse {
        ready,
        service: state.config().service.name.clone(),
        dependencies,
    };

    (status, Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            service: "addressbook".to_string(),
            version: None,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["service"], "addressbook");
        assert!(json.get("version").is_none());
    }

    #[test]
    fn test_dependency_status() {
        let status = DependencyStatus {
            healthy: false,
            message: Some("Connection failed: pool closed".to_string()),
        };

        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["healthy"], false);
        assert_eq!(json["message"], "Connection failed: pool closed");
    }
}
