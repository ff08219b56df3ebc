//! Health check endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub connections: usize,
    pub open_tickets: usize,
    pub operator_connected: bool,
}

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let stats = state.router.stats().await;

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            connections: stats.connections,
            open_tickets: stats.open_tickets,
            operator_connected: stats.operator_connected,
        }),
    )
}

/// Liveness check (just returns 200 if the server is running)
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AllowedOrigins, Config, LogFormat};
    use crate::routes::create_router;
    use axum::{body::Body, http::Request};
    use tokio::sync::mpsc;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        AppState::new(Config {
            bind_address: "127.0.0.1:0".parse().unwrap(),
            allowed_origins: AllowedOrigins::Any,
            log_format: LogFormat::Pretty,
        })
    }

    #[tokio::test]
    async fn test_health_reports_desk_counters() {
        let state = test_state();
        let (tx, _rx) = mpsc::unbounded_channel();
        let conn = state.router.connect(tx).await;
        state
            .router
            .handle(
                conn.session_id,
                crate::websocket::events::ClientEvent::CreateTicket {
                    message: "help".to_string(),
                },
            )
            .await;

        let response = create_router(state)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["connections"], 1);
        assert_eq!(json["openTickets"], 1);
        assert_eq!(json["operatorConnected"], false);
    }

    #[tokio::test]
    async fn test_liveness() {
        let response = create_router(test_state())
            .oneshot(Request::builder().uri("/health/live").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
