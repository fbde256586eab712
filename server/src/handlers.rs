use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use mathboard_shared::ClientConfig;

use crate::state::AppState;

pub async fn ping_handler() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}

/// Deploy-time settings the browser reads on startup.
pub async fn config_handler(State(state): State<AppState>) -> Json<ClientConfig> {
    Json(state.config.as_ref().clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn config_reports_api_url() {
        let state = AppState::new("https://calc.example".to_string());
        let Json(config) = config_handler(State(state)).await;
        assert_eq!(config.api_url, "https://calc.example");
        let body = serde_json::to_value(&config).unwrap();
        assert_eq!(body, serde_json::json!({ "api_url": "https://calc.example" }));
    }

    #[tokio::test]
    async fn ping_is_empty() {
        let response = ping_handler().await.into_response();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}
