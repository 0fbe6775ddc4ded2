//! Firefly shortcut handlers.

use axum::{
    Router,
    extract::State,
    http::header,
    response::IntoResponse,
    routing::{get, post},
};

use crate::api::dto::AddTransactionRequest;
use crate::config::FireflySettings;
use crate::error::{AppError, AppResult};
use crate::services::FireflyService;
use crate::utils::validate::ValidatedJson;

/// Creates the shortcut routes below the configured prefix.
///
/// Routes:
/// - GET  {route}/shortcuts       - List shortcuts
/// - POST {route}/add-transaction - Submit a shortcut
pub fn firefly_routes(settings: &FireflySettings, service: FireflyService) -> Router {
    Router::new()
        .route(&settings.shortcuts_route(), get(list_shortcuts))
        .route(&settings.add_transaction_route(), post(add_transaction))
        .with_state(service)
}

/// Pretty-printed JSON array of the configured shortcuts.
async fn list_shortcuts(State(service): State<FireflyService>) -> AppResult<impl IntoResponse> {
    let json = serde_json::to_string_pretty(&service.list_shortcuts())
        .map_err(|e| AppError::Internal { source: e.into() })?;

    Ok(([(header::CONTENT_TYPE, "application/json")], json))
}

/// Forwards Firefly's response body on success.
async fn add_transaction(
    State(service): State<FireflyService>,
    ValidatedJson(request): ValidatedJson<AddTransactionRequest>,
) -> AppResult<impl IntoResponse> {
    let body = service.add_transaction(&request).await?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShortcutSettings;
    use crate::external::FireflyClient;
    use crate::external::testing::spawn_upstream;
    use axum::{
        Json,
        body::Body,
        http::{Method, Request, StatusCode},
    };
    use serde_json::{Value, json};
    use std::path::PathBuf;
    use tower::ServiceExt;

    fn settings() -> FireflySettings {
        FireflySettings {
            route: "/firefly".to_string(),
            firefly_url: "http://unused".to_string(),
            pat_file: PathBuf::from("unused"),
            shortcuts: vec![ShortcutSettings {
                label: "Snack".to_string(),
                icon: "s".to_string(),
                name: "Snack".to_string(),
                source: "Wallet".to_string(),
                destination: "Kiosk".to_string(),
                amount: Some(2.0),
                budget: None,
                category: None,
            }],
        }
    }

    async fn app(upstream_status: StatusCode) -> Router {
        let upstream = Router::new().route(
            "/api/v1/transactions",
            post(move |Json(_): Json<Value>| async move {
                (upstream_status, r#"{"data":{"type":"transactions"}}"#)
            }),
        );
        let addr = spawn_upstream(upstream).await;

        let settings = settings();
        let client =
            FireflyClient::new(reqwest::Client::new(), &format!("http://{}", addr), "pat")
                .unwrap();
        let service = FireflyService::new(client, settings.shortcuts.clone());
        firefly_routes(&settings, service)
    }

    fn add_request(body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/firefly/add-transaction")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_list_shortcuts_is_pretty_json() {
        let response = app(StatusCode::OK)
            .await
            .oneshot(
                Request::builder()
                    .uri("/firefly/shortcuts")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let text = body_text(response).await;
        assert!(text.contains('\n'));

        let json: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json[0]["shortcut_id"], 0);
        assert_eq!(json[0]["shortcut_name"], "Snack");
        assert!(json[0]["category"].is_null());
    }

    #[tokio::test]
    async fn test_add_transaction_passes_upstream_body() {
        let response = app(StatusCode::OK)
            .await
            .oneshot(add_request(json!({ "shortcut_id": 0 })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_text(response).await,
            r#"{"data":{"type":"transactions"}}"#
        );
    }

    #[tokio::test]
    async fn test_add_transaction_upstream_failure_is_bad_gateway() {
        let response = app(StatusCode::INTERNAL_SERVER_ERROR)
            .await
            .oneshot(add_request(json!({ "shortcut_id": 0 })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_add_transaction_rejections() {
        let cases = [
            json!({ "shortcut_id": 5 }),
            json!({ "shortcut_id": 0, "amount_override": -3 }),
            json!({ "amount_override": 3 }),
        ];

        for body in cases {
            let response = app(StatusCode::OK)
                .await
                .oneshot(add_request(body.clone()))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", body);
        }
    }
}
