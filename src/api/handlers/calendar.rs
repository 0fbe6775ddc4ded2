//! Filtered calendar handler.

use std::collections::HashMap;

use axum::{
    Router,
    extract::{Query, State, rejection::QueryRejection},
    http::header,
    response::IntoResponse,
    routing::get,
};

use crate::error::{AppError, AppResult};
use crate::services::CalendarService;

/// Content type of the filtered feed.
pub const CALENDAR_CONTENT_TYPE: &str = "text/calendar; charset=utf-8";

/// Creates the calendar route at `route`.
pub fn calendar_routes(route: &str, service: CalendarService) -> Router {
    Router::new()
        .route(route, get(calendar_feed))
        .with_state(service)
}

/// GET {route}?<pass_param>=<value>
async fn calendar_feed(
    State(service): State<CalendarService>,
    params: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let Query(params) = params?;

    let value = params.get(service.pass_param()).ok_or_else(|| {
        AppError::bad_request(format!(
            "missing query parameter '{}'",
            service.pass_param()
        ))
    })?;

    tracing::info!("Calendar request");
    let body = service.fetch(value).await?;

    Ok(([(header::CONTENT_TYPE, CALENDAR_CONTENT_TYPE)], body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CalendarSettings;
    use crate::external::testing::spawn_upstream;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    async fn app() -> Router {
        let upstream = Router::new().route(
            "/ics",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                match params.get("key").map(String::as_str) {
                    Some("ok") => (
                        StatusCode::OK,
                        "BEGIN:VCALENDAR\nX-SECRET:1\nEND:VCALENDAR\n".to_string(),
                    ),
                    _ => (StatusCode::NOT_FOUND, String::new()),
                }
            }),
        );
        let addr = spawn_upstream(upstream).await;

        let service = CalendarService::new(
            &CalendarSettings {
                route: "/cal".to_string(),
                base_url: format!("http://{}/ics", addr),
                pass_param: "key".to_string(),
                filter: r"X-SECRET:[^\n]*\n".to_string(),
            },
            reqwest::Client::new(),
        )
        .unwrap();
        calendar_routes("/cal", service)
    }

    async fn get_uri(uri: &str) -> axum::response::Response {
        app()
            .await
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_feed_is_filtered() {
        let response = get_uri("/cal?key=ok").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            CALENDAR_CONTENT_TYPE
        );
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"BEGIN:VCALENDAR\nEND:VCALENDAR\n");
    }

    #[tokio::test]
    async fn test_missing_param_is_bad_request() {
        let response = get_uri("/cal?other=ok").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upstream_error_is_bad_gateway() {
        let response = get_uri("/cal?key=nope").await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
