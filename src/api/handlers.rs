//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use super::AppState;
use super::types::{ErrorResponse, SeriesQuery, SummaryResponse};

/// `GET /summary` → 200 + `SummaryResponse` JSON
pub async fn get_summary(State(state): State<Arc<AppState>>) -> Response {
    Json(SummaryResponse {
        config: &state.run.config,
        summary: &state.summary,
        total_minutes: state.run.total_minutes,
        uptime: state.summary.uptime_fraction(),
    })
    .into_response()
}

/// Returns per-minute rows, optionally filtered by series index.
///
/// `GET /series` → 200 + `Vec<SeriesRow>` JSON
/// `GET /series?from=N&to=M` → filtered range (inclusive)
/// `GET /series?from=10&to=5` → 400 + `ErrorResponse`
pub async fn get_series(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SeriesQuery>,
) -> Response {
    let from = query.from.unwrap_or(0);
    let to = query.to.unwrap_or(usize::MAX);

    if from > to {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("`from` ({from}) must be <= `to` ({to})"),
            }),
        )
            .into_response();
    }

    Json(state.run.rows(from, to)).into_response()
}

/// `GET /events` → 200 + `Vec<ToggleEvent>` JSON
pub async fn get_events(State(state): State<Arc<AppState>>) -> Response {
    Json(&state.run.toggles).into_response()
}

/// `GET /annotations` → 200 + `Vec<Annotation>` JSON
pub async fn get_annotations(State(state): State<Arc<AppState>>) -> Response {
    Json(&state.run.annotations).into_response()
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    use super::*;
    use crate::api::router;
    use crate::config::ScenarioConfig;
    use crate::sim::engine::Engine;

    fn make_test_state() -> Arc<AppState> {
        let mut scenario = ScenarioConfig::apogaea();
        scenario.solar.peak_w = 60.0;
        let run = Engine::new(scenario.to_simulation_config()).run();
        Arc::new(AppState::new(run))
    }

    async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        let app = router(make_test_state());
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn summary_returns_200() {
        let (status, json) = get_json("/summary").await;
        assert_eq!(status, StatusCode::OK);
        assert!(json.get("config").is_some());
        assert!(json["summary"]["shutdowns"].as_u64().unwrap() > 0);
        assert_eq!(json["total_minutes"], 10441);
    }

    #[tokio::test]
    async fn series_range_query() {
        let (status, json) = get_json("/series?from=5&to=10").await;
        assert_eq!(status, StatusCode::OK);
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0]["minute"], 5);
        assert_eq!(rows[0]["time"], "12:05");
        assert_eq!(rows[5]["minute"], 10);
    }

    #[tokio::test]
    async fn series_invalid_range_returns_400() {
        let (status, json) = get_json("/series?from=10&to=5").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json.get("error").is_some());
    }

    #[tokio::test]
    async fn events_include_markers() {
        let (status, json) = get_json("/events").await;
        assert_eq!(status, StatusCode::OK);
        let events = json.as_array().unwrap();
        assert!(events.len() > 2);
        assert_eq!(events[0]["minute"], 0);
        assert_eq!(events[0]["on"], true);
    }

    #[tokio::test]
    async fn annotations_are_spaced() {
        let (_, json) = get_json("/annotations").await;
        let minutes: Vec<u64> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["minute"].as_u64().unwrap())
            .collect();
        assert!(!minutes.is_empty());
        assert!(minutes.windows(2).all(|w| w[1] - w[0] >= 10));
    }
}
