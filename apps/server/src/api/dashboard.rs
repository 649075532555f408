use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use fabricscope_core::health::{Dashboard, DashboardFilter, EvaluationMap};

use crate::{error::ApiResult, main_lib::AppState};

/// Dashboard of the current snapshot, cards narrowed by the filter.
///
/// Group summaries always cover the whole dashboard.
async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<DashboardFilter>,
) -> ApiResult<Json<Dashboard>> {
    let current = state.current().await;
    let mut dashboard = Dashboard::build(
        &state.registry,
        &current.snapshot,
        Some(&current.evaluations),
    );
    dashboard.cards.retain(|card| filter.matches(card));
    Ok(Json(dashboard))
}

async fn get_evaluations(State(state): State<Arc<AppState>>) -> ApiResult<Json<EvaluationMap>> {
    let current = state.current().await;
    Ok(Json(current.evaluations.clone()))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dashboard", get(get_dashboard))
        .route("/evaluations", get(get_evaluations))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::*;
    use axum::http::StatusCode;

    const CAPTURE: &str = r#"{
        "power": [{"Status": "Failed"}, {"Status": "OK"}],
        "fans": [{"RPM": 9000}],
        "routing": [{"Unreachable": 0}]
    }"#;

    #[tokio::test]
    async fn dashboard_lists_every_category() {
        let (app, state) = router_with(CAPTURE).await;
        let (status, body) = send(app, "GET", "/api/v1/dashboard").await;

        assert_eq!(status, StatusCode::OK);
        let cards = body["cards"].as_array().unwrap();
        assert_eq!(cards.len(), state.registry.len());
        let power = cards.iter().find(|c| c["key"] == "power").unwrap();
        assert_eq!(power["tierLabel"], "严重");
        assert_eq!(power["state"]["state"], "evaluated");
    }

    #[tokio::test]
    async fn dashboard_filters_by_group_and_issues() {
        let (app, _) = router_with(CAPTURE).await;
        let (status, body) =
            send(app, "GET", "/api/v1/dashboard?group=hardware&issuesOnly=true").await;

        assert_eq!(status, StatusCode::OK);
        let cards = body["cards"].as_array().unwrap();
        assert!(cards.iter().all(|c| c["group"] == "hardware"));
        assert!(cards.iter().any(|c| c["key"] == "power"));
        assert!(!cards.iter().any(|c| c["key"] == "fans"));
    }

    #[tokio::test]
    async fn evaluations_cover_present_categories_only() {
        let (app, _) = router_with(CAPTURE).await;
        let (status, body) = send(app, "GET", "/api/v1/evaluations").await;

        assert_eq!(status, StatusCode::OK);
        let keys: Vec<&String> = body.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["fans", "power", "routing"]);
        assert_eq!(body["power"]["status"], "critical");
        assert_eq!(body["power"]["issueCount"], 1);
    }
}
