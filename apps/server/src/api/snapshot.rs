use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReloadSummary {
    captured_at: Option<DateTime<Utc>>,
    categories: usize,
    evaluated: usize,
    with_issues: usize,
}

/// Re-reads the snapshot file and re-runs the evaluator.
async fn reload_snapshot(State(state): State<Arc<AppState>>) -> ApiResult<Json<ReloadSummary>> {
    if state.snapshot_path.is_none() {
        return Err(ApiError::BadRequest(
            "No snapshot path configured (FS_SNAPSHOT_PATH)".to_string(),
        ));
    }
    let current = state.reload().await?;
    Ok(Json(ReloadSummary {
        captured_at: current.snapshot.captured_at,
        categories: current.snapshot.len(),
        evaluated: current.evaluations.len(),
        with_issues: current
            .evaluations
            .values()
            .filter(|evaluation| !evaluation.is_healthy())
            .count(),
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/snapshot/reload", post(reload_snapshot))
}
