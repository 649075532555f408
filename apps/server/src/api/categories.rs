use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use fabricscope_core::health::CategoryDefinition;
use fabricscope_core::table::{BrowserState, SortDirection, SortSpec};
use fabricscope_core::{CategoryPage, CategoryPageView};
use serde::{Deserialize, Serialize};

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CategoryGroup<'a> {
    key: &'a str,
    label: &'a str,
    categories: Vec<&'a CategoryDefinition>,
}

/// Registered definitions, grouped in dashboard order.
async fn list_categories(State(state): State<Arc<AppState>>) -> ApiResult<Json<serde_json::Value>> {
    let groups: Vec<CategoryGroup> = state
        .registry
        .groups()
        .iter()
        .map(|group| CategoryGroup {
            key: &group.key,
            label: &group.label,
            categories: state.registry.in_group(&group.key).collect(),
        })
        .filter(|group| !group.categories.is_empty())
        .collect();
    Ok(Json(serde_json::to_value(groups).map_err(anyhow::Error::from)?))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RowsQuery {
    search: Option<String>,
    sort: Option<String>,
    direction: Option<String>,
    page: Option<usize>,
    page_size: Option<usize>,
}

impl RowsQuery {
    fn browser_state(&self) -> ApiResult<BrowserState> {
        let sort = match &self.sort {
            Some(key) if !key.is_empty() => {
                let direction = match self.direction.as_deref() {
                    None | Some("") => SortDirection::Asc,
                    Some(name) => SortDirection::parse(name).ok_or_else(|| {
                        ApiError::BadRequest(format!("Invalid sort direction: {}", name))
                    })?,
                };
                Some(SortSpec::new(key.as_str(), direction))
            }
            _ => None,
        };
        Ok(BrowserState::default()
            .apply_search(self.search.clone().unwrap_or_default())
            .with_sort(sort)
            .apply_page(self.page.unwrap_or(1)))
    }
}

/// One category's rows, classified, searched, sorted and paged.
async fn get_category_rows(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    Query(query): Query<RowsQuery>,
) -> ApiResult<Json<CategoryPageView>> {
    let browser_state = query.browser_state()?;
    let current = state.current().await;

    let definition = state
        .registry
        .get(&key)
        .ok_or_else(|| ApiError::NotFound(format!("Unknown category: {}", key)))?;
    let classifier = state
        .evaluator
        .classifier_for(&key)
        .ok_or_else(|| ApiError::NotFound(format!("Unknown category: {}", key)))?;

    let mut page = CategoryPage::new(
        definition,
        classifier,
        current.snapshot.get(&key),
        query.page_size.unwrap_or(state.page_size),
    );
    if let Some(evaluation) = current.evaluations.get(&key) {
        page = page.with_evaluation(*evaluation);
    }
    Ok(Json(page.with_state(browser_state).view()))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/categories", get(list_categories))
        .route("/categories/{key}/rows", get(get_category_rows))
}
