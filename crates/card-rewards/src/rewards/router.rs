use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use super::format::{format_as_dollars, BenefitTableView, CategoryBestView, OptimizedCardView};
use super::optimizer::MonthlySpendingProfile;
use super::selection::{SelectionInput, SelectionState};
use super::service::RewardsExplorer;

/// Router builder exposing the explorer over JSON.
pub fn rewards_router(explorer: Arc<RewardsExplorer>) -> Router {
    Router::new()
        .route("/api/v1/cards", get(cards_handler))
        .route("/api/v1/cards/selectable", post(selectable_handler))
        .route("/api/v1/rewards/best", post(best_handler))
        .route("/api/v1/rewards/optimize", post(optimize_handler))
        .with_state(explorer)
}

#[derive(Debug, Default, Deserialize)]
pub struct SelectableRequest {
    #[serde(default)]
    pub chosen: SelectionInput,
}

#[derive(Debug, Serialize)]
pub struct SelectableResponse {
    pub options: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct BestRequest {
    pub selected: SelectionInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BestStatus {
    Ok,
    NoSelection,
}

#[derive(Debug, Serialize)]
pub struct BestResponse {
    pub status: BestStatus,
    pub results: Option<Vec<CategoryBestView>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OptimizeRequest {
    #[serde(default)]
    pub spending: Option<MonthlySpendingProfile>,
}

#[derive(Debug, Serialize)]
pub struct OptimizeResponse {
    pub total_monthly_spend: f64,
    pub total_monthly_spend_label: String,
    pub cards: Vec<OptimizedCardView>,
}

pub(crate) async fn cards_handler(
    State(explorer): State<Arc<RewardsExplorer>>,
) -> Json<BenefitTableView> {
    Json(explorer.table_view())
}

pub(crate) async fn selectable_handler(
    State(explorer): State<Arc<RewardsExplorer>>,
    Json(request): Json<SelectableRequest>,
) -> Json<SelectableResponse> {
    Json(SelectableResponse {
        options: explorer.selectable(request.chosen),
    })
}

pub(crate) async fn best_handler(
    State(explorer): State<Arc<RewardsExplorer>>,
    Json(request): Json<BestRequest>,
) -> Response {
    let state = match SelectionState::new(request.selected.into_vec()) {
        Ok(state) => state,
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
        }
    };

    let response = match explorer.best_by_category(state.selected().to_vec()) {
        Some(results) => BestResponse {
            status: BestStatus::Ok,
            results: Some(results.iter().map(CategoryBestView::from).collect()),
        },
        None => BestResponse {
            status: BestStatus::NoSelection,
            results: None,
        },
    };
    debug!(status = ?response.status, "best-by-category computed");

    (StatusCode::OK, Json(response)).into_response()
}

pub(crate) async fn optimize_handler(
    State(explorer): State<Arc<RewardsExplorer>>,
    Json(request): Json<OptimizeRequest>,
) -> Response {
    let spending = request
        .spending
        .unwrap_or_else(|| explorer.settings().optimizer.default_spending().clone());

    match explorer.optimize(Some(&spending)) {
        Ok(cards) => {
            let total = spending.total();
            let body = OptimizeResponse {
                total_monthly_spend: total,
                total_monthly_spend_label: format_as_dollars(total),
                cards: cards.iter().map(OptimizedCardView::from).collect(),
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewards::service::ExplorerSettings;
    use crate::rewards::table::{BenefitTable, TableLayout};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn app() -> Router {
        let table = BenefitTable::from_json_str(
            r#"[
                {"Card": "A", "Bank": "X", "Default": 1, "Gas": 5},
                {"Card": "B", "Bank": "Y", "Default": 3, "Gas": 2}
            ]"#,
            &TableLayout::default(),
        )
        .expect("table loads");
        rewards_router(Arc::new(RewardsExplorer::new(
            Arc::new(table),
            ExplorerSettings::default(),
        )))
    }

    async fn post_json(app: Router, uri: &str, body: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        let value = serde_json::from_slice(&bytes).expect("json body");
        (status, value)
    }

    #[tokio::test]
    async fn best_endpoint_reports_winners() {
        let (status, body) =
            post_json(app(), "/api/v1/rewards/best", r#"{"selected": ["A", "B"]}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["results"][0]["best_card"], "A");
        assert_eq!(body["results"][0]["max_benefit_label"], "5%");
    }

    #[tokio::test]
    async fn best_endpoint_signals_no_selection() {
        let (status, body) = post_json(
            app(),
            "/api/v1/rewards/best",
            r#"{"selected": ["None", "None", "None"]}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "no_selection");
        assert!(body["results"].is_null());
    }

    #[tokio::test]
    async fn best_endpoint_rejects_more_than_three_cards() {
        let (status, body) = post_json(
            app(),
            "/api/v1/rewards/best",
            r#"{"selected": ["A", "B", "None", "None"]}"#,
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().is_some());
    }

    #[tokio::test]
    async fn selectable_endpoint_accepts_a_scalar() {
        let (status, body) =
            post_json(app(), "/api/v1/cards/selectable", r#"{"chosen": "A"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["options"], json!(["None", "B"]));
    }

    #[tokio::test]
    async fn optimize_endpoint_ranks_and_formats() {
        let (status, body) = post_json(
            app(),
            "/api/v1/rewards/optimize",
            r#"{"spending": {"Gas": 100}}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_monthly_spend_label"], "$100");
        assert_eq!(body["cards"][0]["card"], "A");
        assert_eq!(body["cards"][0]["monthly_value_label"], "$5");
        assert_eq!(body["cards"][0]["annual_value_label"], "$60");
        assert_eq!(body["cards"][0]["pct_savings_label"], "5.00%");
    }

    #[tokio::test]
    async fn optimize_endpoint_rejects_negative_spend() {
        let (status, _) = post_json(
            app(),
            "/api/v1/rewards/optimize",
            r#"{"spending": {"Gas": -1}}"#,
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn cards_endpoint_lists_the_table() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/cards")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(body["categories"], json!(["Gas"]));
        assert_eq!(body["cards"][1]["default_rate"], "3%");
    }
}
