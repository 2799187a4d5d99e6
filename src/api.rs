use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::{DEFAULT_MIN_WASTE_SIZE, PlannerConfig};
use crate::error::PlanError;
use crate::solver::Solver;
use crate::summary::PlanSummary;
use crate::types::{CutRequest, SheetResult, SortStrategy, StockSpec, validate_input};

#[derive(Deserialize, Serialize)]
pub struct OptimizeRequest {
    pub stock: StockSpec,
    pub cuts: Vec<CutRequest>,
    #[serde(default = "default_true")]
    pub allow_rotation: bool,
    #[serde(default = "default_min_waste_size")]
    pub min_waste_size: f64,
}

fn default_true() -> bool {
    true
}

fn default_min_waste_size() -> f64 {
    DEFAULT_MIN_WASTE_SIZE
}

#[derive(Serialize, Deserialize)]
pub struct OptimizeResponse {
    pub strategy: SortStrategy,
    pub sheets: Vec<SheetResult>,
    pub sheet_count: usize,
    pub aggregate_efficiency: f64,
    pub exceeds_supply: bool,
    pub summary: PlanSummary,
}

fn status_for(err: &PlanError) -> StatusCode {
    match err {
        PlanError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        PlanError::UnplaceablePiece { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        PlanError::InvariantViolation(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn reject(err: PlanError) -> (StatusCode, String) {
    (status_for(&err), err.to_string())
}

async fn optimize(
    Json(req): Json<OptimizeRequest>,
) -> Result<Json<OptimizeResponse>, (StatusCode, String)> {
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /optimize"
    );

    validate_input(&req.stock, &req.cuts).map_err(reject)?;
    if req.min_waste_size.is_nan() || req.min_waste_size < 0.0 {
        return Err(reject(PlanError::InvalidInput(
            "min_waste_size must be non-negative".to_string(),
        )));
    }

    let config = PlannerConfig {
        allow_rotation: req.allow_rotation,
        min_waste_size: req.min_waste_size,
        ..PlannerConfig::default()
    };
    let plan = Solver::new(req.stock, req.cuts, config)
        .solve()
        .map_err(|err| {
            tracing::warn!(error = %err, "optimization failed");
            reject(err)
        })?;

    let summary = PlanSummary::from_sheets(&plan.sheets);

    Ok(Json(OptimizeResponse {
        strategy: plan.strategy,
        sheet_count: plan.sheet_count(),
        aggregate_efficiency: plan.aggregate_efficiency(),
        exceeds_supply: plan.exceeds_supply(),
        sheets: plan.sheets,
        summary,
    }))
}

pub fn router() -> Router {
    Router::new()
        .route("/up", get(|| async { "ok" }))
        .route("/optimize", post(optimize))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn post_json(body: &str) -> (StatusCode, Vec<u8>) {
        let response = router()
            .oneshot(
                Request::post("/optimize")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn test_up() {
        let response = router()
            .oneshot(Request::get("/up").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_optimize_returns_plan() {
        let (status, body) = post_json(
            r#"{
                "stock": {"width": 100, "height": 50, "quantity": 1},
                "cuts": [
                    {"width": 60, "height": 40, "quantity": 1},
                    {"width": 40, "height": 50, "quantity": 1.0}
                ]
            }"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let resp: OptimizeResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(resp.sheet_count, 1);
        assert_eq!(resp.sheets[0].cuts.len(), 2);
        assert!(!resp.exceeds_supply);
        assert_eq!(resp.summary.sheet_count, 1);
    }

    #[tokio::test]
    async fn test_optimize_rejects_zero_quantity() {
        let (status, body) = post_json(
            r#"{"stock": {"width": 100, "height": 100}, "cuts": [{"width": 10, "height": 10, "quantity": 0}]}"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(String::from_utf8(body).unwrap().contains("quantity"));
    }

    #[tokio::test]
    async fn test_optimize_reports_unplaceable_piece() {
        let (status, body) = post_json(
            r#"{"stock": {"width": 100, "height": 100}, "cuts": [{"width": 150, "height": 50, "quantity": 1}]}"#,
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(String::from_utf8(body).unwrap().contains("150x50"));
    }
}
