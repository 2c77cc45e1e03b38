use axum::{
    routing::{get, post},
    Router,
    extract::{rejection::JsonRejection, Json, State},
    response::{IntoResponse, Response},
};
use tower_http::cors::{CorsLayer, Any};
use chrono::Utc;

use crate::error::{AppError, Result};
use crate::api::models::{
    AnalyzeRequest, AnalyzeResponse, CategoryInfo, HealthResponse, SessionResponse,
    SubmitUrlRequest, SwitchCategoryRequest,
};
use crate::api::response;
use crate::models::AnalysisCategory;
use crate::report::AnalysisReport;
use crate::session::PendingAnalysis;
use crate::url_input::validate_url;
use crate::validator::trend_gaps;
use crate::AppState;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/categories", get(categories_handler))
        .route("/api/analyze", post(analyze_handler))
        .route("/api/session", get(session_handler))
        .route("/api/session/url", post(submit_url_handler))
        .route("/api/session/category", post(switch_category_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

async fn health_handler() -> impl IntoResponse {
    response::success(HealthResponse { status: "ok" })
}

async fn categories_handler() -> impl IntoResponse {
    let categories: Vec<CategoryInfo> = AnalysisCategory::ALL
        .into_iter()
        .map(|id| CategoryInfo { id, label: id.label() })
        .collect();
    response::success(categories)
}

/// One-shot analysis that leaves the shared session untouched.
async fn analyze_handler(
    State(state): State<AppState>,
    body: std::result::Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(req) = body?;
    let url = validate_url(&req.url)?;
    let category = match req.category.as_deref() {
        Some(raw) => raw.parse::<AnalysisCategory>()?,
        None => AnalysisCategory::default(),
    };

    tracing::info!(%url, %category, "processing analysis request");
    let start_time = std::time::Instant::now();

    let result = state.analyzer.analyze(&url, category).await?;

    tracing::info!(%url, %category, elapsed = ?start_time.elapsed(), metrics = result.metrics.len(), "analysis complete");

    Ok(response::success(AnalyzeResponse {
        report: AnalysisReport::build(category, &result),
        trend_gaps: trend_gaps(&result, category),
        url,
        category,
        analyzed_at: Utc::now(),
        result,
    }))
}

async fn session_handler(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.session.lock().snapshot();
    response::success(SessionResponse {
        ticket: None,
        superseded: false,
        session: snapshot,
    })
}

async fn submit_url_handler(
    State(state): State<AppState>,
    body: std::result::Result<Json<SubmitUrlRequest>, JsonRejection>,
) -> Response {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => return AppError::from(rejection).into_response(),
    };
    let submitted = state.session.lock().submit_url(&req.url);
    match submitted {
        Ok(pending) => run_pending(&state, pending).await,
        Err(err) => err.into_response(),
    }
}

async fn switch_category_handler(
    State(state): State<AppState>,
    body: std::result::Result<Json<SwitchCategoryRequest>, JsonRejection>,
) -> Response {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => return AppError::from(rejection).into_response(),
    };
    let category = match req.category.parse::<AnalysisCategory>() {
        Ok(category) => category,
        Err(err) => return err.into_response(),
    };

    let pending = state.session.lock().switch_category(category);
    match pending {
        Some(pending) => run_pending(&state, pending).await,
        None => {
            let snapshot = state.session.lock().snapshot();
            response::success(SessionResponse {
                ticket: None,
                superseded: false,
                session: snapshot,
            })
            .into_response()
        }
    }
}

/// Runs a session request and publishes its outcome unless a newer one was issued meanwhile.
async fn run_pending(state: &AppState, pending: PendingAnalysis) -> Response {
    let outcome = state.analyzer.analyze(&pending.url, pending.category).await;
    let failure_status = outcome.as_ref().err().map(AppError::status_code);

    let (applied, snapshot) = {
        let mut session = state.session.lock();
        let applied = session.complete(&pending, outcome);
        (applied, session.snapshot())
    };

    if !applied {
        tracing::info!(url = %pending.url, category = %pending.category, "analysis superseded by a newer request");
    }

    match failure_status {
        Some(status) if applied => {
            let message = snapshot.error.clone().unwrap_or_default();
            response::error::<()>(status, message).into_response()
        }
        _ => response::success(SessionResponse {
            ticket: Some(pending.ticket),
            superseded: !applied,
            session: snapshot,
        })
        .into_response(),
    }
}
