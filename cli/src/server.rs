//! HTTP API over the prediction store
//!
//! Read endpoints open the store per request on a blocking thread. The run
//! trigger is serialized by one async mutex: a second trigger waits for the
//! first to finish, then runs on fresh inputs.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, Query, Request, State};
use axum::http::header::{HeaderName, HeaderValue};
use axum::http::{Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use promotion_projection_core::loader::LoadError;
use promotion_projection_core::models::event::iso_date;
use promotion_projection_core::orchestrator::{ProjectionError, RunManifest};
use promotion_projection_core::persistence::{PersistenceError, PredictionStore};
use promotion_projection_core::reports::{
    self, EmployeeSummary, GradePath, PredictionStep, PromotionReport, YearlyCount,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::pipeline::{run_and_persist, PipelineError, Sources};

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    InvalidQuery,
    InvalidInput,
    InternalError,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    fn new(
        status: StatusCode,
        code: ErrorCode,
        message: impl Into<String>,
        details: Option<String>,
    ) -> Self {
        Self {
            status,
            body: ErrorBody {
                code,
                message: message.into(),
                details,
            },
        }
    }

    fn not_found(message: impl Into<String>, details: Option<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, ErrorCode::NotFound, message, details)
    }

    fn invalid_query(message: impl Into<String>, details: Option<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ErrorCode::InvalidQuery, message, details)
    }

    fn internal(message: impl Into<String>, details: Option<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::InternalError, message, details)
    }

    fn from_persistence(err: PersistenceError) -> Self {
        Self::internal("prediction store operation failed", Some(err.to_string()))
    }

    fn from_pipeline(err: PipelineError) -> Self {
        match err {
            PipelineError::Load(LoadError::Io { path, source }) => Self::not_found(
                "input file could not be opened",
                Some(format!("path={} error={source}", path.display())),
            ),
            PipelineError::Load(other) => Self::new(
                StatusCode::CONFLICT,
                ErrorCode::InvalidInput,
                "input file could not be read",
                Some(other.to_string()),
            ),
            PipelineError::Projection(ProjectionError::Catalog(catalog)) => Self::new(
                StatusCode::CONFLICT,
                ErrorCode::InvalidInput,
                "post catalog is inconsistent",
                Some(catalog.to_string()),
            ),
            PipelineError::Projection(other) => {
                Self::internal("projection failed", Some(other.to_string()))
            }
            PipelineError::Persistence(other) => Self::from_persistence(other),
        }
    }

    #[cfg(test)]
    fn status(&self) -> StatusCode {
        self.status
    }

    #[cfg(test)]
    fn code(&self) -> ErrorCode {
        self.body.code
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorEnvelope { error: self.body })).into_response()
    }
}

// ============================================================================
// State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    sources: Arc<Sources>,
    run_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(sources: Sources) -> Self {
        Self {
            sources: Arc::new(sources),
            run_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Run a read against a freshly opened store on a blocking thread
    async fn read<T, F>(&self, query: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&PredictionStore) -> Result<T, PersistenceError> + Send + 'static,
    {
        let sources = Arc::clone(&self.sources);
        tokio::task::spawn_blocking(move || {
            let store = sources.open_store()?;
            query(&store)
        })
        .await
        .map_err(|join| ApiError::internal("store task failed", Some(join.to_string())))?
        .map_err(ApiError::from_persistence)
    }
}

// ============================================================================
// Router
// ============================================================================

pub async fn serve(addr: SocketAddr, sources: Sources) -> std::io::Result<()> {
    let app = router(AppState::new(sources));

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "serving promotion projection API");
    axum::serve(listener, app).await
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/api/employees", get(list_employees))
        .route("/api/employees/overview", get(employees_overview))
        .route("/api/employees/{id}", get(get_employee))
        .route("/api/predictions/{emp_id}", get(get_predictions))
        .route("/api/report/{emp_id}", get(get_report))
        .route("/api/reports/promotions-per-year", get(promotions_per_year))
        .route("/api/simulation/latest", get(latest_run))
        .route("/api/simulation/run", post(run_simulation))
        .layer(middleware::from_fn(cors_middleware))
        .with_state(state)
}

async fn cors_middleware(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        let mut response = Response::new(axum::body::Body::empty());
        *response.status_mut() = StatusCode::NO_CONTENT;
        apply_cors_headers(response.headers_mut());
        return response;
    }

    let mut response = next.run(request).await;
    apply_cors_headers(response.headers_mut());
    response
}

fn apply_cors_headers(headers: &mut axum::http::HeaderMap) {
    headers.insert(
        HeaderName::from_static("access-control-allow-origin"),
        HeaderValue::from_static("*"),
    );
    headers.insert(
        HeaderName::from_static("access-control-allow-methods"),
        HeaderValue::from_static("GET,POST,OPTIONS"),
    );
    headers.insert(
        HeaderName::from_static("access-control-allow-headers"),
        HeaderValue::from_static("*"),
    );
}

// ============================================================================
// Handlers
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportParams {
    pub date: Option<String>,
}

/// One prediction step as served, tagged with its employee
#[derive(Debug, Clone, Serialize)]
pub struct PredictionView {
    #[serde(flatten)]
    pub step: PredictionStep,
    pub emp_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictionsResponse {
    pub employee_id: String,
    pub predictions: Vec<PredictionView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunResponse {
    pub message: String,
    pub run: RunManifest,
}

async fn health() -> &'static str {
    "Promotion projection API is running"
}

pub async fn list_employees(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<EmployeeSummary>>, ApiError> {
    let query = params.q.unwrap_or_default();
    let events = state.read(move |store| store.search_events(query.trim())).await?;
    Ok(Json(reports::employee_summaries(&events)))
}

pub async fn employees_overview(
    State(state): State<AppState>,
) -> Result<Json<Vec<GradePath>>, ApiError> {
    let events = state.read(|store| store.all_events()).await?;
    Ok(Json(reports::grade_paths(&events)))
}

pub async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EmployeeSummary>, ApiError> {
    let lookup = id.clone();
    let events = state.read(move |store| store.events_for(&lookup)).await?;
    reports::employee_summary(&events, &id)
        .map(Json)
        .ok_or_else(|| {
            ApiError::not_found("employee has no predictions", Some(format!("emp_id={id}")))
        })
}

pub async fn get_predictions(
    State(state): State<AppState>,
    Path(emp_id): Path<String>,
) -> Result<Json<PredictionsResponse>, ApiError> {
    let lookup = emp_id.clone();
    let events = state.read(move |store| store.events_for(&lookup)).await?;
    let name = events.first().map(|e| e.name.clone()).unwrap_or_default();

    let predictions = reports::prediction_steps(&events, &emp_id)
        .into_iter()
        .map(|step| PredictionView {
            step,
            emp_id: emp_id.clone(),
            name: name.clone(),
        })
        .collect();

    Ok(Json(PredictionsResponse {
        employee_id: emp_id,
        predictions,
    }))
}

pub async fn get_report(
    State(state): State<AppState>,
    Path(emp_id): Path<String>,
    Query(params): Query<ReportParams>,
) -> Result<Json<PromotionReport>, ApiError> {
    let target_date = params
        .date
        .as_deref()
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| {
            NaiveDate::parse_from_str(raw.trim(), iso_date::FORMAT).map_err(|_| {
                ApiError::invalid_query("date must be YYYY-MM-DD", Some(format!("date={raw}")))
            })
        })
        .transpose()?;

    let lookup = emp_id.clone();
    let events = state.read(move |store| store.events_for(&lookup)).await?;
    Ok(Json(reports::promotion_report(&events, &emp_id, target_date)))
}

pub async fn promotions_per_year(
    State(state): State<AppState>,
) -> Result<Json<Vec<YearlyCount>>, ApiError> {
    let counts = state.read(|store| store.promotions_per_year()).await?;
    Ok(Json(counts))
}

pub async fn latest_run(State(state): State<AppState>) -> Result<Json<RunManifest>, ApiError> {
    state
        .read(|store| store.latest_run())
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("no projection has been run yet", None))
}

pub async fn run_simulation(State(state): State<AppState>) -> Result<Json<RunResponse>, ApiError> {
    let _guard = state.run_lock.lock().await;

    let sources = Arc::clone(&state.sources);
    let outcome = tokio::task::spawn_blocking(move || run_and_persist(&sources))
        .await
        .map_err(|join| ApiError::internal("projection task failed", Some(join.to_string())))?
        .map_err(|err| {
            error!(error = %err, "projection run failed");
            ApiError::from_pipeline(err)
        })?;

    Ok(Json(RunResponse {
        message: format!(
            "Projection completed: {} events ({} promotions, {} retirements)",
            outcome.manifest.num_events,
            outcome.manifest.num_promotions,
            outcome.manifest.num_retirements
        ),
        run: outcome.manifest,
    }))
}
