//! HTTP surface: DTOs, router and handlers.

use crate::error::ReadmeError;
use crate::graphics::{banner_options, BannerConfig};
use crate::orchestrator::{GenerateRequest, ReadmeService};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Json, Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

const SERVICE_NAME: &str = "readmesmith";

/// Request payload for README generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadmeRequest {
    /// Repository name
    pub repo_name: String,
    /// Repository owner
    pub owner_name: String,
    /// Banner options; defaults apply when omitted
    #[serde(default)]
    pub banner_config: Option<BannerConfig>,
    /// Writing tone
    #[serde(default)]
    pub tone: Option<String>,
}

impl From<ReadmeRequest> for GenerateRequest {
    fn from(request: ReadmeRequest) -> Self {
        Self {
            owner: request.owner_name,
            repo: request.repo_name,
            banner_config: request.banner_config.unwrap_or_default(),
            tone: request.tone,
        }
    }
}

/// Query parameters of the banner preview endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreviewQuery {
    /// Font key
    pub font: Option<String>,
    /// Theme key
    pub theme: Option<String>,
    /// Header style key
    pub style: Option<String>,
    /// Title shown instead of the repository name
    pub custom_title: Option<String>,
}

impl From<PreviewQuery> for BannerConfig {
    fn from(query: PreviewQuery) -> Self {
        let defaults = BannerConfig::default();
        Self {
            include_banner: true,
            font: query.font.unwrap_or(defaults.font),
            theme: query.theme.unwrap_or(defaults.theme),
            style: query.style.unwrap_or(defaults.style),
            custom_title: query.custom_title,
        }
    }
}

/// Envelope around every data endpoint's response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request succeeded
    pub success: bool,
    /// Payload on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error message on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Successful response wrapping `data`
    pub fn ok(data: T) -> ResponseJson<Self> {
        ResponseJson(Self { success: true, data: Some(data), error: None })
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service name
    pub service: String,
    /// Service version
    pub version: String,
    /// Current status
    pub status: String,
    /// Current timestamp
    pub timestamp: DateTime<Utc>,
    /// Service uptime in seconds
    pub uptime: u64,
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    service: Arc<ReadmeService>,
    started_at: DateTime<Utc>,
}

impl AppState {
    /// State for a freshly started server
    pub fn new(service: Arc<ReadmeService>) -> Self {
        Self { service, started_at: Utc::now() }
    }

    fn health(&self) -> HealthResponse {
        HealthResponse {
            service: SERVICE_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            status: "healthy".to_string(),
            timestamp: Utc::now(),
            uptime: (Utc::now() - self.started_at).num_seconds().max(0) as u64,
        }
    }
}

/// Error returned by handlers; only the display message reaches the client
#[derive(Debug)]
pub struct ApiError(ReadmeError);

impl From<ReadmeError> for ApiError {
    fn from(err: ReadmeError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(ReadmeError::Validation(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self(ReadmeError::Validation(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(ReadmeError::Validation(rejection.body_text()))
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.0 {
            ReadmeError::Validation(_) => StatusCode::BAD_REQUEST,
            ReadmeError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        }
        let body = ApiResponse::<()> { success: false, data: None, error: Some(self.0.to_string()) };
        (status, ResponseJson(body)).into_response()
    }
}

type ApiResult = Result<ResponseJson<ApiResponse<Value>>, ApiError>;

/// Builds the router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/generate-readme", post(generate_readme))
        .route("/files", get(list_files))
        .route("/files/:name", get(get_file).delete(delete_file))
        .route("/banner-preview/:owner/:repo", get(banner_preview))
        .route("/banner-options", get(get_banner_options))
        .route("/models", get(models))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Root endpoint - returns basic service information
async fn index() -> ResponseJson<Value> {
    ResponseJson(json!({
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Generate README files for GitHub repositories",
        "endpoints": {
            "generate": "POST /generate-readme",
            "files": "GET /files",
            "file": "GET|DELETE /files/:name",
            "banner_preview": "GET /banner-preview/:owner/:repo",
            "banner_options": "GET /banner-options",
            "models": "GET /models",
            "health": "GET /health"
        }
    }))
}

async fn health_check(State(state): State<AppState>) -> ResponseJson<HealthResponse> {
    ResponseJson(state.health())
}

async fn generate_readme(
    State(state): State<AppState>,
    payload: Result<Json<ReadmeRequest>, JsonRejection>,
) -> ApiResult {
    let Json(request) = payload?;
    info!("README requested for {}/{}", request.owner_name, request.repo_name);
    let generated = state.service.generate(request.into()).await?;
    Ok(ApiResponse::ok(json!(generated)))
}

async fn list_files(State(state): State<AppState>) -> ApiResult {
    let files = state.service.store().list().await?;
    Ok(ApiResponse::ok(json!({
        "total_files": files.len(),
        "files": files,
    })))
}

async fn get_file(
    State(state): State<AppState>,
    name: Result<Path<String>, PathRejection>,
) -> ApiResult {
    let Path(name) = name?;
    let store = state.service.store();
    let content = store.read(&name).await?;
    let file_info = store.info(&name).await?;
    Ok(ApiResponse::ok(json!({
        "content": content,
        "file_info": file_info,
    })))
}

async fn delete_file(
    State(state): State<AppState>,
    name: Result<Path<String>, PathRejection>,
) -> ApiResult {
    let Path(name) = name?;
    state.service.store().delete(&name).await?;
    Ok(ApiResponse::ok(json!({ "message": format!("Deleted {}", name) })))
}

async fn banner_preview(
    State(state): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
    query: Result<Query<PreviewQuery>, QueryRejection>,
) -> ApiResult {
    let Path((owner, repo)) = path?;
    let Query(query) = query?;
    let preview = state.service.preview_banners(&owner, &repo, &query.into()).await?;
    Ok(ApiResponse::ok(json!(preview)))
}

async fn get_banner_options() -> ApiResult {
    Ok(ApiResponse::ok(json!(banner_options())))
}

async fn models(State(state): State<AppState>) -> ApiResult {
    Ok(ApiResponse::ok(json!({
        "current_model": state.service.model_name(),
        "supported_models": state.service.supported_models(),
    })))
}
