//! API handlers for the Call Service

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use jnavi_common::{
    call_lines, image_tags, load_catalog, registration_records, CallPolicy, CallText,
    CatalogRequest, Error, RegistrationSelection, TimingFilter,
};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::{
    backend_client::{BackendClient, ImageTagPayload, StoreBackend},
    config::Config,
    models::{
        CallTextRequest, CallTextResponse, CatalogQuery, CatalogResponse, ImageTagRequest,
        ImageTagResponse, SimulationRequest, SimulationResponse, StoreSelectionsResponse,
        SubmissionRequest, SubmissionResponse, UpdateCallsResponse,
    },
};

/// Shared application state
pub struct AppState {
    pub backend: Arc<dyn StoreBackend>,
    pub policy: CallPolicy,
}

impl AppState {
    pub fn new(backend: Arc<dyn StoreBackend>, policy: CallPolicy) -> Self {
        Self { backend, policy }
    }

    /// Build the HTTP backend client and probe it
    pub async fn init(config: &Config) -> anyhow::Result<Self> {
        let client = BackendClient::new(config.backend_url.clone(), config.backend_timeout())?;

        info!("Checking backend health...");
        match client.health_check().await {
            Ok(true) => info!("Backend is healthy"),
            Ok(false) => warn!("Backend returned non-success status"),
            Err(e) => warn!("Failed to connect to backend: {}", e),
        }

        Ok(Self::new(Arc::new(client), config.call_policy()))
    }

    pub fn dispose(&self) {
        info!("Call Service state disposed");
    }
}

/// API Error type
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.message
        });

        (self.status, Json(body)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match &err {
            Error::CatalogUnavailable(_) | Error::Backend(_) => StatusCode::BAD_GATEWAY,
            Error::StoreNotFound(_) => StatusCode::NOT_FOUND,
            Error::EmptySelection | Error::InvalidQuizChoice(_) | Error::InvalidTiming(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::InvalidTransition { .. } => StatusCode::CONFLICT,
        };

        if status.is_server_error() {
            error!("Request failed: {}", err);
        }

        ApiError {
            status,
            message: err.to_string(),
        }
    }
}

/// Health check endpoint
pub async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "call-service"
    }))
}

/// Normalised topping catalog, global or for one shop
pub async fn catalog_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<CatalogResponse>, ApiError> {
    let timing = match query.timing.as_deref() {
        Some(raw) => raw.parse::<TimingFilter>()?,
        None => TimingFilter::All,
    };
    let request = CatalogRequest {
        store_id: query.store_id,
        timing,
    };

    info!(
        "Loading catalog for {} ({})",
        request.store_id.as_deref().unwrap_or("global"),
        timing
    );

    let catalog = load_catalog(state.backend.as_ref(), &request, &state.policy).await?;
    let total = catalog.len();

    Ok(Json(CatalogResponse { catalog, total }))
}

/// Registration form seed for editing a shop
pub async fn store_selections_handler(
    State(state): State<Arc<AppState>>,
    Path(store_id): Path<String>,
) -> Result<Json<StoreSelectionsResponse>, ApiError> {
    info!("Loading registered calls for store: {}", store_id);

    let request = CatalogRequest::global();
    let catalog = load_catalog(state.backend.as_ref(), &request, &state.policy).await?;
    let rows = state.backend.fetch_store_calls(&store_id).await?;
    let selection = RegistrationSelection::seeded(&catalog, &rows);

    Ok(Json(StoreSelectionsResponse {
        store_id,
        catalog,
        selection,
    }))
}

/// Format a registration selection without persisting it
pub async fn submission_handler(
    Json(payload): Json<SubmissionRequest>,
) -> Json<SubmissionResponse> {
    let records = registration_records(&payload.selection);
    let total = records.len();

    Json(SubmissionResponse { records, total })
}

/// Format a registration selection and replace the shop's calls with it
pub async fn update_calls_handler(
    State(state): State<Arc<AppState>>,
    Path(store_id): Path<String>,
    Json(payload): Json<SubmissionRequest>,
) -> Result<Json<UpdateCallsResponse>, ApiError> {
    let records = registration_records(&payload.selection);

    info!("Updating {} calls for store: {}", records.len(), store_id);

    state.backend.update_store_calls(&store_id, &records).await?;

    Ok(Json(UpdateCallsResponse {
        success: true,
        message: format!("Calls updated for store: {}", store_id),
        records,
    }))
}

/// Build the spoken call phrase for one timing
pub async fn call_text_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CallTextRequest>,
) -> Result<Json<CallTextResponse>, ApiError> {
    let request = CatalogRequest {
        store_id: payload.store_id,
        timing: payload.timing.into(),
    };

    let catalog = load_catalog(state.backend.as_ref(), &request, &state.policy).await?;
    let lines = call_lines(&payload.selection, &catalog, &state.policy);
    let call_text = CallText::from(lines.join("\n"));

    info!(
        "Built {} call with {} lines for {}",
        payload.timing,
        lines.len(),
        request.store_id.as_deref().unwrap_or("global")
    );

    Ok(Json(CallTextResponse { call_text, lines }))
}

/// Attach a menu photo to the selected shop calls
pub async fn image_tags_handler(
    State(state): State<Arc<AppState>>,
    Path(store_id): Path<String>,
    Json(payload): Json<ImageTagRequest>,
) -> Result<Json<ImageTagResponse>, ApiError> {
    let request = CatalogRequest::for_store(store_id.clone(), payload.timing.into());
    let catalog = load_catalog(state.backend.as_ref(), &request, &state.policy).await?;

    let image = ImageTagPayload {
        image_url: payload.image_url,
        topping_calls: image_tags(&payload.selection, &catalog),
    };

    info!(
        "Tagging image for store {} with {} calls",
        store_id,
        image.topping_calls.len()
    );

    state.backend.tag_image(&store_id, &image).await?;

    Ok(Json(ImageTagResponse {
        success: true,
        tags: image.topping_calls,
    }))
}

/// Advance the dining simulation by one action
pub async fn simulation_handler(
    Json(payload): Json<SimulationRequest>,
) -> Result<Json<SimulationResponse>, ApiError> {
    let from = payload.state.step;
    let action = payload.action.name();

    let next = payload.state.apply(payload.action)?;

    info!("Simulation {} --{}--> {}", from, action, next.step);

    Ok(Json(next.into()))
}
