use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use server_api::{create_disease, delete_disease, list_diseases, update_disease, ApiContext};
use shared::{
    domain::{Disease, DiseaseDraft, DiseaseId},
    error::{ApiError, ErrorCode},
    protocol::{DiseaseListResponse, MutationResponse, DISEASES_ROUTE},
};
use storage::Storage;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod config;

use config::{load_settings, normalize_database_url};

#[derive(Clone)]
struct AppState {
    api: ApiContext,
}

type HttpResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = load_settings();
    let database_url = normalize_database_url(&settings.database_url);
    let storage = Storage::new(&database_url).await.map_err(|error| {
        error!(
            %database_url,
            %error,
            "failed to open SQLite database; verify the path is writable"
        );
        error
    })?;
    let state = AppState {
        api: ApiContext { storage },
    };
    let app = build_router(Arc::new(state), settings.max_body_bytes);

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(
            DISEASES_ROUTE,
            get(http_list_diseases).post(http_create_disease),
        )
        .route(
            &format!("{DISEASES_ROUTE}/:disease_id"),
            put(http_update_disease).delete(http_delete_disease),
        )
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn healthz(State(state): State<Arc<AppState>>) -> (StatusCode, &'static str) {
    match state.api.storage.health_check().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(error) => {
            warn!(%error, "health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    }
}

async fn http_list_diseases(
    State(state): State<Arc<AppState>>,
) -> HttpResult<Json<DiseaseListResponse>> {
    let diseases = list_diseases(&state.api).await.map_err(into_http)?;
    Ok(Json(diseases))
}

async fn http_create_disease(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<DiseaseDraft>,
) -> HttpResult<(StatusCode, Json<Disease>)> {
    let disease = create_disease(&state.api, &draft)
        .await
        .map_err(into_http)?;
    Ok((StatusCode::CREATED, Json(disease)))
}

async fn http_update_disease(
    State(state): State<Arc<AppState>>,
    Path(disease_id): Path<i64>,
    Json(draft): Json<DiseaseDraft>,
) -> HttpResult<Json<MutationResponse>> {
    let response = update_disease(&state.api, DiseaseId(disease_id), &draft)
        .await
        .map_err(into_http)?;
    Ok(Json(response))
}

async fn http_delete_disease(
    State(state): State<Arc<AppState>>,
    Path(disease_id): Path<i64>,
) -> HttpResult<Json<MutationResponse>> {
    let response = delete_disease(&state.api, DiseaseId(disease_id))
        .await
        .map_err(into_http)?;
    Ok(Json(response))
}

fn into_http(err: ApiError) -> (StatusCode, Json<ApiError>) {
    let status = match err.code {
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Internal => {
            error!(error = %err.message, "disease api internal failure");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(err))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
