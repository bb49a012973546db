//! HTTP request handlers.

use super::types::{
    AddRegistrationRequest, HealthResponse, RegistrationsResponse, RootResponse, SearchQuery,
};
use super::AppState;
use crate::error::ApiError;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use registration_core::{AddRegistrationResponse, AddStatus, RegistrationResult, RegistrationService};
use std::collections::BTreeMap;
use tracing::info;

const SERVICE_NAME: &str = "Registration API";

/// Run a blocking service call on the blocking thread pool.
async fn with_service<T, F>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&RegistrationService) -> RegistrationResult<T> + Send + 'static,
    T: Send + 'static,
{
    let service = state.service.clone();
    Ok(tokio::task::spawn_blocking(move || f(&service)).await??)
}

/// Service information and endpoint map.
pub async fn root() -> Json<RootResponse> {
    let endpoints = BTreeMap::from([
        ("add_registration", "POST /add_registration"),
        ("get_all_registrations", "GET /get_all_registrations"),
        ("search_registrations", "GET /search_registrations?query="),
        ("health", "GET /health"),
    ]);

    Json(RootResponse {
        message: SERVICE_NAME.to_string(),
        endpoints,
    })
}

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let registrations = with_service(&state, |service| service.store().count()).await?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        registrations,
    }))
}

/// Validate and store a registration.
///
/// Rejections keep the structured body and only change the status code.
pub async fn add_registration(
    State(state): State<AppState>,
    Json(request): Json<AddRegistrationRequest>,
) -> Result<(StatusCode, Json<AddRegistrationResponse>), ApiError> {
    info!("Registration request received");

    let response = with_service(&state, move |service| {
        service.add_registration(&request.name, &request.email, &request.dob)
    })
    .await?;

    let status = match response.status {
        AddStatus::Success => StatusCode::OK,
        AddStatus::Duplicate => StatusCode::CONFLICT,
        AddStatus::Invalid => StatusCode::BAD_REQUEST,
    };

    Ok((status, Json(response)))
}

/// List every registration in insertion order.
pub async fn get_all_registrations(
    State(state): State<AppState>,
) -> Result<Json<RegistrationsResponse>, ApiError> {
    let records = with_service(&state, |service| service.get_all_registrations()).await?;
    Ok(Json(records.into()))
}

/// Search registrations by name or email.
pub async fn search_registrations(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<RegistrationsResponse>, ApiError> {
    let records = with_service(&state, move |service| {
        service.search_registrations(&params.query)
    })
    .await?;
    Ok(Json(records.into()))
}
