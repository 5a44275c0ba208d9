//! Handlers de Insurances
//!
//! CRUD de pólizas y listado de las que vencen en los próximos 31 días.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    middleware::auth::AuthenticatedUser,
    models::insurance::{CreateInsuranceRequest, Insurance, InsuranceFilters},
    models::pagination::{resolve_page, Page},
    repositories::insurance_repository::InsuranceRepository,
    services::scope_service::insurance_scope,
    services::validation_service::{validate_obj_reference, ReferencedEntity},
    state::AppState,
    utils::errors::{not_found_error, AppError, AppResult},
};

/// Crear el router de insurances
pub fn create_insurances_router() -> Router<AppState> {
    Router::new()
        .route("/insurances", get(list_insurances).post(create_insurance))
        .route("/insurances/finishing", get(list_finishing_insurances))
        .route(
            "/insurances/:insurance_id",
            get(retrieve_insurance)
                .put(update_insurance)
                .delete(delete_insurance),
        )
}

async fn validate_insurance_references(
    state: &AppState,
    insurance: &CreateInsuranceRequest,
) -> Result<(), AppError> {
    let payload = serde_json::to_value(insurance)
        .map_err(|e| AppError::Internal(format!("Error serializando payload: {}", e)))?;

    validate_obj_reference(
        &state.pool,
        ReferencedEntity::Vehicle,
        Some(insurance.vehicle_id),
        &payload,
    )
    .await?;
    validate_obj_reference(
        &state.pool,
        ReferencedEntity::Document,
        Some(insurance.document_id),
        &payload,
    )
    .await?;
    validate_obj_reference(
        &state.pool,
        ReferencedEntity::Company,
        Some(insurance.company_id),
        &payload,
    )
    .await?;

    Ok(())
}

/// Listar las pólizas visibles para el usuario
pub async fn list_insurances(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Query(filters): Query<InsuranceFilters>,
) -> AppResult<Json<Page<Insurance>>> {
    let (page, size, offset) = resolve_page(filters.page, filters.size);
    let scope = insurance_scope(&user);

    let (insurances, total) = InsuranceRepository::new(state.pool.clone())
        .list(
            &scope,
            filters.vehicle_id,
            filters.document_id,
            filters.company_id,
            size,
            offset,
        )
        .await?;

    Ok(Json(Page::new(insurances, total, page, size)))
}

/// Listar las pólizas que vencen en los próximos 31 días
pub async fn list_finishing_insurances(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Query(filters): Query<InsuranceFilters>,
) -> AppResult<Json<Page<Insurance>>> {
    let (page, size, offset) = resolve_page(filters.page, filters.size);
    let scope = insurance_scope(&user);

    let (insurances, total) = InsuranceRepository::new(state.pool.clone())
        .list_finishing(&scope, Utc::now(), size, offset)
        .await?;

    Ok(Json(Page::new(insurances, total, page, size)))
}

/// Crear una nueva póliza
pub async fn create_insurance(
    Extension(_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Json(insurance): Json<CreateInsuranceRequest>,
) -> AppResult<(StatusCode, Json<Insurance>)> {
    insurance.validate()?;
    validate_insurance_references(&state, &insurance).await?;

    let created = InsuranceRepository::new(state.pool.clone())
        .insert(&insurance)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Obtener una póliza por ID
pub async fn retrieve_insurance(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(insurance_id): Path<i64>,
) -> AppResult<Json<Insurance>> {
    let scope = insurance_scope(&user);
    let insurance = InsuranceRepository::new(state.pool.clone())
        .find_scoped(&scope, insurance_id)
        .await?
        .ok_or_else(|| not_found_error("Insurance"))?;

    Ok(Json(insurance))
}

/// Actualizar una póliza existente
pub async fn update_insurance(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(insurance_id): Path<i64>,
    Json(insurance): Json<CreateInsuranceRequest>,
) -> AppResult<Json<Insurance>> {
    insurance.validate()?;
    validate_insurance_references(&state, &insurance).await?;

    let repository = InsuranceRepository::new(state.pool.clone());
    let scope = insurance_scope(&user);

    repository
        .find_scoped(&scope, insurance_id)
        .await?
        .ok_or_else(|| not_found_error("Insurance"))?;

    let updated = repository.update(insurance_id, &insurance).await?;

    Ok(Json(updated))
}

/// Eliminar una póliza
pub async fn delete_insurance(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(insurance_id): Path<i64>,
) -> AppResult<StatusCode> {
    let repository = InsuranceRepository::new(state.pool.clone());
    let scope = insurance_scope(&user);

    repository
        .find_scoped(&scope, insurance_id)
        .await?
        .ok_or_else(|| not_found_error("Insurance"))?;

    repository.delete(insurance_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
