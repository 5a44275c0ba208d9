//! Handlers de Refuels
//!
//! CRUD de repostajes y estadísticas anuales de combustible.

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
    models::pagination::{resolve_page, Page},
    models::refuel::{CreateRefuelRequest, Refuel, RefuelFilters, RefuelStat},
    repositories::refuel_repository::RefuelRepository,
    services::scope_service::refuel_scope,
    services::stats_service::yearly_fuel_stats,
    services::validation_service::{
        validate_obj_reference, validate_user_reference, ReferencedEntity,
    },
    state::AppState,
    utils::errors::{not_found_error, AppError, AppResult},
};

/// Crear el router de refuels
pub fn create_refuels_router() -> Router<AppState> {
    Router::new()
        .route("/refuels", get(list_refuels).post(create_refuel))
        .route("/refuels/stats", get(retrieve_refuel_stats))
        .route(
            "/refuels/:refuel_id",
            get(retrieve_refuel).put(update_refuel).delete(delete_refuel),
        )
}

async fn validate_refuel_references(
    state: &AppState,
    refuel: &CreateRefuelRequest,
    user: &AuthenticatedUser,
) -> Result<(), AppError> {
    let payload = serde_json::to_value(refuel)
        .map_err(|e| AppError::Internal(format!("Error serializando payload: {}", e)))?;

    validate_obj_reference(
        &state.pool,
        ReferencedEntity::Vehicle,
        Some(refuel.vehicle_id),
        &payload,
    )
    .await?;
    validate_obj_reference(
        &state.pool,
        ReferencedEntity::Document,
        Some(refuel.document_id),
        &payload,
    )
    .await?;
    validate_obj_reference(
        &state.pool,
        ReferencedEntity::User,
        Some(refuel.user_id),
        &payload,
    )
    .await?;
    validate_user_reference(&state.pool, Some(refuel.user_id), user, &payload).await?;

    Ok(())
}

/// Listar los repostajes visibles para el usuario
pub async fn list_refuels(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Query(filters): Query<RefuelFilters>,
) -> AppResult<Json<Page<Refuel>>> {
    let (page, size, offset) = resolve_page(filters.page, filters.size);
    let scope = refuel_scope(&user);

    let (refuels, total) = RefuelRepository::new(state.pool.clone())
        .list(
            &scope,
            filters.vehicle_id,
            filters.document_id,
            filters.user_id,
            size,
            offset,
        )
        .await?;

    Ok(Json(Page::new(refuels, total, page, size)))
}

/// Crear un nuevo repostaje
pub async fn create_refuel(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Json(refuel): Json<CreateRefuelRequest>,
) -> AppResult<(StatusCode, Json<Refuel>)> {
    refuel.validate()?;
    validate_refuel_references(&state, &refuel, &user).await?;

    let date = refuel.date.unwrap_or_else(Utc::now);
    let created = RefuelRepository::new(state.pool.clone())
        .insert(&refuel, date)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Estadísticas de combustible de los últimos 12 meses para los
/// repostajes visibles del usuario
pub async fn retrieve_refuel_stats(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<RefuelStat>>> {
    let stats = yearly_fuel_stats(&state.pool, &user).await?;

    Ok(Json(stats))
}

/// Obtener un repostaje por ID
pub async fn retrieve_refuel(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(refuel_id): Path<i64>,
) -> AppResult<Json<Refuel>> {
    let scope = refuel_scope(&user);
    let refuel = RefuelRepository::new(state.pool.clone())
        .find_scoped(&scope, refuel_id)
        .await?
        .ok_or_else(|| not_found_error("Refuel"))?;

    Ok(Json(refuel))
}

/// Actualizar un repostaje existente
pub async fn update_refuel(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(refuel_id): Path<i64>,
    Json(refuel): Json<CreateRefuelRequest>,
) -> AppResult<Json<Refuel>> {
    refuel.validate()?;
    validate_refuel_references(&state, &refuel, &user).await?;

    let repository = RefuelRepository::new(state.pool.clone());
    let scope = refuel_scope(&user);

    repository
        .find_scoped(&scope, refuel_id)
        .await?
        .ok_or_else(|| not_found_error("Refuel"))?;

    let date = refuel.date.unwrap_or_else(Utc::now);
    let updated = repository.update(refuel_id, &refuel, date).await?;

    Ok(Json(updated))
}

/// Eliminar un repostaje
pub async fn delete_refuel(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(refuel_id): Path<i64>,
) -> AppResult<StatusCode> {
    let repository = RefuelRepository::new(state.pool.clone());
    let scope = refuel_scope(&user);

    repository
        .find_scoped(&scope, refuel_id)
        .await?
        .ok_or_else(|| not_found_error("Refuel"))?;

    repository.delete(refuel_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
