//! Handlers de Events
//!
//! Eventos de mantenimiento y administración de los vehículos.

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
    models::event::{CreateEventRequest, Event, EventFilters},
    models::pagination::{resolve_page, Page},
    repositories::event_repository::EventRepository,
    services::scope_service::event_scope,
    services::validation_service::{validate_obj_reference, ReferencedEntity},
    state::AppState,
    utils::errors::{not_found_error, AppError, AppResult},
};

/// Crear el router de events
pub fn create_events_router() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route(
            "/events/:event_id",
            get(retrieve_event).put(update_event).delete(delete_event),
        )
}

async fn validate_event_references(
    state: &AppState,
    event: &CreateEventRequest,
) -> Result<(), AppError> {
    let payload = serde_json::to_value(event)
        .map_err(|e| AppError::Internal(format!("Error serializando payload: {}", e)))?;

    validate_obj_reference(
        &state.pool,
        ReferencedEntity::Vehicle,
        Some(event.vehicle_id),
        &payload,
    )
    .await?;
    validate_obj_reference(
        &state.pool,
        ReferencedEntity::Document,
        Some(event.document_id),
        &payload,
    )
    .await?;
    validate_obj_reference(
        &state.pool,
        ReferencedEntity::Company,
        Some(event.company_id),
        &payload,
    )
    .await?;

    Ok(())
}

/// Listar eventos
pub async fn list_events(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Query(filters): Query<EventFilters>,
) -> AppResult<Json<Page<Event>>> {
    let (page, size, offset) = resolve_page(filters.page, filters.size);
    let scope = event_scope(&user);

    let (events, total) = EventRepository::new(state.pool.clone())
        .list(
            &scope,
            filters.vehicle_id,
            filters.document_id,
            filters.company_id,
            size,
            offset,
        )
        .await?;

    Ok(Json(Page::new(events, total, page, size)))
}

/// Crear un nuevo evento
pub async fn create_event(
    Extension(_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Json(event): Json<CreateEventRequest>,
) -> AppResult<(StatusCode, Json<Event>)> {
    event.validate()?;
    validate_event_references(&state, &event).await?;

    let date = event.date.unwrap_or_else(Utc::now);
    let created = EventRepository::new(state.pool.clone())
        .insert(&event, date)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Obtener un evento por ID
pub async fn retrieve_event(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> AppResult<Json<Event>> {
    let scope = event_scope(&user);
    let event = EventRepository::new(state.pool.clone())
        .find_scoped(&scope, event_id)
        .await?
        .ok_or_else(|| not_found_error("Event"))?;

    Ok(Json(event))
}

/// Actualizar un evento existente
pub async fn update_event(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
    Json(event): Json<CreateEventRequest>,
) -> AppResult<Json<Event>> {
    event.validate()?;
    validate_event_references(&state, &event).await?;

    let repository = EventRepository::new(state.pool.clone());
    let scope = event_scope(&user);

    repository
        .find_scoped(&scope, event_id)
        .await?
        .ok_or_else(|| not_found_error("Event"))?;

    let date = event.date.unwrap_or_else(Utc::now);
    let updated = repository.update(event_id, &event, date).await?;

    Ok(Json(updated))
}

/// Eliminar un evento
pub async fn delete_event(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> AppResult<StatusCode> {
    let repository = EventRepository::new(state.pool.clone());
    let scope = event_scope(&user);

    repository
        .find_scoped(&scope, event_id)
        .await?
        .ok_or_else(|| not_found_error("Event"))?;

    repository.delete(event_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
