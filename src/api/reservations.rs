//! Handlers de Reservations
//!
//! CRUD de reservas y listado de las próximas.

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
    models::reservation::{CreateReservationRequest, Reservation, ReservationFilters},
    repositories::reservation_repository::ReservationRepository,
    services::scope_service::reservation_scope,
    services::validation_service::{
        validate_obj_reference, validate_user_reference, ReferencedEntity,
    },
    state::AppState,
    utils::errors::{not_found_error, AppError, AppResult},
};

/// Crear el router de reservations
pub fn create_reservations_router() -> Router<AppState> {
    Router::new()
        .route(
            "/reservations",
            get(list_reservations).post(create_reservation),
        )
        .route("/reservations/upcoming", get(list_upcoming_reservations))
        .route(
            "/reservations/:reservation_id",
            get(retrieve_reservation)
                .put(update_reservation)
                .delete(delete_reservation),
        )
}

async fn validate_reservation_references(
    state: &AppState,
    reservation: &CreateReservationRequest,
    user: &AuthenticatedUser,
) -> Result<(), AppError> {
    let payload = serde_json::to_value(reservation)
        .map_err(|e| AppError::Internal(format!("Error serializando payload: {}", e)))?;

    validate_obj_reference(
        &state.pool,
        ReferencedEntity::Vehicle,
        Some(reservation.vehicle_id),
        &payload,
    )
    .await?;
    validate_obj_reference(
        &state.pool,
        ReferencedEntity::User,
        Some(reservation.user_id),
        &payload,
    )
    .await?;
    validate_user_reference(&state.pool, Some(reservation.user_id), user, &payload).await?;

    Ok(())
}

/// Listar las reservas visibles para el usuario
pub async fn list_reservations(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Query(filters): Query<ReservationFilters>,
) -> AppResult<Json<Page<Reservation>>> {
    let (page, size, offset) = resolve_page(filters.page, filters.size);
    let scope = reservation_scope(&user);

    let (reservations, total) = ReservationRepository::new(state.pool.clone())
        .list(&scope, filters.vehicle_id, filters.user_id, size, offset)
        .await?;

    Ok(Json(Page::new(reservations, total, page, size)))
}

/// Listar las reservas que todavía no han comenzado
pub async fn list_upcoming_reservations(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Query(filters): Query<ReservationFilters>,
) -> AppResult<Json<Page<Reservation>>> {
    let (page, size, offset) = resolve_page(filters.page, filters.size);
    let scope = reservation_scope(&user);

    let (reservations, total) = ReservationRepository::new(state.pool.clone())
        .list_upcoming(&scope, Utc::now(), size, offset)
        .await?;

    Ok(Json(Page::new(reservations, total, page, size)))
}

/// Crear una nueva reserva
pub async fn create_reservation(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Json(reservation): Json<CreateReservationRequest>,
) -> AppResult<(StatusCode, Json<Reservation>)> {
    reservation.validate()?;
    validate_reservation_references(&state, &reservation, &user).await?;

    let reservation_date = reservation.reservation_date.unwrap_or_else(Utc::now);
    let created = ReservationRepository::new(state.pool.clone())
        .insert(&reservation, reservation_date)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Obtener una reserva por ID
pub async fn retrieve_reservation(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(reservation_id): Path<i64>,
) -> AppResult<Json<Reservation>> {
    let scope = reservation_scope(&user);
    let reservation = ReservationRepository::new(state.pool.clone())
        .find_scoped(&scope, reservation_id)
        .await?
        .ok_or_else(|| not_found_error("Reservation"))?;

    Ok(Json(reservation))
}

/// Actualizar una reserva existente
pub async fn update_reservation(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(reservation_id): Path<i64>,
    Json(reservation): Json<CreateReservationRequest>,
) -> AppResult<Json<Reservation>> {
    reservation.validate()?;
    validate_reservation_references(&state, &reservation, &user).await?;

    let repository = ReservationRepository::new(state.pool.clone());
    let scope = reservation_scope(&user);

    repository
        .find_scoped(&scope, reservation_id)
        .await?
        .ok_or_else(|| not_found_error("Reservation"))?;

    let reservation_date = reservation.reservation_date.unwrap_or_else(Utc::now);
    let updated = repository
        .update(reservation_id, &reservation, reservation_date)
        .await?;

    Ok(Json(updated))
}

/// Eliminar una reserva
pub async fn delete_reservation(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(reservation_id): Path<i64>,
) -> AppResult<StatusCode> {
    let repository = ReservationRepository::new(state.pool.clone());
    let scope = reservation_scope(&user);

    repository
        .find_scoped(&scope, reservation_id)
        .await?
        .ok_or_else(|| not_found_error("Reservation"))?;

    repository.delete(reservation_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
