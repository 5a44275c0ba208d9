//! Handlers de Vehicles
//!
//! Este módulo maneja las operaciones CRUD para vehículos y el reporte
//! de consumo de combustible.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use validator::Validate;

use crate::{
    middleware::auth::AuthenticatedUser,
    models::pagination::{resolve_page, Page},
    models::user::UserRole,
    models::vehicle::{CreateVehicleRequest, Vehicle, VehicleFilters},
    repositories::vehicle_repository::VehicleRepository,
    services::authorization_service::require_role,
    services::report_service::{vehicle_fuel_report, FuelReport},
    services::scope_service::vehicle_scope,
    services::validation_service::{
        validate_company_reference, validate_obj_reference, ReferencedEntity,
    },
    state::AppState,
    utils::errors::{not_found_error, AppError, AppResult},
};

/// Crear el router de vehicles
pub fn create_vehicles_router() -> Router<AppState> {
    Router::new()
        .route("/vehicles", get(list_vehicles).post(create_vehicle))
        .route(
            "/vehicles/:vehicle_id",
            get(retrieve_vehicle)
                .put(update_vehicle)
                .delete(delete_vehicle),
        )
        .route(
            "/vehicles/:vehicle_id/reports/fuel",
            get(generate_vehicle_fuel_report),
        )
}

/// Listar los vehículos visibles para el usuario, con búsqueda por
/// marca, modelo o matrícula y filtro por disponibilidad
pub async fn list_vehicles(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Query(filters): Query<VehicleFilters>,
) -> AppResult<Json<Page<Vehicle>>> {
    let (page, size, offset) = resolve_page(filters.page, filters.size);
    let scope = vehicle_scope(&user);

    let (vehicles, total) = VehicleRepository::new(state.pool.clone())
        .list(
            &scope,
            filters.company_id,
            filters.search.as_deref(),
            filters.status,
            size,
            offset,
        )
        .await?;

    Ok(Json(Page::new(vehicles, total, page, size)))
}

async fn validate_vehicle_references(
    state: &AppState,
    vehicle: &CreateVehicleRequest,
    user: &AuthenticatedUser,
) -> Result<(), AppError> {
    let payload = serde_json::to_value(vehicle)
        .map_err(|e| AppError::Internal(format!("Error serializando payload: {}", e)))?;

    validate_obj_reference(
        &state.pool,
        ReferencedEntity::Company,
        Some(vehicle.company_id),
        &payload,
    )
    .await?;
    validate_company_reference(Some(vehicle.company_id), user, &payload)?;

    Ok(())
}

/// Crear un nuevo vehículo
pub async fn create_vehicle(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Json(vehicle): Json<CreateVehicleRequest>,
) -> AppResult<(StatusCode, Json<Vehicle>)> {
    vehicle.validate()?;
    validate_vehicle_references(&state, &vehicle, &user).await?;

    let created = VehicleRepository::new(state.pool.clone())
        .insert(&vehicle)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Obtener un vehículo por ID
pub async fn retrieve_vehicle(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(vehicle_id): Path<i64>,
) -> AppResult<Json<Vehicle>> {
    let scope = vehicle_scope(&user);
    let vehicle = VehicleRepository::new(state.pool.clone())
        .find_scoped(&scope, vehicle_id)
        .await?
        .ok_or_else(|| not_found_error("Vehicle"))?;

    Ok(Json(vehicle))
}

/// Generar el reporte de combustible de un vehículo (solo admin y manager)
pub async fn generate_vehicle_fuel_report(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(vehicle_id): Path<i64>,
) -> AppResult<Json<FuelReport>> {
    require_role(&[UserRole::Admin, UserRole::Manager], &user)?;

    let scope = vehicle_scope(&user);
    let vehicle = VehicleRepository::new(state.pool.clone())
        .find_scoped(&scope, vehicle_id)
        .await?
        .ok_or_else(|| not_found_error("Vehicle"))?;

    let report = vehicle_fuel_report(&state.pool, vehicle).await?;

    Ok(Json(report))
}

/// Actualizar un vehículo existente
pub async fn update_vehicle(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(vehicle_id): Path<i64>,
    Json(vehicle): Json<CreateVehicleRequest>,
) -> AppResult<Json<Vehicle>> {
    vehicle.validate()?;
    validate_vehicle_references(&state, &vehicle, &user).await?;

    let repository = VehicleRepository::new(state.pool.clone());
    let scope = vehicle_scope(&user);

    repository
        .find_scoped(&scope, vehicle_id)
        .await?
        .ok_or_else(|| not_found_error("Vehicle"))?;

    let updated = repository.update(vehicle_id, &vehicle).await?;

    Ok(Json(updated))
}

/// Eliminar un vehículo (cascada sobre documentos, repostajes, eventos,
/// reservas, pólizas y comentarios)
pub async fn delete_vehicle(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(vehicle_id): Path<i64>,
) -> AppResult<StatusCode> {
    let repository = VehicleRepository::new(state.pool.clone());
    let scope = vehicle_scope(&user);

    repository
        .find_scoped(&scope, vehicle_id)
        .await?
        .ok_or_else(|| not_found_error("Vehicle"))?;

    repository.delete(vehicle_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
