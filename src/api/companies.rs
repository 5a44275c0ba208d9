//! Handlers de Companies
//!
//! Este módulo maneja las operaciones CRUD para empresas.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use validator::Validate;

use crate::{
    middleware::auth::AuthenticatedUser,
    models::company::{Company, CompanyFilters, CreateCompanyRequest},
    models::pagination::{resolve_page, Page},
    repositories::company_repository::CompanyRepository,
    services::scope_service::company_scope,
    state::AppState,
    utils::errors::{not_found_error, AppResult},
};

/// Crear el router de companies
pub fn create_companies_router() -> Router<AppState> {
    Router::new()
        .route("/companies", get(list_companies).post(create_company))
        .route(
            "/companies/:company_id",
            get(retrieve_company)
                .put(update_company)
                .delete(delete_company),
        )
}

/// Listar las empresas visibles para el usuario
pub async fn list_companies(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Query(filters): Query<CompanyFilters>,
) -> AppResult<Json<Page<Company>>> {
    let (page, size, offset) = resolve_page(filters.page, filters.size);
    let scope = company_scope(&user);

    let (companies, total) = CompanyRepository::new(state.pool.clone())
        .list(&scope, filters.search.as_deref(), size, offset)
        .await?;

    Ok(Json(Page::new(companies, total, page, size)))
}

/// Crear una nueva empresa
pub async fn create_company(
    Extension(_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Json(company): Json<CreateCompanyRequest>,
) -> AppResult<(StatusCode, Json<Company>)> {
    company.validate()?;

    let created = CompanyRepository::new(state.pool.clone())
        .insert(&company)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Obtener una empresa por ID
pub async fn retrieve_company(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(company_id): Path<i64>,
) -> AppResult<Json<Company>> {
    let scope = company_scope(&user);
    let company = CompanyRepository::new(state.pool.clone())
        .find_scoped(&scope, company_id)
        .await?
        .ok_or_else(|| not_found_error("Company"))?;

    Ok(Json(company))
}

/// Actualizar una empresa existente
pub async fn update_company(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(company_id): Path<i64>,
    Json(company): Json<CreateCompanyRequest>,
) -> AppResult<Json<Company>> {
    company.validate()?;

    let repository = CompanyRepository::new(state.pool.clone());
    let scope = company_scope(&user);

    repository
        .find_scoped(&scope, company_id)
        .await?
        .ok_or_else(|| not_found_error("Company"))?;

    let updated = repository.update(company_id, &company).await?;

    Ok(Json(updated))
}

/// Eliminar una empresa (cascada sobre vehículos, usuarios, eventos y pólizas)
pub async fn delete_company(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(company_id): Path<i64>,
) -> AppResult<StatusCode> {
    let repository = CompanyRepository::new(state.pool.clone());
    let scope = company_scope(&user);

    repository
        .find_scoped(&scope, company_id)
        .await?
        .ok_or_else(|| not_found_error("Company"))?;

    repository.delete(company_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
