//! Handlers de Users
//!
//! Login, usuario actual y CRUD de usuarios. El alta está restringida a
//! admin y manager; un manager solo puede crear workers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use validator::Validate;

use crate::{
    middleware::auth::{generate_jwt_token, AuthenticatedUser},
    models::pagination::{resolve_page, Page},
    models::user::{
        CreateUserRequest, LoginResponse, User, UserFilters, UserLoginRequest, UserResponse,
        UserRole,
    },
    repositories::user_repository::{UserRecord, UserRepository},
    services::authorization_service::{require_role, require_self_or_admin, validate_creatable_role},
    services::scope_service::user_scope,
    services::validation_service::{validate_obj_reference, ReferencedEntity},
    state::AppState,
    utils::errors::{not_found_error, validation_error, AppError, AppResult},
    utils::passwords::{hash_password, verify_password},
};

/// Crear el router de users (rutas protegidas)
pub fn create_users_router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/me", get(retrieve_current_user))
        .route(
            "/users/:user_id",
            get(retrieve_user).put(update_user).delete(delete_user),
        )
}

/// Login con email y contraseña; emite un token Bearer
pub async fn login(
    State(state): State<AppState>,
    Json(data): Json<UserLoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let user = UserRepository::new(state.pool.clone())
        .find_by_email(&data.email)
        .await?;

    let user = match user {
        Some(user) if verify_password(&data.password, &user.password) => user,
        _ => return Err(AppError::Unauthorized("Invalid email or password".to_string())),
    };

    let access_token = generate_jwt_token(user.id, &state.config)?;

    Ok(Json(LoginResponse {
        access_token,
        token_type: "bearer".to_string(),
        user: UserResponse::from(user),
    }))
}

/// Obtener el usuario autenticado actual
pub async fn retrieve_current_user(
    Extension(user): Extension<AuthenticatedUser>,
) -> AppResult<Json<UserResponse>> {
    Ok(Json(UserResponse {
        id: user.id,
        email: user.email,
        name: user.name,
        role: user.role,
        company_id: user.company_id,
    }))
}

/// Listar los usuarios visibles para el usuario
pub async fn list_users(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Query(filters): Query<UserFilters>,
) -> AppResult<Json<Page<UserResponse>>> {
    let (page, size, offset) = resolve_page(filters.page, filters.size);
    let scope = user_scope(&user);

    let (users, total) = UserRepository::new(state.pool.clone())
        .list(&scope, filters.company_id, size, offset)
        .await?;

    let users = users.into_iter().map(UserResponse::from).collect();

    Ok(Json(Page::new(users, total, page, size)))
}

/// Crear un nuevo usuario (solo admin y manager)
pub async fn create_user(
    Extension(request_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Json(user): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    require_role(&[UserRole::Admin, UserRole::Manager], &request_user)?;
    validate_creatable_role(user.role, &request_user, user.redacted_payload())?;

    user.validate()?;
    if !user.passwords_match() {
        return Err(validation_error(
            "Passwords do not match",
            Some(user.redacted_payload()),
        ));
    }

    let repository = UserRepository::new(state.pool.clone());

    if repository.find_by_email(&user.email).await?.is_some() {
        return Err(validation_error(
            "This email has already been taken.",
            Some(user.redacted_payload()),
        ));
    }
    validate_obj_reference(
        &state.pool,
        ReferencedEntity::Company,
        user.company_id,
        &user.redacted_payload(),
    )
    .await?;

    let record = UserRecord {
        email: user.email.clone(),
        name: user.name.clone(),
        role: user.role,
        company_id: user.company_id,
        password: hash_password(&user.password1)?,
    };
    let created = repository.insert(&record).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(created))))
}

/// Obtener un usuario por ID
pub async fn retrieve_user(
    Extension(request_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<UserResponse>> {
    let scope = user_scope(&request_user);
    let user = UserRepository::new(state.pool.clone())
        .find_scoped(&scope, user_id)
        .await?
        .ok_or_else(|| not_found_error("User"))?;

    Ok(Json(UserResponse::from(user)))
}

/// Reemplazar un usuario existente (admin o el propio usuario)
pub async fn update_user(
    Extension(request_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(user): Json<CreateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    require_self_or_admin(user_id, &request_user, Some(user.redacted_payload()))?;

    user.validate()?;
    if !user.passwords_match() {
        return Err(validation_error(
            "Passwords do not match",
            Some(user.redacted_payload()),
        ));
    }

    let repository = UserRepository::new(state.pool.clone());
    let scope = user_scope(&request_user);

    let existing: User = repository
        .find_scoped(&scope, user_id)
        .await?
        .ok_or_else(|| not_found_error("User"))?;

    if user.email != existing.email && repository.find_by_email(&user.email).await?.is_some() {
        return Err(validation_error(
            "This email has already been taken.",
            Some(user.redacted_payload()),
        ));
    }
    validate_obj_reference(
        &state.pool,
        ReferencedEntity::Company,
        user.company_id,
        &user.redacted_payload(),
    )
    .await?;

    let record = UserRecord {
        email: user.email.clone(),
        name: user.name.clone(),
        role: user.role,
        company_id: user.company_id,
        password: hash_password(&user.password1)?,
    };
    let updated = repository.update(user_id, &record).await?;

    Ok(Json(UserResponse::from(updated)))
}

/// Eliminar un usuario (admin o el propio usuario)
pub async fn delete_user(
    Extension(request_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<StatusCode> {
    require_self_or_admin(user_id, &request_user, None)?;

    let repository = UserRepository::new(state.pool.clone());
    let scope = user_scope(&request_user);

    repository
        .find_scoped(&scope, user_id)
        .await?
        .ok_or_else(|| not_found_error("User"))?;

    repository.delete(user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
