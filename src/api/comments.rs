//! Handlers de Comments

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
    models::comment::{Comment, CommentFilters, CreateCommentRequest},
    models::pagination::{resolve_page, Page},
    repositories::comment_repository::CommentRepository,
    services::scope_service::comment_scope,
    services::validation_service::{
        validate_obj_reference, validate_user_reference, ReferencedEntity,
    },
    state::AppState,
    utils::errors::{not_found_error, AppError, AppResult},
};

/// Crear el router de comments
pub fn create_comments_router() -> Router<AppState> {
    Router::new()
        .route("/comments", get(list_comments).post(create_comment))
        .route(
            "/comments/:comment_id",
            get(retrieve_comment)
                .put(update_comment)
                .delete(delete_comment),
        )
}

async fn validate_comment_references(
    state: &AppState,
    comment: &CreateCommentRequest,
    user: &AuthenticatedUser,
) -> Result<(), AppError> {
    let payload = serde_json::to_value(comment)
        .map_err(|e| AppError::Internal(format!("Error serializando payload: {}", e)))?;

    validate_obj_reference(
        &state.pool,
        ReferencedEntity::Vehicle,
        Some(comment.vehicle_id),
        &payload,
    )
    .await?;
    validate_obj_reference(
        &state.pool,
        ReferencedEntity::User,
        Some(comment.user_id),
        &payload,
    )
    .await?;
    validate_user_reference(&state.pool, Some(comment.user_id), user, &payload).await?;

    Ok(())
}

/// Listar los comentarios visibles para el usuario
pub async fn list_comments(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Query(filters): Query<CommentFilters>,
) -> AppResult<Json<Page<Comment>>> {
    let (page, size, offset) = resolve_page(filters.page, filters.size);
    let scope = comment_scope(&user);

    let (comments, total) = CommentRepository::new(state.pool.clone())
        .list(&scope, filters.vehicle_id, filters.user_id, size, offset)
        .await?;

    Ok(Json(Page::new(comments, total, page, size)))
}

/// Crear un nuevo comentario
pub async fn create_comment(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Json(comment): Json<CreateCommentRequest>,
) -> AppResult<(StatusCode, Json<Comment>)> {
    comment.validate()?;
    validate_comment_references(&state, &comment, &user).await?;

    let date = comment.date.unwrap_or_else(Utc::now);
    let created = CommentRepository::new(state.pool.clone())
        .insert(&comment, date)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Obtener un comentario por ID
pub async fn retrieve_comment(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(comment_id): Path<i64>,
) -> AppResult<Json<Comment>> {
    let scope = comment_scope(&user);
    let comment = CommentRepository::new(state.pool.clone())
        .find_scoped(&scope, comment_id)
        .await?
        .ok_or_else(|| not_found_error("Comment"))?;

    Ok(Json(comment))
}

/// Actualizar un comentario existente
pub async fn update_comment(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(comment_id): Path<i64>,
    Json(comment): Json<CreateCommentRequest>,
) -> AppResult<Json<Comment>> {
    comment.validate()?;
    validate_comment_references(&state, &comment, &user).await?;

    let repository = CommentRepository::new(state.pool.clone());
    let scope = comment_scope(&user);

    repository
        .find_scoped(&scope, comment_id)
        .await?
        .ok_or_else(|| not_found_error("Comment"))?;

    let date = comment.date.unwrap_or_else(Utc::now);
    let updated = repository.update(comment_id, &comment, date).await?;

    Ok(Json(updated))
}

/// Eliminar un comentario
pub async fn delete_comment(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(comment_id): Path<i64>,
) -> AppResult<StatusCode> {
    let repository = CommentRepository::new(state.pool.clone());
    let scope = comment_scope(&user);

    repository
        .find_scoped(&scope, comment_id)
        .await?
        .ok_or_else(|| not_found_error("Comment"))?;

    repository.delete(comment_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
