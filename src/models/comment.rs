//! Modelo de Comment
//!
//! Comentarios de texto libre sobre un vehículo.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Comment principal - mapea exactamente a la tabla comments
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: i64,
    pub content: String,
    pub date: DateTime<Utc>,
    pub vehicle_id: i64,
    pub user_id: i64,
}

/// Request para crear o reemplazar un comentario
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, max = 1000))]
    pub content: String,

    pub date: Option<DateTime<Utc>>,

    pub vehicle_id: i64,

    pub user_id: i64,
}

/// Filtros para búsqueda de comentarios
#[derive(Debug, Deserialize)]
pub struct CommentFilters {
    pub vehicle_id: Option<i64>,
    pub user_id: Option<i64>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}
