//! Modelo de Document
//!
//! Metadatos de documentos adjuntos a vehículos; los bytes viven en el
//! almacenamiento de ficheros, aquí solo la ruta opaca.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Document principal - mapea exactamente a la tabla documents
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Document {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub file_path: Option<String>,
    pub file_type: String,
    pub file_size: Option<i64>,
    pub vehicle_id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request para crear o reemplazar un documento (solo metadatos)
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CreateDocumentRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[validate(length(min = 1, max = 50))]
    pub file_type: String,

    pub vehicle_id: i64,

    pub user_id: i64,
}

/// Filtros para búsqueda de documentos
#[derive(Debug, Deserialize)]
pub struct DocumentFilters {
    pub search: Option<String>,
    pub file_type: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}
