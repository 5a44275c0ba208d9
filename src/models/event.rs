//! Modelo de Event
//!
//! Eventos de mantenimiento, reparación o administración de un vehículo,
//! asociados a la company que los ejecutó.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Event principal - mapea exactamente a la tabla events
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub event_type: String,
    pub date: DateTime<Utc>,
    pub description: String,
    pub price: Option<f64>,
    pub vehicle_id: i64,
    pub document_id: i64,
    pub company_id: i64,
}

/// Request para crear o reemplazar un evento
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 128))]
    pub event_type: String,

    pub date: Option<DateTime<Utc>>,

    #[validate(length(max = 1024))]
    pub description: String,

    pub price: Option<f64>,

    pub vehicle_id: i64,

    pub document_id: i64,

    pub company_id: i64,
}

/// Filtros para búsqueda de eventos
#[derive(Debug, Deserialize)]
pub struct EventFilters {
    pub vehicle_id: Option<i64>,
    pub document_id: Option<i64>,
    pub company_id: Option<i64>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}
