//! Modelo de Reservation
//!
//! Reservas de vehículos por usuario con su ventana de uso.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Reservation principal - mapea exactamente a la tabla reservations
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reservation {
    pub id: i64,
    pub date_from: DateTime<Utc>,
    pub date_to: DateTime<Utc>,
    pub reservation_date: DateTime<Utc>,
    pub vehicle_id: i64,
    pub user_id: i64,
}

/// Request para crear o reemplazar una reserva
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CreateReservationRequest {
    pub date_from: DateTime<Utc>,

    pub date_to: DateTime<Utc>,

    pub reservation_date: Option<DateTime<Utc>>,

    pub vehicle_id: i64,

    pub user_id: i64,
}

/// Filtros para búsqueda de reservas
#[derive(Debug, Deserialize)]
pub struct ReservationFilters {
    pub vehicle_id: Option<i64>,
    pub user_id: Option<i64>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}
