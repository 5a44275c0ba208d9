//! Modelo de Refuel
//!
//! Repostajes registrados por los usuarios contra un vehículo,
//! con el documento justificante.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Refuel principal - mapea exactamente a la tabla refuels
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Refuel {
    pub id: i64,
    pub date: DateTime<Utc>,
    pub fuel_amount: f64,
    pub price: f64,
    pub kilometrage_during_refuel: i32,
    pub gas_station: String,
    pub vehicle_id: i64,
    pub document_id: i64,
    pub user_id: i64,
}

/// Request para crear o reemplazar un repostaje
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CreateRefuelRequest {
    pub date: Option<DateTime<Utc>>,

    #[validate(range(min = 0.0))]
    pub fuel_amount: f64,

    #[validate(range(min = 0.0))]
    pub price: f64,

    #[validate(range(min = 0))]
    pub kilometrage_during_refuel: i32,

    #[validate(length(min = 1, max = 32))]
    pub gas_station: String,

    pub vehicle_id: i64,

    pub document_id: i64,

    pub user_id: i64,
}

/// Total de combustible por mes para las estadísticas anuales
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefuelStat {
    pub month_year: String,
    pub total_fuel: f64,
}

/// Filtros para búsqueda de repostajes
#[derive(Debug, Deserialize)]
pub struct RefuelFilters {
    pub vehicle_id: Option<i64>,
    pub document_id: Option<i64>,
    pub user_id: Option<i64>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}
