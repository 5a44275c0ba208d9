//! Servicio de reportes de vehículo
//!
//! Ensambla el reporte de consumo de combustible de un vehículo:
//! cabecera con los datos del coche y el histórico de repostajes con la
//! persona que los registró, del más reciente al más antiguo.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::models::vehicle::{GearboxType, Vehicle};
use crate::utils::errors::AppError;

/// Fila del histórico de repostajes del reporte
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct FuelReportRow {
    pub date: DateTime<Utc>,
    pub fuel_amount: f64,
    pub price: f64,
    pub kilometrage_during_refuel: i32,
    pub user_name: String,
}

/// Cabecera del reporte con los datos del vehículo
#[derive(Debug, Serialize)]
pub struct FuelReportVehicle {
    pub name: String,
    pub registration_number: String,
    pub vin: String,
    pub production_year: i32,
    pub kilometrage: i32,
    pub gearbox_type: GearboxType,
}

/// Reporte de consumo de combustible de un vehículo
#[derive(Debug, Serialize)]
pub struct FuelReport {
    pub generated_at: DateTime<Utc>,
    pub vehicle: FuelReportVehicle,
    pub refuels: Vec<FuelReportRow>,
}

/// Ensamblar el reporte para un vehículo ya resuelto por el scope del
/// usuario solicitante
pub async fn vehicle_fuel_report(pool: &PgPool, vehicle: Vehicle) -> Result<FuelReport, AppError> {
    let refuels = sqlx::query_as::<_, FuelReportRow>(
        r#"
        SELECT r.date, r.fuel_amount, r.price, r.kilometrage_during_refuel, u.name AS user_name
        FROM refuels r
        JOIN users u ON u.id = r.user_id
        WHERE r.vehicle_id = $1
        ORDER BY r.date DESC
        "#,
    )
    .bind(vehicle.id)
    .fetch_all(pool)
    .await?;

    Ok(FuelReport {
        generated_at: Utc::now(),
        vehicle: FuelReportVehicle {
            name: vehicle.display_name(),
            registration_number: vehicle.registration_number,
            vin: vehicle.vin,
            production_year: vehicle.production_year,
            kilometrage: vehicle.kilometrage,
            gearbox_type: vehicle.gearbox_type,
        },
        refuels,
    })
}
