//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle y sus enums de estado.
//! Mapea exactamente al schema PostgreSQL con primary key 'id'.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use validator::Validate;

/// Tipo de caja de cambios - mapea al ENUM gearbox_type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "gearbox_type")]
pub enum GearboxType {
    #[sqlx(rename = "automatic")]
    #[serde(rename = "automatic")]
    Automatic,
    #[sqlx(rename = "manual")]
    #[serde(rename = "manual")]
    Manual,
    #[sqlx(rename = "semi-automatic")]
    #[serde(rename = "semi-automatic")]
    SemiAutomatic,
}

/// Disponibilidad del vehículo - mapea al ENUM vehicle_availability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "vehicle_availability")]
pub enum VehicleAvailability {
    #[sqlx(rename = "in use")]
    #[serde(rename = "in use")]
    InUse,
    #[sqlx(rename = "service")]
    #[serde(rename = "service")]
    Service,
    #[sqlx(rename = "available")]
    #[serde(rename = "available")]
    Available,
    #[sqlx(rename = "decommissioned")]
    #[serde(rename = "decommissioned")]
    Decommissioned,
    #[sqlx(rename = "booked")]
    #[serde(rename = "booked")]
    Booked,
}

/// Tipo de neumáticos - mapea al ENUM tire_type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "tire_type")]
pub enum TireType {
    #[sqlx(rename = "summer")]
    #[serde(rename = "summer")]
    Summer,
    #[sqlx(rename = "winter")]
    #[serde(rename = "winter")]
    Winter,
    #[sqlx(rename = "all-season")]
    #[serde(rename = "all-season")]
    AllSeason,
}

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: i64,
    pub id_number: String,
    pub vin: String,
    pub weight: f64,
    pub registration_number: String,
    pub brand: String,
    pub model: String,
    pub production_year: i32,
    pub kilometrage: i32,
    pub gearbox_type: GearboxType,
    pub availability: VehicleAvailability,
    pub tire_type: TireType,
    pub company_id: i64,
}

impl Vehicle {
    /// Nombre a mostrar en reportes, ej. "Skoda Octavia"
    pub fn display_name(&self) -> String {
        format!("{} {}", capitalize(&self.brand), capitalize(&self.model))
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Request para crear o reemplazar un vehículo
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(length(min = 1, max = 64))]
    pub id_number: String,

    #[validate(length(min = 1, max = 17))]
    pub vin: String,

    #[validate(range(min = 0.0))]
    pub weight: f64,

    #[validate(length(min = 1, max = 16))]
    pub registration_number: String,

    #[validate(length(min = 1, max = 32))]
    pub brand: String,

    #[validate(length(min = 1, max = 64))]
    pub model: String,

    #[validate(range(min = 1900, max = 2100))]
    pub production_year: i32,

    #[validate(range(min = 0))]
    pub kilometrage: i32,

    pub gearbox_type: GearboxType,

    pub availability: VehicleAvailability,

    pub tire_type: TireType,

    pub company_id: i64,
}

/// Filtros para búsqueda de vehículos
#[derive(Debug, Deserialize)]
pub struct VehicleFilters {
    pub company_id: Option<i64>,
    pub search: Option<String>,
    pub status: Option<VehicleAvailability>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_capitalizes() {
        let vehicle = Vehicle {
            id: 1,
            id_number: "DR 12345".to_string(),
            vin: "WVWZZZ1JZXW000001".to_string(),
            weight: 1300.0,
            registration_number: "WX 12345".to_string(),
            brand: "skoda".to_string(),
            model: "octavia".to_string(),
            production_year: 2019,
            kilometrage: 150_000,
            gearbox_type: GearboxType::Manual,
            availability: VehicleAvailability::Available,
            tire_type: TireType::AllSeason,
            company_id: 1,
        };
        assert_eq!(vehicle.display_name(), "Skoda Octavia");
    }

    #[test]
    fn test_enum_serialization_uses_wire_values() {
        assert_eq!(
            serde_json::to_value(GearboxType::SemiAutomatic).unwrap(),
            "semi-automatic"
        );
        assert_eq!(
            serde_json::to_value(VehicleAvailability::InUse).unwrap(),
            "in use"
        );
        assert_eq!(serde_json::to_value(TireType::AllSeason).unwrap(), "all-season");
    }
}
