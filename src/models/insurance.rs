//! Modelo de Insurance
//!
//! Pólizas de seguro de los vehículos con su ventana de cobertura.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use validator::Validate;

/// Tipo de póliza - mapea al ENUM insurance_type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "insurance_type")]
pub enum InsuranceType {
    #[sqlx(rename = "OC")]
    #[serde(rename = "OC")]
    Oc,
    #[sqlx(rename = "AC")]
    #[serde(rename = "AC")]
    Ac,
    #[sqlx(rename = "OC/AC")]
    #[serde(rename = "OC/AC")]
    OcAc,
}

/// Insurance principal - mapea exactamente a la tabla insurances
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Insurance {
    pub id: i64,
    pub insurer: String,
    pub policy_number: String,
    pub date_from: DateTime<Utc>,
    pub date_to: DateTime<Utc>,
    pub description: String,
    pub price: f64,
    pub insurance_type: InsuranceType,
    pub vehicle_id: i64,
    pub document_id: i64,
    pub company_id: i64,
}

/// Request para crear o reemplazar una póliza
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CreateInsuranceRequest {
    #[validate(length(min = 1, max = 128))]
    pub insurer: String,

    #[validate(length(min = 1, max = 64))]
    pub policy_number: String,

    pub date_from: DateTime<Utc>,

    pub date_to: DateTime<Utc>,

    #[validate(length(max = 1024))]
    pub description: String,

    #[validate(range(min = 0.0))]
    pub price: f64,

    pub insurance_type: InsuranceType,

    pub vehicle_id: i64,

    pub document_id: i64,

    pub company_id: i64,
}

/// Filtros para búsqueda de pólizas
#[derive(Debug, Deserialize)]
pub struct InsuranceFilters {
    pub vehicle_id: Option<i64>,
    pub document_id: Option<i64>,
    pub company_id: Option<i64>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insurance_type_wire_values() {
        assert_eq!(serde_json::to_value(InsuranceType::Oc).unwrap(), "OC");
        assert_eq!(serde_json::to_value(InsuranceType::OcAc).unwrap(), "OC/AC");
    }
}
