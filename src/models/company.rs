//! Modelo de Company
//!
//! Empresas propias (unidades internas de la flota) y contrapartes
//! externas como talleres o aseguradoras.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Company principal - mapea exactamente a la tabla companies
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub phone: String,
    pub post_code: String,
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub country: String,
    pub nip: String,
    pub is_internal: bool,
}

/// Request para crear o reemplazar una company
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CreateCompanyRequest {
    #[validate(length(min = 1, max = 128))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 256))]
    pub description: String,

    #[serde(default)]
    #[validate(length(max = 12))]
    pub phone: String,

    #[validate(length(min = 1, max = 8))]
    pub post_code: String,

    #[validate(length(max = 128))]
    pub address1: String,

    #[validate(length(max = 128))]
    pub address2: String,

    #[validate(length(max = 128))]
    pub city: String,

    #[validate(length(max = 128))]
    pub country: String,

    #[validate(length(min = 1, max = 10))]
    pub nip: String,

    #[serde(default = "default_is_internal")]
    pub is_internal: bool,
}

fn default_is_internal() -> bool {
    true
}

/// Filtros para búsqueda de companies
#[derive(Debug, Deserialize)]
pub struct CompanyFilters {
    pub search: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_defaults() {
        let request: CreateCompanyRequest = serde_json::from_value(serde_json::json!({
            "name": "Acme",
            "post_code": "00-001",
            "address1": "Main St 1",
            "address2": "",
            "city": "Warsaw",
            "country": "Poland",
            "nip": "1234567890"
        }))
        .unwrap();

        assert!(request.is_internal);
        assert_eq!(request.description, "");
        assert_eq!(request.phone, "");
        assert!(request.validate().is_ok());
    }
}
