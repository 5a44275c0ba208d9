//! Servicio de validación de referencias
//!
//! Comprueba, antes de tocar el almacenamiento, que las foreign keys
//! enviadas por el cliente existen y que el usuario actuante puede
//! adjuntar filas a esos destinos. Todas las comprobaciones se ejecutan
//! antes del primer write, así un fallo no deja mutaciones parciales.

use sqlx::PgPool;

use crate::middleware::auth::AuthenticatedUser;
use crate::models::user::UserRole;
use crate::utils::errors::{permission_error, validation_error, AppError};

/// Entidades referenciables desde los payloads de escritura
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferencedEntity {
    Company,
    User,
    Vehicle,
    Document,
}

impl ReferencedEntity {
    fn table(&self) -> &'static str {
        match self {
            ReferencedEntity::Company => "companies",
            ReferencedEntity::User => "users",
            ReferencedEntity::Vehicle => "vehicles",
            ReferencedEntity::Document => "documents",
        }
    }

    fn display_name(&self) -> &'static str {
        match self {
            ReferencedEntity::Company => "company",
            ReferencedEntity::User => "user",
            ReferencedEntity::Vehicle => "vehicle",
            ReferencedEntity::Document => "document",
        }
    }
}

/// Verificar que la referencia apunta a una fila existente.
/// Un id nulo pasa sin consulta.
pub async fn validate_obj_reference(
    pool: &PgPool,
    referenced: ReferencedEntity,
    id: Option<i64>,
    payload: &serde_json::Value,
) -> Result<(), AppError> {
    let Some(id) = id else {
        return Ok(());
    };

    let query = format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)",
        referenced.table()
    );
    let exists: bool = sqlx::query_scalar(&query).bind(id).fetch_one(pool).await?;

    if exists {
        Ok(())
    } else {
        Err(validation_error(
            format!("The specified {} does not exist.", referenced.display_name()),
            Some(payload.clone()),
        ))
    }
}

/// Regla de worker: solo puede referenciarse a sí mismo como user_id
pub fn validate_owned_user_reference(
    user_id: i64,
    requester: &AuthenticatedUser,
    payload: &serde_json::Value,
) -> Result<(), AppError> {
    match requester.role {
        UserRole::Worker if user_id != requester.id => {
            Err(permission_error(Some(payload.clone())))
        }
        _ => Ok(()),
    }
}

/// Regla de manager: el usuario referenciado debe ser de su empresa
pub fn validate_managed_user_company(
    referenced_company: Option<i64>,
    requester: &AuthenticatedUser,
    payload: &serde_json::Value,
) -> Result<(), AppError> {
    match requester.role {
        UserRole::Manager if referenced_company != requester.company_id => {
            Err(permission_error(Some(payload.clone())))
        }
        _ => Ok(()),
    }
}

/// Verificar que el usuario actuante puede adjuntar la fila al user_id
/// enviado: un worker solo a sí mismo, un manager solo a usuarios de su
/// empresa. Un user_id nulo pasa.
pub async fn validate_user_reference(
    pool: &PgPool,
    user_id: Option<i64>,
    requester: &AuthenticatedUser,
    payload: &serde_json::Value,
) -> Result<(), AppError> {
    let Some(user_id) = user_id else {
        return Ok(());
    };

    validate_owned_user_reference(user_id, requester, payload)?;

    if requester.role == UserRole::Manager {
        let referenced_company: Option<Option<i64>> =
            sqlx::query_scalar("SELECT company_id FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(pool)
                .await?;

        let Some(referenced_company) = referenced_company else {
            return Err(validation_error(
                "The specified user does not exist.",
                Some(payload.clone()),
            ));
        };

        validate_managed_user_company(referenced_company, requester, payload)?;
    }

    Ok(())
}

/// Verificar que el usuario actuante puede adjuntar la fila al company_id
/// enviado: workers y managers solo a su propia empresa. Un company_id
/// nulo pasa.
pub fn validate_company_reference(
    company_id: Option<i64>,
    requester: &AuthenticatedUser,
    payload: &serde_json::Value,
) -> Result<(), AppError> {
    let Some(company_id) = company_id else {
        return Ok(());
    };

    match requester.role {
        UserRole::Admin => Ok(()),
        UserRole::Manager | UserRole::Worker => {
            if requester.company_id == Some(company_id) {
                Ok(())
            } else {
                Err(permission_error(Some(payload.clone())))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_user(id: i64, role: UserRole, company_id: Option<i64>) -> AuthenticatedUser {
        AuthenticatedUser {
            id,
            email: format!("user{}@example.com", id),
            name: format!("user{}", id),
            role,
            company_id,
        }
    }

    #[test]
    fn test_worker_may_only_reference_itself() {
        let worker = make_user(3, UserRole::Worker, Some(5));
        let payload = serde_json::json!({"user_id": 4});

        assert!(validate_owned_user_reference(3, &worker, &payload).is_ok());
        assert!(validate_owned_user_reference(4, &worker, &payload).is_err());
    }

    #[test]
    fn test_owned_user_reference_ignores_other_roles() {
        let admin = make_user(1, UserRole::Admin, None);
        let manager = make_user(2, UserRole::Manager, Some(5));
        let payload = serde_json::json!({});

        assert!(validate_owned_user_reference(99, &admin, &payload).is_ok());
        assert!(validate_owned_user_reference(99, &manager, &payload).is_ok());
    }

    #[test]
    fn test_manager_may_only_reference_users_of_own_company() {
        let manager = make_user(2, UserRole::Manager, Some(5));
        let payload = serde_json::json!({});

        assert!(validate_managed_user_company(Some(5), &manager, &payload).is_ok());
        assert!(validate_managed_user_company(Some(9), &manager, &payload).is_err());
        assert!(validate_managed_user_company(None, &manager, &payload).is_err());
    }

    #[test]
    fn test_company_reference_rules() {
        let admin = make_user(1, UserRole::Admin, None);
        let manager = make_user(2, UserRole::Manager, Some(5));
        let worker = make_user(3, UserRole::Worker, Some(5));
        let payload = serde_json::json!({});

        // null pasa siempre
        assert!(validate_company_reference(None, &worker, &payload).is_ok());

        assert!(validate_company_reference(Some(9), &admin, &payload).is_ok());
        assert!(validate_company_reference(Some(5), &manager, &payload).is_ok());
        assert!(validate_company_reference(Some(9), &manager, &payload).is_err());
        assert!(validate_company_reference(Some(5), &worker, &payload).is_ok());
        assert!(validate_company_reference(Some(9), &worker, &payload).is_err());
    }

    #[test]
    fn test_permission_errors_carry_the_submitted_payload() {
        let worker = make_user(3, UserRole::Worker, Some(5));
        let payload = serde_json::json!({"user_id": 4, "vehicle_id": 1});

        match validate_owned_user_reference(4, &worker, &payload).unwrap_err() {
            AppError::Forbidden { input } => assert_eq!(input, Some(payload)),
            other => panic!("expected Forbidden, got {:?}", other),
        }
    }
}
