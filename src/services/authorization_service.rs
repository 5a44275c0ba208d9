//! Servicio de autorización por roles
//!
//! Verificaciones de rol independientes de la propiedad de filas:
//! allow-list de roles para operaciones privilegiadas y reglas
//! suplementarias sobre la creación y mutación de usuarios.

use crate::middleware::auth::AuthenticatedUser;
use crate::models::user::UserRole;
use crate::utils::errors::{permission_error, AppError};

/// Verificar que el rol del usuario está en la lista permitida.
/// El error no lleva payload: un fallo puramente de rol no debe
/// revelar nada sobre el recurso.
pub fn require_role(allowed: &[UserRole], user: &AuthenticatedUser) -> Result<(), AppError> {
    if allowed.contains(&user.role) {
        Ok(())
    } else {
        Err(permission_error(None))
    }
}

/// Regla suplementaria sobre el alta de usuarios: un manager solo puede
/// crear workers, nunca managers ni admins.
pub fn validate_creatable_role(
    requested_role: UserRole,
    actor: &AuthenticatedUser,
    payload: serde_json::Value,
) -> Result<(), AppError> {
    match actor.role {
        UserRole::Admin => Ok(()),
        UserRole::Manager => match requested_role {
            UserRole::Worker => Ok(()),
            UserRole::Admin | UserRole::Manager => Err(permission_error(Some(payload))),
        },
        UserRole::Worker => Err(permission_error(Some(payload))),
    }
}

/// Mutar (actualizar o borrar) un usuario requiere ser admin o el propio
/// usuario afectado.
pub fn require_self_or_admin(
    target_user_id: i64,
    actor: &AuthenticatedUser,
    payload: Option<serde_json::Value>,
) -> Result<(), AppError> {
    match actor.role {
        UserRole::Admin => Ok(()),
        UserRole::Manager | UserRole::Worker => {
            if actor.id == target_user_id {
                Ok(())
            } else {
                Err(permission_error(payload))
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
    fn test_require_role_allows_listed_roles() {
        let manager = make_user(1, UserRole::Manager, Some(1));
        assert!(require_role(&[UserRole::Admin, UserRole::Manager], &manager).is_ok());
    }

    #[test]
    fn test_require_role_rejects_unlisted_roles() {
        let worker = make_user(2, UserRole::Worker, Some(1));
        let err = require_role(&[UserRole::Admin, UserRole::Manager], &worker).unwrap_err();
        match err {
            AppError::Forbidden { input } => assert!(input.is_none()),
            other => panic!("expected Forbidden, got {:?}", other),
        }
    }

    #[test]
    fn test_admin_can_create_any_role() {
        let admin = make_user(1, UserRole::Admin, None);
        for role in [UserRole::Admin, UserRole::Manager, UserRole::Worker] {
            assert!(validate_creatable_role(role, &admin, serde_json::json!({})).is_ok());
        }
    }

    #[test]
    fn test_manager_can_only_create_workers() {
        let manager = make_user(1, UserRole::Manager, Some(1));
        assert!(validate_creatable_role(UserRole::Worker, &manager, serde_json::json!({})).is_ok());
        assert!(
            validate_creatable_role(UserRole::Manager, &manager, serde_json::json!({})).is_err()
        );
        assert!(validate_creatable_role(UserRole::Admin, &manager, serde_json::json!({})).is_err());
    }

    #[test]
    fn test_self_or_admin_rule() {
        let admin = make_user(1, UserRole::Admin, None);
        let worker = make_user(5, UserRole::Worker, Some(1));

        assert!(require_self_or_admin(99, &admin, None).is_ok());
        assert!(require_self_or_admin(5, &worker, None).is_ok());
        assert!(require_self_or_admin(6, &worker, None).is_err());
    }
}
