//! Servicio de visibilidad por filas
//!
//! Resuelve, para cada entidad, el subconjunto de filas que el usuario
//! autenticado puede leer, actualizar o borrar. Los repositorios traducen
//! el `RowScope` resuelto a SQL; las lecturas, updates y deletes pasan por
//! la misma query filtrada, de modo que un id fuera del scope responde
//! NotFound sin revelar si la fila existe.

use crate::middleware::auth::AuthenticatedUser;
use crate::models::user::UserRole;

/// Scope de filas resuelto para un usuario. El significado exacto del
/// filtro depende de la entidad: `Company(id)` filtra por la columna de
/// empresa alcanzable desde la fila (directa o vía join).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowScope {
    /// Sin restricción
    All,
    /// Restringido a la empresa indicada
    Company(i64),
    /// Restringido a filas cuyo user_id es el indicado
    Owner(i64),
    /// Filas propias más las de los workers subordinados de la empresa
    OwnerOrSubordinates { user_id: i64, company_id: i64 },
    /// Conjunto vacío
    Nothing,
}

/// Companies: admin ve todas; el resto solo aquella a la que pertenece
pub fn company_scope(user: &AuthenticatedUser) -> RowScope {
    match user.role {
        UserRole::Admin => RowScope::All,
        UserRole::Manager | UserRole::Worker => match user.company_id {
            Some(company_id) => RowScope::Company(company_id),
            None => RowScope::Nothing,
        },
    }
}

/// Users: admin ve todos; el resto ve su empresa excluyendo cuentas admin
/// (la exclusión la aplica el repositorio sobre el scope de empresa)
pub fn user_scope(user: &AuthenticatedUser) -> RowScope {
    match user.role {
        UserRole::Admin => RowScope::All,
        UserRole::Manager | UserRole::Worker => match user.company_id {
            Some(company_id) => RowScope::Company(company_id),
            None => RowScope::Nothing,
        },
    }
}

/// Vehicles: admin ve todos; el resto solo los de su empresa
pub fn vehicle_scope(user: &AuthenticatedUser) -> RowScope {
    match user.role {
        UserRole::Admin => RowScope::All,
        UserRole::Manager | UserRole::Worker => match user.company_id {
            Some(company_id) => RowScope::Company(company_id),
            None => RowScope::Nothing,
        },
    }
}

/// Documents: visibles para cualquier usuario autenticado
pub fn document_scope(_user: &AuthenticatedUser) -> RowScope {
    RowScope::All
}

/// Events: visibles para cualquier usuario autenticado
pub fn event_scope(_user: &AuthenticatedUser) -> RowScope {
    RowScope::All
}

/// Insurances: admin ve todas; el resto las de vehículos de su empresa
pub fn insurance_scope(user: &AuthenticatedUser) -> RowScope {
    match user.role {
        UserRole::Admin => RowScope::All,
        UserRole::Manager | UserRole::Worker => match user.company_id {
            Some(company_id) => RowScope::Company(company_id),
            None => RowScope::Nothing,
        },
    }
}

/// Refuels: admin ve todos; manager los de usuarios de su empresa;
/// worker únicamente los propios
pub fn refuel_scope(user: &AuthenticatedUser) -> RowScope {
    match user.role {
        UserRole::Admin => RowScope::All,
        UserRole::Manager => match user.company_id {
            Some(company_id) => RowScope::Company(company_id),
            None => RowScope::Nothing,
        },
        UserRole::Worker => RowScope::Owner(user.id),
    }
}

/// Reservations: admin ve todas; el resto únicamente las propias
pub fn reservation_scope(user: &AuthenticatedUser) -> RowScope {
    match user.role {
        UserRole::Admin => RowScope::All,
        UserRole::Manager | UserRole::Worker => RowScope::Owner(user.id),
    }
}

/// Comments: admin ve todos; manager los propios más los de sus workers
/// subordinados; worker los propios (su conjunto de subordinados es vacío)
pub fn comment_scope(user: &AuthenticatedUser) -> RowScope {
    match user.role {
        UserRole::Admin => RowScope::All,
        UserRole::Manager => match user.company_id {
            Some(company_id) => RowScope::OwnerOrSubordinates {
                user_id: user.id,
                company_id,
            },
            None => RowScope::Owner(user.id),
        },
        UserRole::Worker => RowScope::Owner(user.id),
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

    fn admin() -> AuthenticatedUser {
        make_user(1, UserRole::Admin, None)
    }

    fn manager() -> AuthenticatedUser {
        make_user(2, UserRole::Manager, Some(7))
    }

    fn worker() -> AuthenticatedUser {
        make_user(3, UserRole::Worker, Some(7))
    }

    #[test]
    fn test_admin_is_unrestricted_everywhere() {
        let user = admin();
        assert_eq!(company_scope(&user), RowScope::All);
        assert_eq!(user_scope(&user), RowScope::All);
        assert_eq!(vehicle_scope(&user), RowScope::All);
        assert_eq!(insurance_scope(&user), RowScope::All);
        assert_eq!(refuel_scope(&user), RowScope::All);
        assert_eq!(reservation_scope(&user), RowScope::All);
        assert_eq!(comment_scope(&user), RowScope::All);
    }

    #[test]
    fn test_documents_and_events_are_unscoped_for_everyone() {
        for user in [admin(), manager(), worker()] {
            assert_eq!(document_scope(&user), RowScope::All);
            assert_eq!(event_scope(&user), RowScope::All);
        }
    }

    #[test]
    fn test_manager_is_confined_to_own_company() {
        let user = manager();
        assert_eq!(company_scope(&user), RowScope::Company(7));
        assert_eq!(user_scope(&user), RowScope::Company(7));
        assert_eq!(vehicle_scope(&user), RowScope::Company(7));
        assert_eq!(insurance_scope(&user), RowScope::Company(7));
        assert_eq!(refuel_scope(&user), RowScope::Company(7));
    }

    #[test]
    fn test_manager_owns_reservations_and_shares_comments_with_subordinates() {
        let user = manager();
        assert_eq!(reservation_scope(&user), RowScope::Owner(2));
        assert_eq!(
            comment_scope(&user),
            RowScope::OwnerOrSubordinates {
                user_id: 2,
                company_id: 7
            }
        );
    }

    #[test]
    fn test_worker_only_sees_own_rows() {
        let user = worker();
        assert_eq!(refuel_scope(&user), RowScope::Owner(3));
        assert_eq!(reservation_scope(&user), RowScope::Owner(3));
        assert_eq!(comment_scope(&user), RowScope::Owner(3));
    }

    #[test]
    fn test_worker_company_scopes_match_own_company() {
        let user = worker();
        assert_eq!(company_scope(&user), RowScope::Company(7));
        assert_eq!(vehicle_scope(&user), RowScope::Company(7));
        assert_eq!(insurance_scope(&user), RowScope::Company(7));
    }

    #[test]
    fn test_non_admin_without_company_resolves_to_empty_scope() {
        let manager = make_user(9, UserRole::Manager, None);
        assert_eq!(company_scope(&manager), RowScope::Nothing);
        assert_eq!(user_scope(&manager), RowScope::Nothing);
        assert_eq!(vehicle_scope(&manager), RowScope::Nothing);
        assert_eq!(insurance_scope(&manager), RowScope::Nothing);
        assert_eq!(refuel_scope(&manager), RowScope::Nothing);
        // sin empresa no hay subordinados: solo los comentarios propios
        assert_eq!(comment_scope(&manager), RowScope::Owner(9));
    }

    #[test]
    fn test_scope_resolution_is_deterministic() {
        let user = worker();
        assert_eq!(refuel_scope(&user), refuel_scope(&user));
        assert_eq!(comment_scope(&user), comment_scope(&user));
    }
}
