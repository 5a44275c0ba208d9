//! Bootstrap de datos iniciales
//!
//! Crea la cuenta de administrador por defecto si no existe.

use sqlx::PgPool;
use tracing::info;

use crate::models::user::UserRole;
use crate::utils::errors::AppError;
use crate::utils::passwords::hash_password;

const ADMIN_EMAIL: &str = "admin@example.com";
const ADMIN_PASSWORD: &str = "Admin1#Admin";

/// Crear el usuario administrador por defecto si no existe
pub async fn ensure_admin_user(pool: &PgPool) -> Result<(), AppError> {
    let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(ADMIN_EMAIL)
        .fetch_optional(pool)
        .await?;

    if existing.is_some() {
        info!("Admin user already exists");
        return Ok(());
    }

    let password_hash = hash_password(ADMIN_PASSWORD)?;

    sqlx::query(
        "INSERT INTO users (email, name, role, company_id, password) VALUES ($1, $2, $3, NULL, $4)",
    )
    .bind(ADMIN_EMAIL)
    .bind("admin")
    .bind(UserRole::Admin)
    .bind(password_hash)
    .execute(pool)
    .await?;

    info!("Admin user created");
    Ok(())
}
