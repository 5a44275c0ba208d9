//! Modelo de User
//!
//! Este módulo contiene el struct User, el enum de roles y los requests
//! de autenticación y creación de usuarios.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use validator::Validate;

/// Rol del usuario - mapea al ENUM user_role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Manager,
    Worker,
}

/// User principal - mapea exactamente a la tabla users
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub company_id: Option<i64>,
    #[serde(skip_serializing)]
    pub password: String,
}

/// Request para crear o reemplazar un usuario
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email, length(max = 64))]
    pub email: String,

    #[validate(length(min = 1, max = 128))]
    pub name: String,

    pub role: UserRole,

    pub company_id: Option<i64>,

    #[validate(
        length(min = 8, max = 64),
        custom = "crate::utils::passwords::validate_password_complexity"
    )]
    pub password1: String,

    pub password2: String,
}

impl CreateUserRequest {
    /// Verificar que ambas contraseñas coinciden
    pub fn passwords_match(&self) -> bool {
        self.password1 == self.password2
    }

    /// Payload del request sin las contraseñas, para mensajes de error
    pub fn redacted_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "email": self.email,
            "name": self.name,
            "role": self.role,
            "company_id": self.company_id,
        })
    }
}

/// Request de login
#[derive(Debug, Deserialize)]
pub struct UserLoginRequest {
    pub email: String,
    pub password: String,
}

/// Response de usuario para la API
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub company_id: Option<i64>,
}

/// Response de login con el token emitido
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: UserResponse,
}

/// Filtros para búsqueda de usuarios
#[derive(Debug, Deserialize)]
pub struct UserFilters {
    pub company_id: Option<i64>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            company_id: user.company_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_is_not_serialized() {
        let user = User {
            id: 1,
            email: "worker@example.com".to_string(),
            name: "worker".to_string(),
            role: UserRole::Worker,
            company_id: Some(5),
            password: "$2b$12$secret".to_string(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["role"], "worker");
    }

    #[test]
    fn test_passwords_match() {
        let request = CreateUserRequest {
            email: "a@b.com".to_string(),
            name: "a".to_string(),
            role: UserRole::Worker,
            company_id: Some(1),
            password1: "Str0ng#pass".to_string(),
            password2: "Str0ng#pass".to_string(),
        };
        assert!(request.passwords_match());
        assert!(request.redacted_payload().get("password1").is_none());
    }
}
