//! Utilidades de contraseñas
//!
//! Hashing con bcrypt y validación de complejidad para la creación
//! y actualización de usuarios.

use validator::ValidationError;

use crate::utils::errors::AppError;

const SPECIAL_CHARS: &str = "!@#$%^&*()-_=+[]|;:',.<>?/`~";

/// Hashear una contraseña con bcrypt
pub fn hash_password(password: &str) -> Result<String, AppError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("Error hashing password: {}", e)))
}

/// Verificar una contraseña contra su hash
pub fn verify_password(plain: &str, hashed: &str) -> bool {
    bcrypt::verify(plain, hashed).unwrap_or(false)
}

/// Validar complejidad de contraseña: mayúscula, minúscula, dígito,
/// carácter especial y sin espacios en blanco
pub fn validate_password_complexity(value: &str) -> Result<(), ValidationError> {
    if value.chars().any(|c| c.is_whitespace()) {
        return Err(password_error("Password cannot contain whitespace characters"));
    }
    if value.trim().is_empty() {
        return Err(password_error("Password cannot be empty"));
    }
    if !value.chars().any(|c| c.is_uppercase()) {
        return Err(password_error("Password must contain at least one uppercase letter"));
    }
    if !value.chars().any(|c| c.is_lowercase()) {
        return Err(password_error("Password must contain at least one lowercase letter"));
    }
    if !value.chars().any(|c| c.is_ascii_digit()) {
        return Err(password_error("Password must contain at least one digit"));
    }
    if !value.chars().any(|c| SPECIAL_CHARS.contains(c)) {
        return Err(password_error("Password must contain at least one special character"));
    }
    Ok(())
}

fn password_error(message: &'static str) -> ValidationError {
    let mut error = ValidationError::new("password");
    error.message = Some(message.into());
    error
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hashed = hash_password("Admin1#Admin").unwrap();
        assert!(verify_password("Admin1#Admin", &hashed));
        assert!(!verify_password("Admin1#Wrong", &hashed));
    }

    #[test]
    fn test_verify_with_garbage_hash() {
        assert!(!verify_password("whatever", "not-a-bcrypt-hash"));
    }

    #[test]
    fn test_password_complexity_accepts_valid() {
        assert!(validate_password_complexity("Str0ng#pass").is_ok());
    }

    #[test]
    fn test_password_complexity_rejects_missing_classes() {
        assert!(validate_password_complexity("alllowercase1#").is_err());
        assert!(validate_password_complexity("ALLUPPERCASE1#").is_err());
        assert!(validate_password_complexity("NoDigitsHere#").is_err());
        assert!(validate_password_complexity("NoSpecial123").is_err());
    }

    #[test]
    fn test_password_complexity_rejects_whitespace() {
        assert!(validate_password_complexity("With Space1#").is_err());
    }
}
