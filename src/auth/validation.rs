//! Request field validation for register and login

use crate::auth::models::{LoginRequest, RegisterRequest};
use crate::error::{Error, FieldError, Result};
use regex::Regex;
use std::ops::RangeInclusive;
use std::sync::LazyLock;

pub const FULLNAME_LENGTH: RangeInclusive<usize> = 3..=50;
pub const PASSWORD_LENGTH: RangeInclusive<usize> = 8..=100;
/// bcrypt ignores everything past this many bytes of input
pub const PASSWORD_MAX_BYTES: usize = 72;
const EMAIL_MAX_LENGTH: usize = 254;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@.]{2,}$")
        .expect("Invalid regex pattern - this is a bug in the codebase")
});

/// Canonical form used for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn is_valid_email(email: &str) -> bool {
    email.len() <= EMAIL_MAX_LENGTH && EMAIL_RE.is_match(email)
}

/// Validate a registration payload, reporting every bad field at once
pub fn validate_registration(req: &RegisterRequest) -> Result<()> {
    let mut errors = Vec::new();

    let fullname = req.fullname.trim();
    if fullname.is_empty() {
        errors.push(FieldError::new("fullname", "Fullname is required"));
    } else if !FULLNAME_LENGTH.contains(&fullname.chars().count()) {
        errors.push(FieldError::new(
            "fullname",
            format!(
                "Fullname must be between {} and {} characters long",
                FULLNAME_LENGTH.start(),
                FULLNAME_LENGTH.end()
            ),
        ));
    }

    check_email(&req.email, &mut errors);
    check_password(&req.password, &mut errors);
    if req.password.len() > PASSWORD_MAX_BYTES && !errors.iter().any(|e| e.field == "password") {
        errors.push(FieldError::new(
            "password",
            format!("Password must be at most {} bytes long", PASSWORD_MAX_BYTES),
        ));
    }

    finish(errors)
}

/// Validate login credentials
pub fn validate_login(req: &LoginRequest) -> Result<()> {
    let mut errors = Vec::new();
    check_email(&req.email, &mut errors);
    check_password(&req.password, &mut errors);
    finish(errors)
}

fn check_email(email: &str, errors: &mut Vec<FieldError>) {
    let email = email.trim();
    if email.is_empty() {
        errors.push(FieldError::new("email", "Email is required"));
    } else if !is_valid_email(email) {
        errors.push(FieldError::new("email", "Invalid email address"));
    }
}

fn check_password(password: &str, errors: &mut Vec<FieldError>) {
    if password.is_empty() {
        errors.push(FieldError::new("password", "Password is required"));
    } else if !PASSWORD_LENGTH.contains(&password.chars().count()) {
        errors.push(FieldError::new(
            "password",
            format!(
                "Password must be between {} and {} characters long",
                PASSWORD_LENGTH.start(),
                PASSWORD_LENGTH.end()
            ),
        ));
    }
}

fn finish(errors: Vec<FieldError>) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(fullname: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            fullname: fullname.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn fields(result: Result<()>) -> Vec<String> {
        match result {
            Err(Error::Validation(errors)) => errors.into_iter().map(|e| e.field).collect(),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_registration() {
        assert!(validate_registration(&register("Alice Smith", "alice@example.com", "password123")).is_ok());
    }

    #[test]
    fn test_all_missing_fields_reported() {
        let result = validate_registration(&RegisterRequest::default());
        assert_eq!(fields(result), vec!["fullname", "email", "password"]);
    }

    #[test]
    fn test_fullname_bounds() {
        assert_eq!(fields(validate_registration(&register("Al", "a@example.com", "password123"))), vec!["fullname"]);
        assert!(validate_registration(&register("Ali", "a@example.com", "password123")).is_ok());
        assert!(validate_registration(&register(&"a".repeat(50), "a@example.com", "password123")).is_ok());
        assert_eq!(
            fields(validate_registration(&register(&"a".repeat(51), "a@example.com", "password123"))),
            vec!["fullname"]
        );
    }

    #[test]
    fn test_password_bounds() {
        assert_eq!(fields(validate_login(&LoginRequest {
            email: "a@example.com".to_string(),
            password: "short".to_string(),
        })), vec!["password"]);
        assert!(validate_login(&LoginRequest {
            email: "a@example.com".to_string(),
            password: "x".repeat(100),
        })
        .is_ok());
        assert_eq!(fields(validate_login(&LoginRequest {
            email: "a@example.com".to_string(),
            password: "x".repeat(101),
        })), vec!["password"]);
    }

    #[test]
    fn test_registration_password_byte_cap() {
        // 36 two-byte characters fill the bcrypt input exactly
        assert!(validate_registration(&register("Alice", "a@example.com", &"é".repeat(36))).is_ok());
        assert_eq!(
            fields(validate_registration(&register("Alice", "a@example.com", &"é".repeat(37)))),
            vec!["password"]
        );
        assert_eq!(
            fields(validate_registration(&register("Alice", "a@example.com", &"x".repeat(73)))),
            vec!["password"]
        );
        // Login keeps the character bounds only; long input simply never matches
        assert!(validate_login(&LoginRequest {
            email: "a@example.com".to_string(),
            password: "é".repeat(100),
        })
        .is_ok());
    }

    #[test]
    fn test_email_syntax() {
        assert!(is_valid_email("alice@example.com"));
        assert!(is_valid_email("a.b+tag@mail.example.org"));
        assert!(!is_valid_email("alice"));
        assert!(!is_valid_email("alice@example"));
        assert!(!is_valid_email("alice @example.com"));
        assert!(!is_valid_email("@example.com"));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
    }
}
