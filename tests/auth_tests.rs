//! Password, token and validation tests

use passage::auth::models::UserInfo;
use passage::auth::validation::{validate_login, validate_registration};
use passage::auth::{Claims, LoginRequest, PasswordHasher, RegisterRequest, TokenIssuer, User};
use passage::error::{Error, ErrorKind};
use uuid::Uuid;

fn hasher() -> PasswordHasher {
    PasswordHasher::new(4).expect("valid cost")
}

#[test]
fn test_password_round_trip_across_lengths() {
    let hasher = hasher();
    for len in [8usize, 9, 32, 72] {
        let password: String = "p".repeat(len - 1) + "!";
        let hash = hasher.hash(&password).expect("hash");
        assert!(hasher.verify(&password, &hash).expect("verify"), "len {}", len);
    }
}

#[test]
fn test_wrong_password_rejected() {
    let hasher = hasher();
    let hash = hasher.hash("password123").unwrap();

    assert!(!hasher.verify("password12", &hash).unwrap());
    assert!(!hasher.verify("Password123", &hash).unwrap());
    assert!(!hasher.verify("", &hash).unwrap());
}

#[test]
fn test_hash_never_contains_plaintext() {
    let hash = hasher().hash("correct horse battery").unwrap();
    assert!(!hash.contains("correct horse battery"));
}

#[test]
fn test_jwt_token_creation() {
    let issuer = TokenIssuer::new(b"auth-tests", None);
    let token = issuer.issue(Uuid::new_v4()).expect("Failed to create token");
    assert!(!token.is_empty());
    assert_eq!(token.split('.').count(), 3); // JWT format: header.payload.signature
}

#[test]
fn test_jwt_token_validation() {
    let issuer = TokenIssuer::new(b"auth-tests", None);
    let user_id = Uuid::new_v4();
    let token = issuer.issue(user_id).expect("Failed to create token");
    let verified = issuer.verify(&token).expect("Failed to validate token");

    assert_eq!(verified.user_id, user_id);
    assert!(verified.expires_at.is_none());
}

#[test]
fn test_token_without_exp_never_expires() {
    let claims = Claims {
        sub: Uuid::new_v4().to_string(),
        iat: 0,
        jti: Uuid::new_v4().to_string(),
        exp: None,
    };
    assert!(!claims.is_expired());

    let issuer = TokenIssuer::new(b"auth-tests", None);
    let token = issuer.sign(&claims).unwrap();
    assert!(issuer.verify(&token).is_ok());
}

#[test]
fn test_future_exp_accepted_past_exp_rejected() {
    let issuer = TokenIssuer::new(b"auth-tests", None);
    let now = chrono::Utc::now().timestamp();

    let mut claims = Claims {
        sub: Uuid::new_v4().to_string(),
        iat: now,
        jti: Uuid::new_v4().to_string(),
        exp: Some(now + 300),
    };
    assert!(issuer.verify(&issuer.sign(&claims).unwrap()).is_ok());

    claims.exp = Some(now - 1);
    assert!(matches!(
        issuer.verify(&issuer.sign(&claims).unwrap()),
        Err(Error::Unauthorized)
    ));
}

#[test]
fn test_foreign_algorithm_rejected() {
    let claims = Claims::new(Uuid::new_v4(), None);
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS512),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(b"auth-tests"),
    )
    .unwrap();

    let issuer = TokenIssuer::new(b"auth-tests", None);
    assert!(matches!(issuer.verify(&token), Err(Error::Unauthorized)));
}

#[test]
fn test_malformed_token_rejection() {
    let issuer = TokenIssuer::new(b"auth-tests", None);
    for token in ["not-a-jwt-token", "a.b", "a.b.c.d", "invalid.token.here"] {
        let err = issuer.verify(token).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized, "{}", token);
    }
}

#[test]
fn test_registration_validation_lists_fields() {
    let req = RegisterRequest {
        fullname: "Al".to_string(),
        email: "not-an-email".to_string(),
        password: "short".to_string(),
    };

    match validate_registration(&req) {
        Err(Error::Validation(errors)) => {
            let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
            assert_eq!(fields, ["fullname", "email", "password"]);
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[test]
fn test_login_validation() {
    let ok = LoginRequest {
        email: "alice@example.com".to_string(),
        password: "password123".to_string(),
    };
    assert!(validate_login(&ok).is_ok());

    let missing = LoginRequest::default();
    assert!(matches!(validate_login(&missing), Err(Error::Validation(e)) if e.len() == 2));
}

#[test]
fn test_user_info_conversion() {
    let user = User::new(
        "Alice Smith".to_string(),
        "alice@example.com".to_string(),
        "$2b$04$hash".to_string(),
    );
    let info = UserInfo::from(&user);

    assert_eq!(info.id, user.id);
    assert_eq!(info.fullname, "Alice Smith");
    assert_eq!(info.email, "alice@example.com");
}

#[test]
fn test_user_id_uniqueness() {
    let user1 = User::new("Alice".to_string(), "a@example.com".to_string(), "h".to_string());
    let user2 = User::new("Alice".to_string(), "a@example.com".to_string(), "h".to_string());

    assert_ne!(user1.id, user2.id);
}
