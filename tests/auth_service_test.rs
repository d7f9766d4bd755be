//! Authentication service unit tests against a mocked identity store.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use mealbridge::config::Config;
use mealbridge::domain::{Password, Point, User, UserRole};
use mealbridge::errors::AppError;
use mealbridge::infra::MockUserRepository;
use mealbridge::services::{AuthService, Authenticator};

fn registered_user(phone_number: &str, password: &str, role: UserRole) -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4(),
        full_name: "Ravi Kumar".to_string(),
        phone_number: phone_number.to_string(),
        password_hash: Password::new(password).unwrap().into_string(),
        role,
        location: None,
        created_at: now,
        updated_at: now,
    }
}

fn authenticator(users: MockUserRepository) -> Authenticator {
    Authenticator::new(Arc::new(users), Config::from_env())
}

#[tokio::test]
async fn register_creates_a_user_with_a_hashed_password() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_phone().returning(|_| Ok(None));
    users
        .expect_create()
        .withf(|_, _, password_hash, _, _| {
            // The plain text must never reach the store.
            password_hash.starts_with("$argon2") && !password_hash.contains("SecurePass123!")
        })
        .returning(|full_name, phone_number, password_hash, role, location| {
            let now = Utc::now();
            Ok(User {
                id: Uuid::new_v4(),
                full_name,
                phone_number,
                password_hash,
                role,
                location,
                created_at: now,
                updated_at: now,
            })
        });

    let user = authenticator(users)
        .register(
            "Ravi Kumar".to_string(),
            "+919812345678".to_string(),
            "SecurePass123!".to_string(),
            UserRole::Volunteer,
            Some(Point::new(77.5946, 12.9716)),
        )
        .await
        .unwrap();

    assert_eq!(user.role, UserRole::Volunteer);
    assert!(Password::from_hash(user.password_hash).verify("SecurePass123!"));
}

#[tokio::test]
async fn register_rejects_duplicate_phone_numbers() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_phone()
        .returning(|phone| Ok(Some(registered_user(phone, "Password123", UserRole::Donor))));

    let result = authenticator(users)
        .register(
            "Ravi Kumar".to_string(),
            "+919812345678".to_string(),
            "SecurePass123!".to_string(),
            UserRole::Donor,
            None,
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Conflict(_)));
}

#[tokio::test]
async fn register_rejects_blank_names_and_short_passwords() {
    let result = authenticator(MockUserRepository::new())
        .register(
            "  ".to_string(),
            "+919812345678".to_string(),
            "SecurePass123!".to_string(),
            UserRole::Donor,
            None,
        )
        .await;
    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));

    let mut users = MockUserRepository::new();
    users.expect_find_by_phone().returning(|_| Ok(None));
    let result = authenticator(users)
        .register(
            "Ravi Kumar".to_string(),
            "+919812345678".to_string(),
            "short".to_string(),
            UserRole::Donor,
            None,
        )
        .await;
    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn register_rejects_out_of_range_location() {
    let result = authenticator(MockUserRepository::new())
        .register(
            "Ravi Kumar".to_string(),
            "+919812345678".to_string(),
            "SecurePass123!".to_string(),
            UserRole::Volunteer,
            Some(Point::new(200.0, 95.0)),
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn login_rejects_unknown_phone_numbers() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_phone().returning(|_| Ok(None));

    let result = authenticator(users)
        .login("+910000000000".to_string(), "whatever123".to_string())
        .await;

    assert!(matches!(result.unwrap_err(), AppError::InvalidCredentials));
}

#[tokio::test]
async fn login_rejects_wrong_passwords() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_phone()
        .returning(|phone| Ok(Some(registered_user(phone, "CorrectHorse1", UserRole::Donor))));

    let result = authenticator(users)
        .login("+919812345678".to_string(), "WrongHorse999".to_string())
        .await;

    assert!(matches!(result.unwrap_err(), AppError::InvalidCredentials));
}

#[tokio::test]
async fn login_issues_a_verifiable_token() {
    let user = registered_user("+919812345678", "CorrectHorse1", UserRole::Volunteer);
    let user_id = user.id;

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_phone()
        .returning(move |_| Ok(Some(user.clone())));

    let service = authenticator(users);
    let token = service
        .login("+919812345678".to_string(), "CorrectHorse1".to_string())
        .await
        .unwrap();

    assert_eq!(token.token_type, "Bearer");
    assert!(token.expires_in > 0);

    let claims = service.verify_token(&token.access_token).unwrap();
    assert_eq!(claims.sub, user_id);
    assert_eq!(claims.role, "volunteer");
    assert_eq!(claims.full_name, "Ravi Kumar");
}

#[tokio::test]
async fn verify_token_rejects_garbage() {
    let result = authenticator(MockUserRepository::new()).verify_token("not-a-jwt");
    assert!(matches!(result.unwrap_err(), AppError::Jwt(_)));
}
