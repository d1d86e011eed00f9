use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use evlog::meta;
use rand::rngs::OsRng;
use sqlx::SqlitePool;

use crate::db;
use crate::db::schema::User;
use crate::error::{Result, SurveyError};
use crate::runtime::get_logger;
use crate::support::sanitize;

const LOGIN_FAILED: &str = "Login unsuccessful. Please check email and password.";

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| SurveyError::PasswordHash(e.to_string()))?;

    Ok(hash.to_string())
}

fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(password_hash).map_err(|e| SurveyError::PasswordHash(e.to_string()))?;
    Ok(Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
}

/// Registers a new user. Emails are unique and compared case-sensitively.
pub async fn register_user(conn: &SqlitePool, email: &str, password: &str) -> Result<User> {
    let email = sanitize::clean_email("email", email)?;
    sanitize::check_password(password)?;

    if db::model::find_user_by_email(conn, &email).await?.is_some() {
        get_logger().info("Attempted to register an existing email.", meta! {
            "Email" => email,
        });
        return Err(SurveyError::IntegrityViolation("Email address already exists".to_owned()));
    }

    let password_hash = hash_password(password)?;

    let user = match db::model::add_user(conn, &email, &password_hash).await {
        Ok(v) => v,
        // Lost a race with a concurrent registration of the same address.
        Err(SurveyError::Storage(sqlx::Error::Database(e))) if e.is_unique_violation() => {
            return Err(SurveyError::IntegrityViolation("Email address already exists".to_owned()));
        }
        Err(e) => return Err(e),
    };

    get_logger().info("New user registered.", meta! {
        "UserID" => user.id,
        "Email" => user.email,
    });

    Ok(user)
}

/// Checks credentials. Unknown emails and wrong passwords fail identically.
pub async fn authenticate(conn: &SqlitePool, email: &str, password: &str) -> Result<User> {
    let email = email.trim();

    let user = match db::model::find_user_by_email(conn, email).await? {
        None => None,
        Some(v) => match verify_password(password, &v.password_hash)? {
            true => Some(v),
            false => None,
        },
    };

    match user {
        Some(v) => Ok(v),
        None => {
            get_logger().info("Failed login attempt.", meta! {
                "Email" => email,
            });
            Err(SurveyError::Unauthorized(LOGIN_FAILED.to_owned()))
        }
    }
}

pub async fn get_user(conn: &SqlitePool, id_user: i64) -> Result<User> {
    db::model::get_user(conn, id_user)
        .await?
        .ok_or_else(|| SurveyError::not_found("user", id_user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::dbclient::DBClient;

    #[tokio::test]
    async fn registered_user_can_log_in() {
        let db = DBClient::in_memory().await.unwrap();

        let user = register_user(db.conn(), " test@example.com ", "Password123!").await.unwrap();
        assert_eq!(user.email, "test@example.com");
        assert_ne!(user.password_hash, "Password123!");
        assert!(user.password_hash.starts_with("$argon2"));

        let logged_in = authenticate(db.conn(), "test@example.com", "Password123!").await.unwrap();
        assert_eq!(logged_in.id, user.id);

        assert_eq!(get_user(db.conn(), user.id).await.unwrap(), user);
    }

    #[tokio::test]
    async fn duplicate_email_is_an_integrity_violation() {
        let db = DBClient::in_memory().await.unwrap();

        register_user(db.conn(), "newuser@example.com", "Password123!").await.unwrap();
        let err = register_user(db.conn(), "newuser@example.com", "Password123!").await.unwrap_err();
        assert!(matches!(err, SurveyError::IntegrityViolation(_)));

        // Case-sensitive comparison: a differently cased address is a different user.
        register_user(db.conn(), "NewUser@example.com", "Password123!").await.unwrap();
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_fail_the_same_way() {
        let db = DBClient::in_memory().await.unwrap();
        register_user(db.conn(), "test@example.com", "Password123!").await.unwrap();

        let wrong = authenticate(db.conn(), "test@example.com", "WrongPassword!").await.unwrap_err();
        let unknown = authenticate(db.conn(), "nobody@example.com", "Password123!").await.unwrap_err();

        assert!(matches!(wrong, SurveyError::Unauthorized(_)));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn weak_password_is_rejected_before_writing() {
        let db = DBClient::in_memory().await.unwrap();

        let err = register_user(db.conn(), "test@example.com", "password").await.unwrap_err();
        assert!(matches!(err, SurveyError::ValidationFailed { field: "password", .. }));

        let err = register_user(db.conn(), "not-an-email", "Password123!").await.unwrap_err();
        assert!(matches!(err, SurveyError::ValidationFailed { field: "email", .. }));

        let err = register_user(db.conn(), "<script>alert(1)</script>@x.com", "Password123!").await.unwrap_err();
        assert!(matches!(err, SurveyError::ValidationFailed { field: "email", .. }));

        assert!(db::model::find_user_by_email(db.conn(), "test@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unknown_user_id_is_not_found() {
        let db = DBClient::in_memory().await.unwrap();
        let err = get_user(db.conn(), 42).await.unwrap_err();
        assert!(matches!(err, SurveyError::NotFound { entity: "user", id: 42 }));
    }
}
