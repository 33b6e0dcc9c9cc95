use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Minimum accepted password length, checked before hashing.
pub const MIN_PASSWORD_LEN: usize = 6;

/// User entity - a registered author. The password is only ever held as a hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID and creation timestamp.
    pub fn new(email: String, username: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            username,
            password_hash,
            created_at: Utc::now(),
        }
    }
}

/// Validate registration input. The plaintext password is checked here and
/// hashed by the caller; it never reaches the entity.
pub fn validate_registration(
    email: &str,
    username: &str,
    password: &str,
) -> Result<(), DomainError> {
    if email.trim().is_empty() || username.trim().is_empty() || password.is_empty() {
        return Err(DomainError::Validation(
            "Email, username and password are required".to_string(),
        ));
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(DomainError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}
