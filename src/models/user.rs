use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::constants::{INAPPROPRIATE_USERNAMES, MAX_EMAIL_LENGTH, USER_FIELD_LENGTH};
use crate::error::{AppError, Result};

/// User row as stored in the database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    /// Login identifier
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Opaque hash owned by the authentication layer
    pub credential_hash: String,
    pub date_joined: DateTime<Utc>,
}

/// Fields required to provision a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub credential_hash: String,
}

/// User model for API responses
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct UserView {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Whether the viewer follows this user; false for anonymous viewers
    pub is_subscribed: bool,
}

impl User {
    /// Validate a username: `[a-zA-Z0-9_-]+`, bounded, not reserved
    pub fn validate_username(username: &str) -> bool {
        !username.is_empty()
            && username.chars().count() <= USER_FIELD_LENGTH
            && username
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            && !INAPPROPRIATE_USERNAMES
                .iter()
                .any(|reserved| reserved.eq_ignore_ascii_case(username))
    }

    /// Loose email shape check: one `@` with text on both sides
    pub fn validate_email(email: &str) -> bool {
        if email.len() > MAX_EMAIL_LENGTH || email.chars().any(char::is_whitespace) {
            return false;
        }
        match email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty() && !domain.is_empty() && !domain.contains('@')
            }
            None => false,
        }
    }

    pub fn view(&self, is_subscribed: bool) -> UserView {
        UserView {
            id: self.id,
            email: self.email.clone(),
            username: self.username.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            is_subscribed,
        }
    }
}

impl NewUser {
    pub fn validate(&self) -> Result<()> {
        if !User::validate_email(&self.email) {
            return Err(AppError::validation("email", "Enter a valid email address"));
        }
        if !User::validate_username(&self.username) {
            return Err(AppError::validation(
                "username",
                "Username may only contain letters, digits, '_' and '-' and must not be reserved",
            ));
        }
        for (field, value) in [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
        ] {
            if value.trim().is_empty() || value.chars().count() > USER_FIELD_LENGTH {
                return Err(AppError::validation(
                    field,
                    format!("Must be between 1 and {USER_FIELD_LENGTH} characters"),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            username: username.to_string(),
            first_name: "Ivan".to_string(),
            last_name: "Petrov".to_string(),
            credential_hash: "hash".to_string(),
        }
    }

    #[test]
    fn test_validate_username() {
        assert!(User::validate_username("chef_ivan-1"));

        // Reserved, in any case
        assert!(!User::validate_username("admin"));
        assert!(!User::validate_username("Moderator"));

        // Forbidden characters
        assert!(!User::validate_username("chef ivan"));
        assert!(!User::validate_username("chef@home"));
        assert!(!User::validate_username(""));

        // Too long
        assert!(!User::validate_username(&"a".repeat(151)));
    }

    #[test]
    fn test_validate_email() {
        assert!(User::validate_email("cook@example.com"));
        assert!(!User::validate_email("cook.example.com"));
        assert!(!User::validate_email("@example.com"));
        assert!(!User::validate_email("cook@"));
        assert!(!User::validate_email("co ok@example.com"));
    }

    #[test]
    fn test_new_user_validation_reports_field() {
        assert!(new_user("cook", "cook@example.com").validate().is_ok());

        let err = new_user("root", "cook@example.com").validate().unwrap_err();
        assert!(matches!(err, AppError::Validation { field: "username", .. }));

        let mut blank = new_user("cook", "cook@example.com");
        blank.last_name = "  ".to_string();
        let err = blank.validate().unwrap_err();
        assert!(matches!(err, AppError::Validation { field: "last_name", .. }));
    }
}
