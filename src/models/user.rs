use crate::db::DbResult;
use crate::error::{AppResult, DomainError};
use crate::models::types::UserId;
use crate::services::PasswordHasher;
use serde::Serialize;
use tokio_postgres::Row;

pub const MAX_USERNAME_LEN: usize = 64;

#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// Unique user ID
    pub id: UserId,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    /// Username (distinct)
    pub username: String,
    /// Argon2id PHC string, carries its own salt
    #[serde(skip_serializing)]
    pub pwd_hash: String,
    pub is_admin: bool,
}

impl User {
    pub fn try_from_row(row: &Row) -> DbResult<Self> {
        Ok(Self {
            id: row.try_get::<_, UserId>("id")?,
            first_name: row.try_get("first_name")?,
            middle_name: row.try_get::<_, Option<String>>("middle_name")?,
            last_name: row.try_get("last_name")?,
            username: row.try_get("username")?,
            pwd_hash: row.try_get("pwd_hash")?,
            is_admin: row.try_get("is_admin")?,
        })
    }

    /// Returns true when `password` derives the stored hash. A wrong password is a
    /// plain `false`; so is a stored hash that cannot be parsed.
    pub fn check_password(&self, password: &str) -> bool {
        match PasswordHasher::new().verify(password, &self.pwd_hash) {
            Ok(matched) => matched,
            Err(e) => {
                tracing::warn!(id = %self.id, error = %e, "stored password hash is unusable");
                false
            }
        }
    }

    pub fn full_name(&self) -> String {
        match &self.middle_name {
            Some(middle) => format!("{} {} {}", self.first_name, middle, self.last_name),
            None => format!("{} {}", self.first_name, self.last_name),
        }
    }

    pub fn validate_username(s: &str) -> AppResult<()> {
        if s.trim().is_empty() {
            return Err(DomainError::Validation {
                field: "username",
                message: "cannot be empty".into(),
            });
        }
        if s.len() > MAX_USERNAME_LEN {
            return Err(DomainError::Validation {
                field: "username",
                message: format!("at most {MAX_USERNAME_LEN} characters"),
            });
        }
        if !s.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_')) {
            return Err(DomainError::Validation {
                field: "username",
                message: "only alphanumeric, hyphen, underscore allowed".into(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("first_name", &self.first_name)
            .field("middle_name", &self.middle_name)
            .field("last_name", &self.last_name)
            .field("username", &self.username)
            .field("is_admin", &self.is_admin)
            .finish_non_exhaustive()
    }
}

/// A user that has not been stored yet. The password is hashed on construction,
/// the plaintext is never kept.
#[derive(Clone)]
pub struct NewUser {
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub username: String,
    pub pwd_hash: String,
    pub is_admin: bool,
}

impl NewUser {
    pub fn new(first_name: &str, last_name: &str, username: &str, password: &str) -> AppResult<Self> {
        User::validate_username(username)?;
        for (field, value) in [("first_name", first_name), ("last_name", last_name)] {
            if value.trim().is_empty() {
                return Err(DomainError::Validation {
                    field,
                    message: "cannot be empty".into(),
                });
            }
        }

        let pwd_hash = PasswordHasher::new().hash(password)?;

        Ok(Self {
            first_name: first_name.to_string(),
            middle_name: None,
            last_name: last_name.to_string(),
            username: username.to_string(),
            pwd_hash,
            is_admin: false,
        })
    }

    pub fn with_middle_name(mut self, middle_name: impl Into<String>) -> Self {
        self.middle_name = Some(middle_name.into());
        self
    }

    pub fn with_admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_password(password: &str) -> User {
        let new = NewUser::new("Ada", "Lovelace", "ada", password).unwrap();
        User {
            id: UserId(1),
            first_name: new.first_name,
            middle_name: None,
            last_name: new.last_name,
            username: new.username,
            pwd_hash: new.pwd_hash,
            is_admin: false,
        }
    }

    #[test]
    fn check_password_accepts_original() {
        let user = user_with_password("correct horse");
        assert!(user.check_password("correct horse"));
    }

    #[test]
    fn check_password_rejects_others() {
        let user = user_with_password("correct horse");
        assert!(!user.check_password("Correct horse"));
        assert!(!user.check_password("correct horse "));
        assert!(!user.check_password(""));
    }

    #[test]
    fn check_password_malformed_hash_is_false() {
        let mut user = user_with_password("secret");
        user.pwd_hash = "not-a-phc-string".into();
        assert!(!user.check_password("secret"));
        user.pwd_hash = String::new();
        assert!(!user.check_password(""));
    }

    #[test]
    fn empty_password_can_be_set_and_checked() {
        let user = user_with_password("");
        assert!(user.check_password(""));
        assert!(!user.check_password(" "));
    }

    #[test]
    fn validate_username() {
        assert!(User::validate_username("ada_l-1").is_ok());
        assert!(User::validate_username("").is_err());
        assert!(User::validate_username("   ").is_err());
        assert!(User::validate_username("ada lovelace").is_err());
        assert!(User::validate_username("ada'; --").is_err());
        assert!(User::validate_username(&"a".repeat(MAX_USERNAME_LEN)).is_ok());
        assert!(User::validate_username(&"a".repeat(MAX_USERNAME_LEN + 1)).is_err());
    }

    #[test]
    fn new_user_rejects_blank_names() {
        assert!(matches!(
            NewUser::new(" ", "Lovelace", "ada", "pw"),
            Err(DomainError::Validation { field: "first_name", .. })
        ));
        assert!(matches!(
            NewUser::new("Ada", "", "ada", "pw"),
            Err(DomainError::Validation { field: "last_name", .. })
        ));
    }

    #[test]
    fn new_user_builders() {
        let new = NewUser::new("Ada", "Lovelace", "ada", "pw")
            .unwrap()
            .with_middle_name("King")
            .with_admin(true);
        assert_eq!(new.middle_name.as_deref(), Some("King"));
        assert!(new.is_admin);
        assert!(new.pwd_hash.starts_with("$argon2id$"));
    }

    #[test]
    fn full_name_and_redacted_output() {
        let mut user = user_with_password("pw");
        assert_eq!(user.full_name(), "Ada Lovelace");
        user.middle_name = Some("King".into());
        assert_eq!(user.full_name(), "Ada King Lovelace");

        let dbg = format!("{:?}", user);
        assert!(!dbg.contains(&user.pwd_hash));

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("pwd_hash").is_none());
        assert_eq!(json["username"], "ada");
    }
}
